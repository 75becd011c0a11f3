use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Trait for activation functions.
pub trait Activation: fmt::Debug + Send + Sync {
    fn apply(&self, x: f64) -> f64;
    fn derivative(&self, x: f64) -> f64;
}

/// Tanh: (exp(x) - exp(-x)) / (exp(x) + exp(-x))
#[derive(Debug, Clone, Default)]
pub struct Tanh;

impl Activation for Tanh {
    fn apply(&self, x: f64) -> f64 {
        x.tanh()
    }
    fn derivative(&self, x: f64) -> f64 {
        let t = self.apply(x);
        1.0 - t * t
    }
}

/// ReLU: max(0, x)
#[derive(Debug, Clone, Default)]
pub struct ReLU;

impl Activation for ReLU {
    fn apply(&self, x: f64) -> f64 {
        x.max(0.0)
    }
    fn derivative(&self, x: f64) -> f64 {
        (x > 0.0) as u8 as f64
    }
}

/// Sigmoid: 1 / (1 + exp(-x))
#[derive(Debug, Clone, Default)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    fn apply(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
    fn derivative(&self, x: f64) -> f64 {
        let s = self.apply(x);
        s * (1.0 - s)
    }
}

/// Linear: identity. Used for the regression output layer.
#[derive(Debug, Clone, Default)]
pub struct Linear;

impl Activation for Linear {
    fn apply(&self, x: f64) -> f64 {
        x
    }
    fn derivative(&self, _x: f64) -> f64 {
        1.0
    }
}

/// Hidden-layer activation kinds selectable from a configuration file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivationKind {
    Tanh,
    ReLU,
    Sigmoid,
    Linear,
}

impl Default for ActivationKind {
    fn default() -> Self {
        ActivationKind::Tanh
    }
}

impl ActivationKind {
    pub fn to_arc(self) -> Arc<dyn Activation + Send + Sync> {
        match self {
            ActivationKind::Tanh => Arc::new(Tanh),
            ActivationKind::ReLU => Arc::new(ReLU),
            ActivationKind::Sigmoid => Arc::new(Sigmoid),
            ActivationKind::Linear => Arc::new(Linear),
        }
    }
}
