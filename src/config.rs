//! Experiment configuration with documented defaults.
use crate::activations::ActivationKind;
use crate::dataset::PIXELS;
use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for one regression run.
///
/// The defaults reproduce the canonical experiment: the first 48 pixels as
/// input features, pixel 52 as the single diagnostic target, hidden layers of
/// 6 and 7 tanh units, and up to 400 SGD epochs starting at learning rate 0.1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Leading pixel columns used as model input features.
    pub known_pixels: usize,
    /// Pixel predicted by the single-target experiment. Must lie outside the
    /// known prefix.
    pub target_pixel: usize,
    /// Hidden layer widths, input side first.
    pub hidden_layers: Vec<usize>,
    /// Hidden-layer activation. The output layer is always linear.
    pub activation: ActivationKind,
    /// Upper bound on SGD epochs per model.
    pub max_epochs: usize,
    /// Starting learning rate for the adaptive schedule.
    pub learning_rate_init: f64,
    /// Minimum epoch-loss improvement the schedule counts as progress.
    pub tol: f64,
    /// Fraction of rows held out for testing.
    pub test_fraction: f64,
    /// Standardize features before training. When false the scaler is fit in
    /// identity mode so the calling code stays the same.
    pub scale_features: bool,
    /// Print per-epoch losses and evaluation tables while running.
    pub verbose: bool,
    /// Fixed RNG seed for reproducible splits, inits, and epoch shuffles.
    /// `None` draws fresh randomness every run.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            known_pixels: 48,
            target_pixel: 52,
            hidden_layers: vec![6, 7],
            activation: ActivationKind::Tanh,
            max_epochs: 400,
            learning_rate_init: 0.1,
            tol: 1e-4,
            test_fraction: 0.2,
            scale_features: true,
            verbose: false,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Read a configuration from a JSON file; absent fields keep defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Bad config in {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// RNG for this run: seeded when `seed` is set, from entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.known_pixels == 0 || self.known_pixels >= PIXELS {
            return Err(anyhow!(
                "known_pixels must be within 1..{}, got {}",
                PIXELS,
                self.known_pixels
            ));
        }
        if self.target_pixel < self.known_pixels || self.target_pixel >= PIXELS {
            return Err(anyhow!(
                "target_pixel must be within {}..{}, got {}",
                self.known_pixels,
                PIXELS,
                self.target_pixel
            ));
        }
        if self.hidden_layers.iter().any(|&size| size == 0) {
            return Err(anyhow!("hidden layer sizes must be non-zero"));
        }
        if self.max_epochs == 0 {
            return Err(anyhow!("max_epochs must be at least 1"));
        }
        if self.learning_rate_init <= 0.0 {
            return Err(anyhow!(
                "learning_rate_init must be positive, got {}",
                self.learning_rate_init
            ));
        }
        if self.tol < 0.0 {
            return Err(anyhow!("tol must be non-negative, got {}", self.tol));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(anyhow!(
                "test_fraction must be within (0, 1), got {}",
                self.test_fraction
            ));
        }
        Ok(())
    }
}
