//! Dense layer implementation with weights, bias, and activation function.
use crate::activations::Activation;
use rand::Rng;
use std::sync::Arc;

/// Matrix type
pub type Matrix = Vec<Vec<f64>>;

/// A fully-connected (dense) layer with weights, bias, and an activation function.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub bias: Vec<f64>,
    pub activation: Arc<dyn Activation + Send + Sync>,
}

impl DenseLayer {
    /// Create a new dense layer using Glorot uniform initialization and small positive bias.
    ///
    /// Weights come from the caller's RNG so a seeded run reproduces the same
    /// initialization.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Arc<dyn Activation + Send + Sync>,
        rng: &mut R,
    ) -> Self {
        // Glorot uniform: U(-sqrt(6/(fan_in+fan_out)), sqrt(6/(fan_in+fan_out)))
        let limit = (6.0f64 / (input_size + output_size) as f64).sqrt();
        let weights: Matrix = (0..output_size)
            .map(|_| {
                (0..input_size)
                    .map(|_| rng.gen_range(-limit..limit))
                    .collect()
            })
            .collect();
        let bias = vec![0.01; output_size];
        Self {
            weights,
            bias,
            activation,
        }
    }

    /// Forward pass: computes pre-activations `z = W·x + b` and activations `a = act(z)`.
    pub fn forward(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let z: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, &b)| row.iter().zip(input).map(|(&w, &i)| w * i).sum::<f64>() + b)
            .collect();
        let a: Vec<f64> = z.iter().map(|&val| self.activation.apply(val)).collect();
        (z, a)
    }

    /// Parameter update: `W -= lr * (dz ⊗ input)`, `b -= lr * dz`.
    pub fn update(&mut self, input: &[f64], dz: &[f64], lr: f64) {
        // bias
        for (b, &d) in self.bias.iter_mut().zip(dz) {
            *b -= lr * d;
        }
        // weights
        for (i, row) in self.weights.iter_mut().enumerate() {
            for (j, w) in row.iter_mut().enumerate() {
                *w -= lr * dz[i] * input[j];
            }
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.first().map_or(0, |row| row.len())
    }

    pub fn output_size(&self) -> usize {
        self.bias.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activations::Linear;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn forward_computes_weighted_sum_plus_bias() {
        let mut layer = DenseLayer::new(2, 1, Arc::new(Linear), &mut StdRng::seed_from_u64(1));
        layer.weights = vec![vec![2.0, -1.0]];
        layer.bias = vec![0.5];
        let (z, a) = layer.forward(&[3.0, 4.0]);
        // 2*3 - 1*4 + 0.5
        assert!((z[0] - 2.5).abs() < 1e-12);
        assert_eq!(z, a);
    }

    #[test]
    fn update_moves_against_gradient() {
        let mut layer = DenseLayer::new(1, 1, Arc::new(Linear), &mut StdRng::seed_from_u64(2));
        layer.weights = vec![vec![1.0]];
        layer.bias = vec![0.0];
        layer.update(&[2.0], &[0.5], 0.1);
        // w -= 0.1 * 0.5 * 2.0, b -= 0.1 * 0.5
        assert!((layer.weights[0][0] - 0.9).abs() < 1e-12);
        assert!((layer.bias[0] + 0.05).abs() < 1e-12);
    }

    #[test]
    fn init_stays_within_glorot_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = DenseLayer::new(48, 6, Arc::new(Linear), &mut rng);
        let limit = (6.0f64 / 54.0).sqrt();
        for row in &layer.weights {
            assert_eq!(row.len(), 48);
            for &w in row {
                assert!(w.abs() <= limit);
            }
        }
        assert_eq!(layer.output_size(), 6);
        assert_eq!(layer.input_size(), 48);
    }

    #[test]
    fn seeded_init_is_reproducible() {
        let a = DenseLayer::new(4, 3, Arc::new(Linear), &mut StdRng::seed_from_u64(7));
        let b = DenseLayer::new(4, 3, Arc::new(Linear), &mut StdRng::seed_from_u64(7));
        assert_eq!(a.weights, b.weights);
    }
}
