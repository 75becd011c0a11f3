//! Per-feature standardization fit on training rows and reused everywhere
//! the corresponding features are consumed.
use crate::error::PipelineError;
use crate::layers::Matrix;
use anyhow::{anyhow, Result};

/// Column-wise standardization state: `(x - mean) / std` per feature.
///
/// Fit once on the training features for a given known-pixel count, immutable
/// afterwards, and shared read-only by every model trained against that
/// feature count. Zero-variance columns get a unit standard deviation so
/// constant pixels pass through centered; their count is kept for reporting.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
    scaling: bool,
    degenerate: usize,
}

impl StandardScaler {
    /// Fit a standardizing scaler on training features only.
    pub fn fit(train_features: &Matrix) -> Result<Self> {
        Self::fit_with(train_features, true)
    }

    /// Fit with scaling optionally disabled. The disabled scaler still goes
    /// through the same fit/transform calls so calling code stays uniform.
    pub fn fit_with(train_features: &Matrix, scale: bool) -> Result<Self> {
        if train_features.is_empty() {
            return Err(anyhow!("cannot fit a scaler on an empty feature matrix"));
        }
        let width = train_features[0].len();
        for row in train_features {
            if row.len() != width {
                return Err(PipelineError::ShapeMismatch {
                    expected: width,
                    found: row.len(),
                    what: "feature row",
                }
                .into());
            }
        }
        if !scale {
            return Ok(Self {
                means: vec![0.0; width],
                stds: vec![1.0; width],
                scaling: false,
                degenerate: 0,
            });
        }

        let n = train_features.len() as f64;
        let mut means = vec![0.0; width];
        for row in train_features {
            for (m, &v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut stds = vec![0.0; width];
        for row in train_features {
            for ((s, &m), &v) in stds.iter_mut().zip(&means).zip(row) {
                *s += (v - m).powi(2);
            }
        }
        let mut degenerate = 0;
        for s in &mut stds {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
                degenerate += 1;
            }
        }

        Ok(Self {
            means,
            stds,
            scaling: true,
            degenerate,
        })
    }

    pub fn num_features(&self) -> usize {
        self.means.len()
    }

    /// Training columns that had zero variance and were given a unit scale.
    pub fn degenerate_columns(&self) -> usize {
        self.degenerate
    }

    pub fn is_scaling(&self) -> bool {
        self.scaling
    }

    /// Standardize one raw feature row.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.means.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.means.len(),
                found: row.len(),
                what: "scaler input",
            }
            .into());
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect())
    }

    /// Standardize a whole feature matrix column-wise.
    pub fn transform(&self, features: &Matrix) -> Result<Matrix> {
        features.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Map standardized values back to raw units. Reporting only; inverse
    /// output is never fed back into a model.
    pub fn inverse_transform(&self, features: &Matrix) -> Result<Matrix> {
        features
            .iter()
            .map(|row| {
                if row.len() != self.means.len() {
                    return Err(PipelineError::ShapeMismatch {
                        expected: self.means.len(),
                        found: row.len(),
                        what: "scaler input",
                    }
                    .into());
                }
                Ok(row
                    .iter()
                    .zip(self.means.iter().zip(&self.stds))
                    .map(|(&v, (&m, &s))| v * s + m)
                    .collect())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fit_matches_hand_computation() {
        let x = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();
        // First column: mean 3, population std sqrt(8/3).
        let std0 = (8.0f64 / 3.0).sqrt();
        assert!(close(scaled[0][0], (1.0 - 3.0) / std0));
        assert!(close(scaled[2][0], (5.0 - 3.0) / std0));
        // Constant column: centered, unit scale substituted.
        assert!(close(scaled[0][1], 0.0));
        assert_eq!(scaler.degenerate_columns(), 1);
    }

    #[test]
    fn round_trip_recovers_raw_values() {
        let x = vec![
            vec![0.0, 5.0, 16.0],
            vec![2.0, 7.0, 0.0],
            vec![9.0, 1.0, 4.0],
            vec![3.0, 3.0, 3.0],
        ];
        let scaler = StandardScaler::fit(&x).unwrap();
        let back = scaler.inverse_transform(&scaler.transform(&x).unwrap()).unwrap();
        for (orig, rec) in x.iter().zip(&back) {
            for (&a, &b) in orig.iter().zip(rec) {
                assert!(close(a, b));
            }
        }
    }

    #[test]
    fn identity_mode_passes_values_through() {
        let x = vec![vec![4.0, 8.0], vec![2.0, 6.0]];
        let scaler = StandardScaler::fit_with(&x, false).unwrap();
        assert!(!scaler.is_scaling());
        assert_eq!(scaler.transform(&x).unwrap(), x);
        assert_eq!(scaler.inverse_transform(&x).unwrap(), x);
    }

    #[test]
    fn rejects_width_mismatch_at_transform() {
        let scaler = StandardScaler::fit(&vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
    }

    #[test]
    fn rejects_empty_and_ragged_fits() {
        assert!(StandardScaler::fit(&vec![]).is_err());
        assert!(StandardScaler::fit(&vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }
}
