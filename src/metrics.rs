//! Evaluation metrics for the pixel regressors.
use crate::error::PipelineError;
use crate::layers::Matrix;
use crate::network::MlpRegressor;
use anyhow::{anyhow, Result};

/// Per-row absolute errors of a model over an evaluation set, plus their mean.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub absolute_errors: Vec<f64>,
    pub mean_absolute_error: f64,
}

/// Evaluate a trained model over already-scaled features against the true
/// target values. No side effects; reporting is the caller's business.
pub fn evaluate(
    model: &MlpRegressor,
    scaled_features: &Matrix,
    targets: &[f64],
) -> Result<EvaluationReport> {
    if scaled_features.len() != targets.len() {
        return Err(PipelineError::ShapeMismatch {
            expected: scaled_features.len(),
            found: targets.len(),
            what: "evaluation targets",
        }
        .into());
    }
    if targets.is_empty() {
        return Err(anyhow!("cannot evaluate on an empty set"));
    }

    let mut absolute_errors = Vec::with_capacity(targets.len());
    for (row, &desired) in scaled_features.iter().zip(targets) {
        let prediction = model.predict_scaled(row)?;
        absolute_errors.push((desired - prediction).abs());
    }
    let mean_absolute_error =
        absolute_errors.iter().sum::<f64>() / absolute_errors.len() as f64;
    Ok(EvaluationReport {
        absolute_errors,
        mean_absolute_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperimentConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trained_constant_model(targets: &[f64]) -> MlpRegressor {
        let config = ExperimentConfig {
            hidden_layers: vec![3],
            max_epochs: 150,
            ..Default::default()
        };
        let features: Matrix = targets.iter().map(|_| vec![0.0, 0.0]).collect();
        let mut rng = StdRng::seed_from_u64(6);
        let mut model = MlpRegressor::new(2, &config, &mut rng);
        model.fit(&features, targets, &config, &mut rng).unwrap();
        model
    }

    #[test]
    fn reports_per_row_and_mean_error() {
        let targets = vec![2.0, 2.0, 2.0, 2.0];
        let model = trained_constant_model(&targets);
        let features: Matrix = targets.iter().map(|_| vec![0.0, 0.0]).collect();
        let report = evaluate(&model, &features, &targets).unwrap();
        assert_eq!(report.absolute_errors.len(), 4);
        // Constant target, no feature signal: error should be small.
        assert!(report.mean_absolute_error < 0.5);
        let recomputed =
            report.absolute_errors.iter().sum::<f64>() / report.absolute_errors.len() as f64;
        assert!((report.mean_absolute_error - recomputed).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_and_empty_sets() {
        let targets = vec![1.0, 1.0];
        let model = trained_constant_model(&targets);
        assert!(evaluate(&model, &vec![vec![0.0, 0.0]], &targets).is_err());
        assert!(evaluate(&model, &vec![], &[]).is_err());
    }
}
