//! Loss functions for training the pixel regressors.

/// MSE loss
pub fn mse_loss(pred: &[f64], target: &[f64]) -> f64 {
    if pred.len() != target.len() {
        panic!("Pred and target size mismatch");
    }
    pred.iter()
        .zip(target)
        .map(|(&p, &t)| (p - t).powi(2))
        .sum::<f64>()
        / pred.len() as f64
}

/// MSE deriv
pub fn mse_deriv(pred: &[f64], target: &[f64]) -> Vec<f64> {
    let n = pred.len() as f64;
    pred.iter()
        .zip(target)
        .map(|(&p, &t)| 2.0 * (p - t) / n)
        .collect()
}
