//! Console reporting helpers for training and evaluation.
use crate::layers::Matrix;
use crate::network::MlpRegressor;
use crate::scaler::StandardScaler;
use anyhow::Result;

/// Print model summary
pub fn print_model_summary(model: &MlpRegressor) {
    println!("Model Summary:\n{}", model);
}

/// Print a per-row prediction table over an evaluation set.
///
/// Features are inverse-transformed back to raw units purely for display;
/// the model itself always sees the scaled rows. The mean absolute error is
/// printed underneath.
pub fn print_prediction_table(
    model: &MlpRegressor,
    scaler: &StandardScaler,
    scaled_features: &Matrix,
    targets: &[f64],
) -> Result<()> {
    if targets.is_empty() {
        println!("(no rows to report)");
        return Ok(());
    }
    let raw = scaler.inverse_transform(scaled_features)?;

    println!("{:>30} ->  {:^8} {:^8} {:^10}", "input", "pred", "des.", "absdiff");
    let mut total_error = 0.0;
    for (i, &desired) in targets.iter().enumerate() {
        let prediction = model.predict_scaled(&scaled_features[i])?;
        let diff = (desired - prediction).abs();
        total_error += diff;

        let mut shown = format!("{:?}", raw[i]);
        shown.truncate(25);
        println!(
            "{:>30} ->  {:<+8.3} {:<+8.3} {:^10.3}",
            shown, prediction, desired, diff
        );
    }
    println!("+-----   -----   -----   -----+");
    println!("average abs error: {:.3}", total_error / targets.len() as f64);
    println!("+-----   -----   -----   -----+");
    Ok(())
}

/// Print a simple bordered table of per-pixel training losses.
pub fn print_loss_table(losses: &[(usize, f64)], title: &str) {
    println!("\n{}:", title);
    println!("+--------+------------+");
    println!("| pixel  | final loss |");
    println!("+--------+------------+");
    for &(index, loss) in losses {
        println!("| pix{:<4}| {:>10.6} |", index, loss);
    }
    println!("+--------+------------+");
}
