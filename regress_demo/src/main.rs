// regress_demo/src/main.rs
use anyhow::Result;
use pixel_regress::{
    load_digits, predict, print_loss_table, print_model_summary, reconstruct, render_digit,
    run_experiment, ExperimentConfig, RegressorBank,
};
use std::collections::BTreeMap;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "digits.csv".to_string());
    let config = match args.next() {
        Some(config_path) => ExperimentConfig::from_json_file(config_path)?,
        None => ExperimentConfig::default(),
    };

    let table = load_digits(&path)?;
    println!("{}: {} rows read into a digit table.", path, table.num_rows());

    // Single-target experiment: how well can pix52 be predicted from the
    // first 48 pixels?
    println!("\n=== Regression prediction of pix{} ===", config.target_pixel);
    let report = run_experiment(&table, &config)?;
    println!(
        "training with {} rows; testing with {} rows",
        report.train_rows, report.test_rows
    );
    println!("diagnostic training loss: {:.6}", report.diagnostic_loss);
    println!(
        "held-out mean absolute error: {:.3}",
        report.mean_absolute_error
    );
    println!(
        "final training loss: {:.6} (per-pixel error about {:.3})",
        report.final_loss,
        report.final_loss.sqrt()
    );
    print_model_summary(&report.model);

    // One digit, one predicted pixel.
    let row_to_show = 42.min(table.num_rows() - 1);
    println!("\nThe numeral is a {}", table.label(row_to_show));
    let all_pixels = table.pixels(row_to_show).to_vec();
    let known_pixels = &all_pixels[..config.known_pixels];

    let predicted = predict(&report.model, &report.scaler, known_pixels)?;
    let actual = all_pixels[config.target_pixel];
    println!(
        "pix{} predicted vs. actual: {:.3} vs. {}",
        config.target_pixel, predicted, actual
    );

    println!("\nOriginal digit:");
    render_digit(&all_pixels);

    println!("\nKnown prefix only:");
    render_digit(&reconstruct(&all_pixels, config.known_pixels, &BTreeMap::new()));

    println!("\nWith pix{} filled in:", config.target_pixel);
    let mut single = BTreeMap::new();
    single.insert(config.target_pixel, predicted);
    render_digit(&reconstruct(&all_pixels, config.known_pixels, &single));

    // Whole-tail reconstruction: one model per trailing pixel.
    println!("\n=== Reconstructing pixels {}..63 ===", config.known_pixels);
    let bank = RegressorBank::train(&table, &config)?;
    print_loss_table(&bank.losses(), "Bank training losses");

    let predictions = bank.predict_all(known_pixels)?;
    for (&index, &value) in &predictions {
        println!(
            "pix{} predicted vs. actual: {:.3} vs. {}",
            index, value, all_pixels[index]
        );
    }

    println!("\nReconstructed digit:");
    render_digit(&reconstruct(&all_pixels, config.known_pixels, &predictions));

    Ok(())
}
