//! The end-to-end regression workflow: split, scale, train, evaluate, and
//! the per-target model table used for whole-tail reconstruction.
use crate::config::ExperimentConfig;
use crate::dataset::DigitTable;
use crate::metrics::evaluate;
use crate::network::MlpRegressor;
use crate::scaler::StandardScaler;
use crate::split::{pixel_column, pixel_features, trailing_columns, train_test_split};
use crate::utils::print_prediction_table;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// Outcome of the single-target experiment.
#[derive(Debug)]
pub struct ExperimentReport {
    pub target_pixel: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Final training MSE of the diagnostic model fit on the train split.
    pub diagnostic_loss: f64,
    /// Mean absolute error of the diagnostic model over the held-out rows.
    pub mean_absolute_error: f64,
    /// Final training MSE of the model re-fit on the full dataset.
    pub final_loss: f64,
    /// The full-dataset model, paired with the scaler it was trained under.
    pub model: MlpRegressor,
    pub scaler: StandardScaler,
}

/// Predict one pixel value from a raw (unscaled) feature row. The companion
/// scaler is applied before the model sees the row.
pub fn predict(
    model: &MlpRegressor,
    scaler: &StandardScaler,
    raw_features: &[f64],
) -> Result<f64> {
    let scaled = scaler.transform_row(raw_features)?;
    model.predict_scaled(&scaled)
}

/// Run the canonical single-target experiment.
///
/// Splits features and the target column with one shared permutation, fits
/// the scaler on the training rows only, trains a diagnostic model on the
/// scaled train split, evaluates it on the held-out rows, then re-fits a
/// final model on the full scaled dataset with the same scaler.
pub fn run_experiment(table: &DigitTable, config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;
    let mut rng = config.rng();

    let features = pixel_features(table, config.known_pixels)?;
    let targets = pixel_column(table, config.target_pixel)?;
    let split = train_test_split(&features, &targets, config.test_fraction, &mut rng)?;

    let scaler = StandardScaler::fit_with(&split.x_train, config.scale_features)?;
    if config.verbose && scaler.degenerate_columns() > 0 {
        println!(
            "{} zero-variance feature columns; unit scale substituted",
            scaler.degenerate_columns()
        );
    }
    let x_train = scaler.transform(&split.x_train)?;
    let x_test = scaler.transform(&split.x_test)?;

    // Diagnostic fit on the training split only; test rows stay held out.
    let mut diagnostic = MlpRegressor::new(config.known_pixels, config, &mut rng);
    diagnostic.fit(&x_train, &split.y_train, config, &mut rng)?;
    let diagnostic_loss = diagnostic
        .loss()
        .ok_or_else(|| anyhow!("diagnostic model reported no training loss"))?;

    let report = evaluate(&diagnostic, &x_test, &split.y_test)?;
    if config.verbose {
        print_prediction_table(&diagnostic, &scaler, &x_test, &split.y_test)?;
    }

    // Final model: same scaler, every row.
    let x_all = scaler.transform(&features)?;
    let mut model = MlpRegressor::new(config.known_pixels, config, &mut rng);
    model.fit(&x_all, &targets, config, &mut rng)?;
    let final_loss = model
        .loss()
        .ok_or_else(|| anyhow!("final model reported no training loss"))?;

    Ok(ExperimentReport {
        target_pixel: config.target_pixel,
        train_rows: split.train_rows(),
        test_rows: split.test_rows(),
        diagnostic_loss,
        mean_absolute_error: report.mean_absolute_error,
        final_loss,
        model,
        scaler,
    })
}

/// One trained regressor per trailing pixel, sharing a single fitted scaler.
///
/// The scaler is strictly parameterized by the bank's known-pixel count and
/// fit on the same rows the models train on; models share nothing else.
#[derive(Debug)]
pub struct RegressorBank {
    known: usize,
    scaler: StandardScaler,
    models: BTreeMap<usize, MlpRegressor>,
}

impl RegressorBank {
    /// Fit one model per pixel in `[known_pixels, 64)` on the full dataset.
    pub fn train(table: &DigitTable, config: &ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = config.rng();

        let features = pixel_features(table, config.known_pixels)?;
        let scaler = StandardScaler::fit_with(&features, config.scale_features)?;
        let scaled = scaler.transform(&features)?;

        let mut models = BTreeMap::new();
        for (index, column) in trailing_columns(table, config.known_pixels)? {
            let mut model = MlpRegressor::new(config.known_pixels, config, &mut rng);
            model.fit(&scaled, &column, config, &mut rng)?;
            if config.verbose {
                println!(
                    "pix{}: final training loss {:.6}",
                    index,
                    model.loss().unwrap_or(f64::NAN)
                );
            }
            models.insert(index, model);
        }

        Ok(Self {
            known: config.known_pixels,
            scaler,
            models,
        })
    }

    pub fn known_pixels(&self) -> usize {
        self.known
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self, target: usize) -> Option<&MlpRegressor> {
        self.models.get(&target)
    }

    /// Trained target pixel indices, ascending.
    pub fn target_indices(&self) -> Vec<usize> {
        self.models.keys().copied().collect()
    }

    /// Final training loss per target pixel, ascending by index.
    pub fn losses(&self) -> Vec<(usize, f64)> {
        self.models
            .iter()
            .map(|(&index, model)| (index, model.loss().unwrap_or(f64::NAN)))
            .collect()
    }

    /// Predict one target pixel from the raw known-pixel prefix.
    pub fn predict_pixel(&self, raw_known: &[f64], target: usize) -> Result<f64> {
        let model = self
            .models
            .get(&target)
            .ok_or_else(|| anyhow!("no model trained for pix{}", target))?;
        predict(model, &self.scaler, raw_known)
    }

    /// Predict every trained target pixel from the raw known-pixel prefix.
    pub fn predict_all(&self, raw_known: &[f64]) -> Result<BTreeMap<usize, f64>> {
        let scaled = self.scaler.transform_row(raw_known)?;
        let mut predictions = BTreeMap::new();
        for (&index, model) in &self.models {
            predictions.insert(index, model.predict_scaled(&scaled)?);
        }
        Ok(predictions)
    }
}
