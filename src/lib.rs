//! Pixel-value regression over 8x8 handwritten digits: train feed-forward
//! regressors that predict held-out pixels from a known prefix, and
//! reassemble the image for display.
//!
//! - CSV digit-table loading with a fixed 65-column schema
//! - Shared-permutation train/test splitting and per-feature standardization
//! - One SGD-trained regressor per target pixel, sharing a single scaler
//! - Evaluation tables and console image reconstruction

pub mod activations;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod pipeline;
pub mod reconstruct;
pub mod scaler;
pub mod split;
pub mod utils;

pub use activations::{Activation, ActivationKind, Linear, ReLU, Sigmoid, Tanh};
pub use config::ExperimentConfig;
pub use dataset::{digit_column_names, load_digits, DigitTable, GRID_SIDE, LABEL_COLUMN, PIXELS};
pub use error::PipelineError;
pub use layers::{DenseLayer, Matrix};
pub use loss::{mse_deriv, mse_loss};
pub use metrics::{evaluate, EvaluationReport};
pub use network::MlpRegressor;
pub use pipeline::{predict, run_experiment, ExperimentReport, RegressorBank};
pub use reconstruct::{fit_to_grid, reconstruct, render_digit};
pub use scaler::StandardScaler;
pub use split::{
    pixel_column, pixel_features, shuffle_rows, trailing_columns, train_test_split, TrainTestSplit,
};
pub use utils::{print_loss_table, print_model_summary, print_prediction_table};
