//! Domain errors surfaced by the regression pipeline.
use std::error::Error;
use std::fmt;

/// Fatal pipeline errors.
///
/// Recoverable conditions (off-size render vectors, zero-variance feature
/// columns) are handled where they occur and never become a `PipelineError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Wrong column count or a non-numeric cell in the source table.
    DatasetFormat(String),
    /// Feature/target dimensions disagree at a split or model boundary.
    ShapeMismatch {
        expected: usize,
        found: usize,
        what: &'static str,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::DatasetFormat(msg) => write!(f, "dataset format error: {}", msg),
            PipelineError::ShapeMismatch {
                expected,
                found,
                what,
            } => write!(
                f,
                "shape mismatch in {}: expected {}, found {}",
                what, expected, found
            ),
        }
    }
}

impl Error for PipelineError {}
