//! Feature/target column partitioning and shuffled train/test splits.
use crate::dataset::{DigitTable, PIXELS};
use crate::error::PipelineError;
use crate::layers::Matrix;
use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Feature rows: the first `known` pixel columns of every digit.
pub fn pixel_features(table: &DigitTable, known: usize) -> Result<Matrix> {
    check_known(known)?;
    Ok(table
        .rows()
        .iter()
        .map(|row| row[..known].to_vec())
        .collect())
}

/// One target pixel column.
pub fn pixel_column(table: &DigitTable, index: usize) -> Result<Vec<f64>> {
    if index >= PIXELS {
        return Err(anyhow!(
            "target pixel index must be below {}, got {}",
            PIXELS,
            index
        ));
    }
    Ok(table.column_values(index))
}

/// Every trailing target column `[known, 64)`, paired with its pixel index.
pub fn trailing_columns(table: &DigitTable, known: usize) -> Result<Vec<(usize, Vec<f64>)>> {
    check_known(known)?;
    Ok((known..PIXELS)
        .map(|index| (index, table.column_values(index)))
        .collect())
}

fn check_known(known: usize) -> Result<()> {
    if known == 0 || known >= PIXELS {
        return Err(anyhow!(
            "known pixel count must be within 1..{}, got {}",
            PIXELS,
            known
        ));
    }
    Ok(())
}

/// Features and targets partitioned into train and test rows with one
/// permutation shared by both sides, so row correspondence is preserved.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Matrix,
    pub x_test: Matrix,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

impl TrainTestSplit {
    pub fn train_rows(&self) -> usize {
        self.x_train.len()
    }

    pub fn test_rows(&self) -> usize {
        self.x_test.len()
    }
}

/// Reorder features and targets with a single shared random permutation.
pub fn shuffle_rows<R: Rng + ?Sized>(
    features: &Matrix,
    targets: &[f64],
    rng: &mut R,
) -> Result<(Matrix, Vec<f64>)> {
    if features.len() != targets.len() {
        return Err(PipelineError::ShapeMismatch {
            expected: features.len(),
            found: targets.len(),
            what: "target column",
        }
        .into());
    }
    let mut indices: Vec<usize> = (0..features.len()).collect();
    indices.shuffle(rng);
    let shuffled_x = indices.iter().map(|&i| features[i].clone()).collect();
    let shuffled_y = indices.iter().map(|&i| targets[i]).collect();
    Ok((shuffled_x, shuffled_y))
}

/// Shuffle with one shared permutation, then hold out `test_fraction` of the
/// rows (rounded, at least one on each side).
///
/// Each call draws fresh randomness from the supplied RNG; repeated runs give
/// different splits unless the RNG is seeded.
pub fn train_test_split<R: Rng + ?Sized>(
    features: &Matrix,
    targets: &[f64],
    test_fraction: f64,
    rng: &mut R,
) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(anyhow!(
            "test fraction must be within (0, 1), got {}",
            test_fraction
        ));
    }
    let n = features.len();
    if n < 2 {
        return Err(anyhow!("need at least 2 rows to split, got {}", n));
    }
    let (shuffled_x, shuffled_y) = shuffle_rows(features, targets, rng)?;

    let test_rows = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
    let split_at = n - test_rows;

    let (x_train, x_test) = shuffled_x.split_at(split_at);
    let (y_train, y_test) = shuffled_y.split_at(split_at);
    Ok(TrainTestSplit {
        x_train: x_train.to_vec(),
        x_test: x_test.to_vec(),
        y_train: y_train.to_vec(),
        y_test: y_test.to_vec(),
    })
}
