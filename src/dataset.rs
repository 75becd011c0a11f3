//! Loading the 8x8 digit table from CSV.
use crate::error::PipelineError;
use crate::layers::Matrix;
use anyhow::{anyhow, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Pixel columns per digit row.
pub const PIXELS: usize = 64;
/// Side length of the square digit image.
pub const GRID_SIDE: usize = 8;
/// Index of the digit label column, directly after the pixels.
pub const LABEL_COLUMN: usize = 64;
/// Columns kept per row: 64 pixels plus the label.
pub const TABLE_COLUMNS: usize = 65;

/// The loaded digit dataset: an N x 65 numeric table with named columns.
///
/// Columns 0..63 are pixel intensities (0..16, stored as f64), column 64 is
/// the digit label. The name-to-index lookup is built once at load time.
#[derive(Debug, Clone)]
pub struct DigitTable {
    rows: Matrix,
    columns: Vec<String>,
    col_index: HashMap<String, usize>,
}

impl DigitTable {
    /// Build a table from already-parsed rows. Every row must carry exactly
    /// [`TABLE_COLUMNS`] values matching the column names.
    pub fn from_rows(rows: Matrix, columns: Vec<String>) -> Result<Self> {
        if columns.len() != TABLE_COLUMNS {
            return Err(PipelineError::DatasetFormat(format!(
                "expected {} column names, found {}",
                TABLE_COLUMNS,
                columns.len()
            ))
            .into());
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != TABLE_COLUMNS {
                return Err(PipelineError::DatasetFormat(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    TABLE_COLUMNS
                ))
                .into());
            }
        }
        let col_index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Ok(Self {
            rows,
            columns,
            col_index,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &Matrix {
        &self.rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Index of a column by name, e.g. `"pix52"`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.col_index.get(name).copied()
    }

    /// All 64 pixel values of one digit row.
    pub fn pixels(&self, row: usize) -> &[f64] {
        &self.rows[row][..PIXELS]
    }

    /// Digit label (0-9) of one row.
    pub fn label(&self, row: usize) -> u8 {
        self.rows[row][LABEL_COLUMN] as u8
    }

    /// One full column as a vector.
    pub fn column_values(&self, col: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[col]).collect()
    }
}

/// The canonical column names: `pix0..pix63` plus `label`.
pub fn digit_column_names() -> Vec<String> {
    let mut names: Vec<String> = (0..PIXELS).map(|i| format!("pix{}", i)).collect();
    names.push("label".to_string());
    names
}

/// Load the digit table from a headered CSV file.
///
/// The source file carries one malformed trailing column past the label; it
/// is dropped here so exactly [`TABLE_COLUMNS`] columns remain. A wrong
/// column count or a non-numeric cell aborts the load.
pub fn load_digits<P: AsRef<Path>>(path: P) -> Result<DigitTable> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
    // Flexible width: record lengths are checked below.
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers().map_err(|e| anyhow!("CSV header error: {}", e))?;
    let raw_width = headers.len();
    if raw_width != TABLE_COLUMNS && raw_width != TABLE_COLUMNS + 1 {
        return Err(PipelineError::DatasetFormat(format!(
            "expected {} or {} columns, found {}",
            TABLE_COLUMNS,
            TABLE_COLUMNS + 1,
            raw_width
        ))
        .into());
    }
    let columns: Vec<String> = headers.iter().take(TABLE_COLUMNS).map(String::from).collect();

    let mut rows: Matrix = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| anyhow!("CSV parse error: {}", e))?;
        if record.len() != raw_width {
            return Err(PipelineError::DatasetFormat(format!(
                "row {} has {} values, expected {}",
                i,
                record.len(),
                raw_width
            ))
            .into());
        }
        let mut row = Vec::with_capacity(TABLE_COLUMNS);
        for (j, cell) in record.iter().take(TABLE_COLUMNS).enumerate() {
            let value: f64 = cell.trim().parse().map_err(|_| {
                PipelineError::DatasetFormat(format!(
                    "non-numeric cell '{}' at row {}, column {} ({})",
                    cell, i, j, columns[j]
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    DigitTable::from_rows(rows, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pixel_regress_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    fn csv_with_rows(rows: &[Vec<f64>], extra_column: bool) -> String {
        let mut out = digit_column_names().join(",");
        if extra_column {
            out.push_str(",junk");
        }
        out.push('\n');
        for row in rows {
            let mut line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            if extra_column {
                line.push_str(",?");
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn sample_row(seed: f64) -> Vec<f64> {
        let mut row: Vec<f64> = (0..PIXELS).map(|i| ((i as f64 + seed) % 17.0).floor()).collect();
        row.push(seed % 10.0);
        row
    }

    #[test]
    fn loads_and_drops_the_malformed_column() {
        let rows = vec![sample_row(0.0), sample_row(1.0), sample_row(2.0)];
        let path = temp_csv("drop.csv", &csv_with_rows(&rows, true));
        let table = load_digits(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column_names().len(), TABLE_COLUMNS);
        assert_eq!(table.column("pix52"), Some(52));
        assert_eq!(table.column("label"), Some(LABEL_COLUMN));
        assert_eq!(table.column("junk"), None);
        assert_eq!(table.label(1), 1);
        assert_eq!(table.pixels(0).len(), PIXELS);
    }

    #[test]
    fn accepts_an_already_clean_table() {
        let rows = vec![sample_row(3.0)];
        let path = temp_csv("clean.csv", &csv_with_rows(&rows, false));
        let table = load_digits(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn rejects_wrong_column_count() {
        let path = temp_csv("narrow.csv", "a,b,c\n1,2,3\n");
        let err = load_digits(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn rejects_non_numeric_cells() {
        // sample_row(0.0) holds 10 at pix10; the padded match skips the header.
        let text = csv_with_rows(&[sample_row(0.0)], false).replacen(",10,", ",oops,", 1);
        let path = temp_csv("nonnum.csv", &text);
        let err = load_digits(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn column_values_follow_the_schema() {
        let rows = vec![sample_row(0.0), sample_row(5.0)];
        let table = DigitTable::from_rows(rows.clone(), digit_column_names()).unwrap();
        assert_eq!(table.column_values(52), vec![rows[0][52], rows[1][52]]);
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = DigitTable::from_rows(vec![vec![1.0; 10]], digit_column_names()).unwrap_err();
        assert!(err.to_string().contains("expected 65"));
    }
}
