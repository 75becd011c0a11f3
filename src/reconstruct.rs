//! Reassembling a full digit image from known pixels and predicted pixels.
use crate::dataset::{GRID_SIDE, PIXELS};
use std::collections::BTreeMap;

/// Largest pixel intensity in the digit data; used to normalize rendering.
const MAX_INTENSITY: f64 = 16.0;

/// Compose a display vector from a digit's raw pixels and model predictions.
///
/// The result is always 64 long: a verbatim copy of the input below `known`,
/// the rounded predicted value where the map has an entry, and zero for the
/// rest of the tail. The caller's vector is never touched; an empty map with
/// `known` = 64 therefore returns the original unchanged.
pub fn reconstruct(pixels: &[f64], known: usize, predictions: &BTreeMap<usize, f64>) -> Vec<f64> {
    (0..PIXELS)
        .map(|i| {
            if i < known {
                pixels.get(i).copied().unwrap_or(0.0)
            } else {
                predictions.get(&i).map_or(0.0, |&p| p.round())
            }
        })
        .collect()
}

/// Pad with zeros or truncate so the renderer always gets a full 8x8 grid.
/// Off-size input usually means a caller bug, so the adjustment is reported.
pub fn fit_to_grid(pixels: &[f64]) -> Vec<f64> {
    if pixels.len() != PIXELS {
        println!(
            "(render) pixel vector length {} adjusted to {}",
            pixels.len(),
            PIXELS
        );
    }
    let mut grid: Vec<f64> = pixels.iter().copied().take(PIXELS).collect();
    grid.resize(PIXELS, 0.0);
    grid
}

/// Print the digit as an 8x8 intensity grid on the console.
///
/// Intensities 0..16 map onto a shade ramp from blank to solid; each cell is
/// doubled horizontally so the grid stays roughly square in a terminal.
pub fn render_digit(pixels: &[f64]) {
    const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
    let grid = fit_to_grid(pixels);
    for row in grid.chunks(GRID_SIDE) {
        let mut line = String::with_capacity(GRID_SIDE * 2);
        for &value in row {
            let level = (value.clamp(0.0, MAX_INTENSITY) / MAX_INTENSITY
                * (RAMP.len() - 1) as f64)
                .round() as usize;
            line.push(RAMP[level]);
            line.push(RAMP[level]);
        }
        println!("{}", line);
    }
}
