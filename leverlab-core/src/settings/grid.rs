//! Cartesian product generator for settings grids.

use thiserror::Error;

/// Fatal grid-construction errors, raised before any simulation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid axis {axis} is empty")]
    EmptyAxis { axis: usize },
    #[error("expected {expected} aligned columns, got {got}")]
    WrongColumnCount { expected: usize, got: usize },
    #[error("aligned column {axis} has {got} rows, expected {expected}")]
    MismatchedColumns {
        axis: usize,
        expected: usize,
        got: usize,
    },
}

/// Expand N independent axes into N aligned columns of length Π(len).
///
/// Row `r` of the output holds one full combination; the first axis varies
/// slowest and the last fastest, so for axes `[a, b]` row `i * b.len() + j`
/// is `(a[i], b[j])`. Pure and deterministic.
pub fn cartesian_product(axes: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, GridError> {
    for (axis, values) in axes.iter().enumerate() {
        if values.is_empty() {
            return Err(GridError::EmptyAxis { axis });
        }
    }
    let total: usize = axes.iter().map(Vec::len).product();

    let mut columns: Vec<Vec<f64>> = axes.iter().map(|_| Vec::with_capacity(total)).collect();
    // repeat[k]: how many consecutive rows each value of axis k spans
    let mut repeat = vec![1usize; axes.len()];
    for k in (0..axes.len().saturating_sub(1)).rev() {
        repeat[k] = repeat[k + 1] * axes[k + 1].len();
    }

    for row in 0..total {
        for (k, values) in axes.iter().enumerate() {
            columns[k].push(values[(row / repeat[k]) % values.len()]);
        }
    }
    Ok(columns)
}
