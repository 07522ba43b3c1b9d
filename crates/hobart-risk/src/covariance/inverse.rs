//! Matrix inversion through an LU decomposition with partial pivoting.
//!
//! A diagonal entry of U whose magnitude falls below `tolerance` times the
//! largest absolute entry of the input marks the matrix as singular, so
//! covariances of daily changes (entries around 1e-4) are judged on their
//! own scale.

use super::CovarianceError;
use nalgebra::DMatrix;
use ndarray::Array2;

/// Invert a square matrix.
///
/// # Errors
/// Returns [`CovarianceError::Singular`] when a pivot of the LU
/// decomposition falls below the relative tolerance or an entry is not
/// finite, and [`CovarianceError::DimensionMismatch`] for a non-square input.
pub fn invert_matrix(matrix: &Array2<f64>, tolerance: f64) -> Result<Array2<f64>, CovarianceError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(CovarianceError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let scale = matrix.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if n == 0 || scale == 0.0 || matrix.iter().any(|v| !v.is_finite()) {
        return Err(CovarianceError::Singular {
            column: 0,
            pivot: 0.0,
        });
    }

    let lu = DMatrix::from_fn(n, n, |i, j| matrix[[i, j]]).lu();
    let (column, pivot) = lu
        .u()
        .diagonal()
        .iter()
        .map(|u| u.abs())
        .enumerate()
        .fold((0, f64::INFINITY), |min, (col, u)| if u < min.1 { (col, u) } else { min });
    if pivot <= tolerance * scale {
        return Err(CovarianceError::Singular { column, pivot });
    }

    let inverse = lu
        .try_inverse()
        .ok_or(CovarianceError::Singular { column, pivot })?;
    Ok(Array2::from_shape_fn((n, n), |(i, j)| inverse[(i, j)]))
}
