//! Pearson correlation from a covariance matrix
//!
//! Corr(i,j) = Cov(i,j) / (σ_i σ_j)
//!
//! The diagonal is set to exactly 1.0. Assets with zero variance have an
//! undefined correlation, reported as NaN across their row and column.

use super::CovarianceError;
use ndarray::Array2;

/// Derive the correlation matrix from a covariance matrix.
///
/// # Errors
/// Returns an error if the matrix is not square.
pub fn correlation_from_covariance(cov: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
    let n = cov.nrows();
    if n != cov.ncols() {
        return Err(CovarianceError::DimensionMismatch {
            expected: n,
            actual: cov.ncols(),
        });
    }

    let std_devs: Vec<f64> = (0..n).map(|i| cov[[i, i]].sqrt()).collect();
    let mut corr = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in i..n {
            let denom = std_devs[i] * std_devs[j];
            let value = if denom > 0.0 {
                if i == j { 1.0 } else { cov[[i, j]] / denom }
            } else {
                f64::NAN
            };
            corr[[i, j]] = value;
            corr[[j, i]] = value;
        }
    }

    Ok(corr)
}
