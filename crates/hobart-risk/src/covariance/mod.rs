//! Covariance estimation
//!
//! Provides the sample covariance estimator used by yearly periods, the
//! Pearson correlation derived from a covariance matrix, and the matrix
//! inversion feeding the minimum-variance solver.

pub mod correlation;
pub mod inverse;
pub mod sample;

pub use correlation::correlation_from_covariance;
pub use inverse::invert_matrix;
pub use sample::SampleCovarianceEstimator;

use ndarray::Array2;
use thiserror::Error;

/// Errors that can occur during covariance estimation
#[derive(Debug, Error)]
pub enum CovarianceError {
    /// Insufficient data for estimation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Matrix is singular or too ill-conditioned to invert
    #[error("Matrix is singular: pivot {pivot:e} at column {column}")]
    Singular {
        /// Column of the smallest LU pivot
        column: usize,
        /// Magnitude of that pivot
        pivot: f64,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },
}

/// Trait for covariance matrix estimators
pub trait CovarianceEstimator {
    /// Estimate the covariance matrix from asset changes
    ///
    /// # Arguments
    /// * `changes` - Matrix where each row is a date and each column is an asset
    ///
    /// # Returns
    /// * Estimated covariance matrix (N x N where N is number of assets)
    fn estimate(&self, changes: &Array2<f64>) -> Result<Array2<f64>, CovarianceError>;
}
