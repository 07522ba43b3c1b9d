//! Error types for period and portfolio analytics.

use crate::covariance::CovarianceError;
use hobart_data::DataError;
use thiserror::Error;

/// Result type for risk operations.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Errors raised by period, solver and portfolio computations.
///
/// None of these are recovered internally. Each carries enough context
/// (period label, asset count, vector lengths) to diagnose the failure
/// without re-deriving state.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Weight vector length differs from the period's asset count
    #[error("Dimension mismatch in period {period}: expected {expected} weights, got {actual}")]
    DimensionMismatch {
        /// Period label
        period: String,
        /// Number of asset columns in the period
        expected: usize,
        /// Length of the supplied weight vector
        actual: usize,
    },

    /// Covariance matrix could not be inverted
    #[error(
        "Covariance matrix for period {period} is singular ({assets} assets, {observations} observations)"
    )]
    SingularMatrix {
        /// Period label
        period: String,
        /// Number of asset columns
        assets: usize,
        /// Number of change observations
        observations: usize,
    },

    /// Minimum-variance normalisation denominator is numerically zero
    #[error("Degenerate minimum-variance solution for {assets} assets: denominator {denominator:e}")]
    DegenerateSolution {
        /// Number of assets
        assets: usize,
        /// Value of u · Σ⁻¹ · uᵗ
        denominator: f64,
    },

    /// Not enough change observations for a sample statistic
    #[error(
        "Insufficient data in period {period}: need at least {required} observations, got {actual}"
    )]
    InsufficientData {
        /// Period label
        period: String,
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Asset is not a column of the period
    #[error("Asset {asset} is not part of period {period}")]
    UnknownAsset {
        /// Period label
        period: String,
        /// Requested asset
        asset: String,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Covariance estimation error
    #[error("Covariance error: {0}")]
    Covariance(#[from] CovarianceError),

    /// Joint price table could not be built
    #[error("Frame error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// Series construction error
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}
