//! Sample (Bessel-corrected) covariance estimator
//!
//! Cov(i,j) = Σ_t (r_{i,t} - mean_i)(r_{j,t} - mean_j) / (T - 1)
//!
//! Only the upper triangle is computed; the lower triangle mirrors it so the
//! result is exactly symmetric.

use super::{CovarianceError, CovarianceEstimator};
use ndarray::{Array2, Axis};

/// Sample covariance estimator
#[derive(Debug, Clone, Copy)]
pub struct SampleCovarianceEstimator {
    min_observations: usize,
}

impl Default for SampleCovarianceEstimator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl SampleCovarianceEstimator {
    /// Create an estimator requiring at least `min_observations` rows.
    ///
    /// Values below 2 are raised to 2, the minimum for a divisor of T - 1.
    pub fn new(min_observations: usize) -> Self {
        Self {
            min_observations: min_observations.max(2),
        }
    }

    /// Minimum number of rows required.
    pub const fn min_observations(&self) -> usize {
        self.min_observations
    }
}

impl CovarianceEstimator for SampleCovarianceEstimator {
    fn estimate(&self, changes: &Array2<f64>) -> Result<Array2<f64>, CovarianceError> {
        let (n_obs, n_assets) = changes.dim();

        if n_obs < self.min_observations {
            return Err(CovarianceError::InsufficientData {
                required: self.min_observations,
                actual: n_obs,
            });
        }

        let means = changes
            .mean_axis(Axis(0))
            .ok_or(CovarianceError::InsufficientData {
                required: self.min_observations,
                actual: 0,
            })?;
        let centered = changes - &means;
        let divisor = (n_obs - 1) as f64;

        let mut cov = Array2::<f64>::zeros((n_assets, n_assets));
        for i in 0..n_assets {
            for j in i..n_assets {
                let value = centered.column(i).dot(&centered.column(j)) / divisor;
                cov[[i, j]] = value;
                cov[[j, i]] = value;
            }
        }

        Ok(cov)
    }
}
