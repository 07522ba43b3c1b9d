//! Closed-form global minimum-variance weights
//!
//! Minimizes wᵗ Σ w subject to Σ_i w_i = 1, with no other constraints
//! (short positions are allowed). With u the all-ones vector:
//!
//! w = (u · Σ⁻¹) / (u · Σ⁻¹ · uᵗ)
//!
//! The denominator is a scalar that normalises the weights to sum to one.

use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

/// Minimum-variance weight solver
#[derive(Debug, Clone, Copy)]
pub struct MinVarianceSolver {
    tolerance: f64,
}

impl MinVarianceSolver {
    /// Create a solver using the configured degenerate tolerance.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tolerance: config.degenerate_tolerance,
        })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self> {
        Self::new(RiskConfig::default())
    }

    /// Relative tolerance for the normalisation denominator.
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve for the weights given an inverted covariance matrix.
    ///
    /// # Errors
    /// Returns [`RiskError::DegenerateSolution`] when u · Σ⁻¹ · uᵗ is
    /// non-finite or numerically zero relative to the magnitude of Σ⁻¹, and
    /// [`RiskError::InvalidParameter`] for an empty or non-square input.
    pub fn solve(&self, cov_inv: &Array2<f64>) -> Result<Array1<f64>> {
        let (n, m) = cov_inv.dim();
        if n != m || n == 0 {
            return Err(RiskError::InvalidParameter(format!(
                "inverse covariance must be a non-empty square matrix, got {n}x{m}"
            )));
        }

        // u · Σ⁻¹ is the vector of column sums; summing it gives u · Σ⁻¹ · uᵗ
        let raw = cov_inv.sum_axis(Axis(0));
        let denominator = raw.sum();
        let scale = cov_inv.iter().map(|v| v.abs()).sum::<f64>();

        if !denominator.is_finite() || denominator.abs() <= self.tolerance * scale {
            return Err(RiskError::DegenerateSolution {
                assets: n,
                denominator,
            });
        }

        let weights = raw / denominator;
        debug!(assets = n, denominator, "solved minimum-variance weights");
        Ok(weights)
    }
}

/// Minimum-variance weights with the default tolerance.
///
/// # Errors
/// See [`MinVarianceSolver::solve`].
pub fn min_variance_weights(cov_inv: &Array2<f64>) -> Result<Array1<f64>> {
    MinVarianceSolver::try_default()?.solve(cov_inv)
}
