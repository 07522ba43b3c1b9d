//! Numerical configuration shared by periods and the solver.

use crate::error::RiskError;
use serde::{Deserialize, Serialize};

/// Tolerances and data requirements for period statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Minimum number of change observations for variance and covariance (default: 2)
    pub min_observations: usize,

    /// Relative pivot threshold below which the covariance matrix is treated
    /// as singular (default: 1e-12)
    pub singular_tolerance: f64,

    /// Relative threshold below which the minimum-variance denominator is
    /// treated as zero (default: 1e-12)
    pub degenerate_tolerance: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_observations: 2,
            singular_tolerance: 1e-12,
            degenerate_tolerance: 1e-12,
        }
    }
}

impl RiskConfig {
    /// Check that all parameters are usable.
    ///
    /// # Errors
    /// Returns an error for fewer than 2 observations or a negative or
    /// non-finite tolerance.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.min_observations < 2 {
            return Err(RiskError::InvalidParameter(format!(
                "min_observations must be at least 2, got {}",
                self.min_observations
            )));
        }

        for (name, value) in [
            ("singular_tolerance", self.singular_tolerance),
            ("degenerate_tolerance", self.degenerate_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RiskError::InvalidParameter(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }

        Ok(())
    }
}
