//! Fixed-weight portfolio over a single period.
//!
//! The portfolio's daily change series is the period's complete change rows
//! times the weight vector:
//!
//! r_p,t = Σ_i w_i r_i,t
//!
//! Every query accepts an optional override weight vector. Overrides are
//! plain arguments to a stateless dot product and never replace the
//! portfolio's own weights.

use crate::error::{Result, RiskError};
use crate::period::Period;
use hobart_data::TimeSeries;
use ndarray::Array1;
use std::sync::Arc;

/// A period plus a weight vector in the period's column order.
#[derive(Debug, Clone)]
pub struct Portfolio {
    period: Arc<Period>,
    weights: Array1<f64>,
    changes: TimeSeries,
}

impl Portfolio {
    /// Create a portfolio.
    ///
    /// # Errors
    /// Returns [`RiskError::DimensionMismatch`] if the weight vector length
    /// differs from the period's asset count.
    pub fn new(period: Arc<Period>, weights: impl Into<Array1<f64>>) -> Result<Self> {
        let weights = weights.into();
        let changes = weighted_changes(&period, &weights)?;
        Ok(Self {
            period,
            weights,
            changes,
        })
    }

    /// Minimum-variance portfolio for a period.
    ///
    /// # Errors
    /// Propagates inversion and solver errors.
    pub fn min_variance(period: Arc<Period>) -> Result<Self> {
        let weights = period.min_variance_weights()?;
        Self::new(period, weights)
    }

    /// Underlying period.
    pub const fn period(&self) -> &Arc<Period> {
        &self.period
    }

    /// Portfolio weights.
    pub const fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Daily change series for the given weights, or the portfolio's own.
    ///
    /// # Errors
    /// Returns [`RiskError::DimensionMismatch`] for an override of the wrong length.
    pub fn daily_changes(&self, weights: Option<&Array1<f64>>) -> Result<TimeSeries> {
        weighted_changes(&self.period, weights.unwrap_or(&self.weights))
    }

    /// Linear blend of the period's per-asset total changes.
    ///
    /// This is Σ_i w_i R_i, where R_i is the asset's first-to-last price
    /// change. It differs from [`Portfolio::compounded_change`].
    ///
    /// # Errors
    /// Returns [`RiskError::DimensionMismatch`] for an override of the wrong length.
    pub fn total_change(&self, weights: Option<&Array1<f64>>) -> Result<f64> {
        let weights = weights.unwrap_or(&self.weights);
        self.check_len(weights)?;
        Ok(self.period.total_changes().dot(weights))
    }

    /// Compounded return of the daily change series, Π(1 + r_p,t) - 1.
    ///
    /// # Errors
    /// Returns [`RiskError::DimensionMismatch`] for an override of the wrong length.
    pub fn compounded_change(&self, weights: Option<&Array1<f64>>) -> Result<f64> {
        let changes = self.daily_changes(weights)?;
        Ok(changes.values().iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0)
    }

    /// Sample variance of the portfolio's own daily changes.
    ///
    /// # Errors
    /// Returns [`RiskError::InsufficientData`] below the period's minimum observations.
    pub fn variance(&self) -> Result<f64> {
        self.check_observations()?;
        Ok(self.changes.view().var(1.0))
    }

    /// Sample standard deviation of the portfolio's own daily changes.
    ///
    /// # Errors
    /// Returns [`RiskError::InsufficientData`] below the period's minimum observations.
    pub fn std_dev(&self) -> Result<f64> {
        self.check_observations()?;
        Ok(self.changes.view().std(1.0))
    }

    /// Quadratic-form variance wᵗ Σ w from the period's covariance matrix.
    ///
    /// Agrees with [`Portfolio::variance`] up to rounding.
    ///
    /// # Errors
    /// Returns [`RiskError::InsufficientData`] below the period's minimum observations.
    pub fn quadratic_variance(&self) -> Result<f64> {
        let cov = self.period.cov_matrix()?;
        Ok(self.weights.dot(&cov.dot(&self.weights)))
    }

    fn check_len(&self, weights: &Array1<f64>) -> Result<()> {
        check_weights(&self.period, weights)
    }

    fn check_observations(&self) -> Result<()> {
        if self.changes.len() < self.period.config().min_observations {
            return Err(self.insufficient_data());
        }
        Ok(())
    }

    fn insufficient_data(&self) -> RiskError {
        RiskError::InsufficientData {
            period: self.period.label(),
            required: self.period.config().min_observations,
            actual: self.changes.len(),
        }
    }
}

fn check_weights(period: &Period, weights: &Array1<f64>) -> Result<()> {
    if weights.len() != period.n_assets() {
        return Err(RiskError::DimensionMismatch {
            period: period.label(),
            expected: period.n_assets(),
            actual: weights.len(),
        });
    }
    Ok(())
}

fn weighted_changes(period: &Period, weights: &Array1<f64>) -> Result<TimeSeries> {
    check_weights(period, weights)?;
    let values = period.complete_change_matrix().dot(weights).to_vec();
    Ok(TimeSeries::new(period.complete_change_dates().to_vec(), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use hobart_data::AssetName;
    use ndarray::{Array2, array};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, d).unwrap()
    }

    fn period() -> Arc<Period> {
        Arc::new(
            Period::new(
                vec![date(1), date(2), date(3), date(4)],
                vec![AssetName::Oil, AssetName::Gold, AssetName::UsTenYearBond],
                array![
                    [40.0, 1700.0, 100.0],
                    [41.0, 1690.0, 100.2],
                    [39.5, 1710.0, 100.1],
                    [40.5, 1720.0, 99.9],
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_daily_changes_are_weighted_sum() {
        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        let changes = portfolio.daily_changes(None).unwrap();
        let matrix = portfolio.period().change_matrix();

        assert_eq!(changes.len(), 3);
        for t in 0..3 {
            let expected =
                0.5 * matrix[[t, 0]] + 0.3 * matrix[[t, 1]] + 0.2 * matrix[[t, 2]];
            assert_abs_diff_eq!(changes.values()[t], expected, epsilon = 1e-15);
        }
        assert_eq!(changes.dates(), portfolio.period().change_dates());
    }

    #[test]
    fn test_wrong_length_fails() {
        let result = Portfolio::new(period(), vec![0.5, 0.5]);
        assert!(matches!(
            result,
            Err(RiskError::DimensionMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));

        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        let bad = array![1.0];
        assert!(portfolio.daily_changes(Some(&bad)).is_err());
        assert!(portfolio.total_change(Some(&bad)).is_err());
    }

    #[test]
    fn test_override_does_not_mutate() {
        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        let original = portfolio.daily_changes(None).unwrap();

        let first = portfolio.daily_changes(Some(&array![1.0, 0.0, 0.0])).unwrap();
        let second = portfolio.daily_changes(Some(&array![0.0, 0.0, 1.0])).unwrap();
        assert_ne!(first, second);

        assert_eq!(portfolio.weights(), &array![0.5, 0.3, 0.2]);
        assert_eq!(portfolio.daily_changes(None).unwrap(), original);
    }

    #[test]
    fn test_single_asset_override_matches_period_column() {
        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        let gold = portfolio.daily_changes(Some(&array![0.0, 1.0, 0.0])).unwrap();
        let expected = portfolio.period().change_series(AssetName::Gold).unwrap();
        assert_eq!(gold, expected);
    }

    #[test]
    fn test_total_change_is_linear_blend() {
        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        let p = portfolio.period();
        let expected = 0.5 * p.total_change(AssetName::Oil).unwrap()
            + 0.3 * p.total_change(AssetName::Gold).unwrap()
            + 0.2 * p.total_change(AssetName::UsTenYearBond).unwrap();

        assert_abs_diff_eq!(portfolio.total_change(None).unwrap(), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_compounded_differs_from_total_change() {
        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        let linear = portfolio.total_change(None).unwrap();
        let compounded = portfolio.compounded_change(None).unwrap();
        assert!((linear - compounded).abs() > 1e-9);

        // A single-asset allocation compounds back to the asset's own total change
        let oil = array![1.0, 0.0, 0.0];
        assert_abs_diff_eq!(
            portfolio.compounded_change(Some(&oil)).unwrap(),
            portfolio.total_change(Some(&oil)).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_variance_agrees_with_quadratic_form() {
        let portfolio = Portfolio::new(period(), vec![0.5, 0.3, 0.2]).unwrap();
        assert_abs_diff_eq!(
            portfolio.variance().unwrap(),
            portfolio.quadratic_variance().unwrap(),
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            portfolio.std_dev().unwrap(),
            portfolio.variance().unwrap().sqrt(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_zero_changes_give_zero_series() {
        let flat = Arc::new(
            Period::new(
                vec![date(1), date(2), date(3)],
                vec![AssetName::Corn, AssetName::Gold],
                Array2::from_elem((3, 2), 5.0),
            )
            .unwrap(),
        );
        let portfolio = Portfolio::new(flat, vec![0.7, 0.3]).unwrap();

        let changes = portfolio.daily_changes(None).unwrap();
        assert!(changes.values().iter().all(|v| *v == 0.0));
        assert_eq!(portfolio.variance().unwrap(), 0.0);
    }

    #[test]
    fn test_late_asset_restricts_daily_changes() {
        let staggered = Arc::new(
            Period::new(
                vec![date(1), date(2), date(3), date(4), date(5)],
                vec![AssetName::Oil, AssetName::JapanEquity],
                array![
                    [40.0, f64::NAN],
                    [41.0, f64::NAN],
                    [39.5, 280.0],
                    [40.5, 284.0],
                    [40.0, 281.0],
                ],
            )
            .unwrap(),
        );
        let portfolio = Portfolio::new(staggered, vec![0.6, 0.4]).unwrap();

        let changes = portfolio.daily_changes(None).unwrap();
        assert_eq!(changes.dates(), &[date(4), date(5)]);
        assert!(changes.values().iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(
            portfolio.variance().unwrap(),
            portfolio.quadratic_variance().unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_short_period_variance_is_insufficient() {
        let short = Arc::new(
            Period::new(
                vec![date(1), date(2)],
                vec![AssetName::Corn],
                array![[5.0], [5.5]],
            )
            .unwrap(),
        );
        let portfolio = Portfolio::new(short, vec![1.0]).unwrap();

        assert!(matches!(
            portfolio.variance(),
            Err(RiskError::InsufficientData { actual: 1, .. })
        ));
        assert_abs_diff_eq!(portfolio.total_change(None).unwrap(), 0.1, epsilon = 1e-12);
    }
}
