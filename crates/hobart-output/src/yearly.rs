//! Per-asset statistics by year.

use hobart_data::AssetName;
use hobart_risk::{Period, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One row of a yearly table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyRow {
    /// Period label (year).
    pub period: String,

    /// Statistic value.
    pub value: f64,
}

/// A named statistic for one asset, one row per period in period order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyTable {
    /// Asset the statistic belongs to.
    pub asset: AssetName,

    /// Name of the statistic.
    pub statistic: String,

    /// Rows in period order.
    pub rows: Vec<YearlyRow>,
}

impl YearlyTable {
    /// Build a table by evaluating `f` on every period.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn build<F>(
        asset: AssetName,
        statistic: &str,
        periods: &[Arc<Period>],
        f: F,
    ) -> Result<Self, RiskError>
    where
        F: Fn(&Period) -> Result<f64, RiskError>,
    {
        let rows = periods
            .iter()
            .map(|period| {
                Ok(YearlyRow {
                    period: period.label(),
                    value: f(period)?,
                })
            })
            .collect::<Result<Vec<_>, RiskError>>()?;

        Ok(Self {
            asset,
            statistic: statistic.to_string(),
            rows,
        })
    }

    /// Look up the value for a period label.
    pub fn get(&self, period: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.period == period)
            .map(|row| row.value)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for YearlyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.asset, self.statistic)?;
        for row in &self.rows {
            writeln!(f, "  {:<6} {:>12.6}", row.period, row.value)?;
        }
        Ok(())
    }
}

/// Years in which the asset has too few changes are reported as NaN.
fn nan_if_insufficient(value: Result<f64, RiskError>) -> Result<f64, RiskError> {
    match value {
        Err(RiskError::InsufficientData { .. }) => Ok(f64::NAN),
        other => other,
    }
}

/// Standard deviation of an asset's daily changes, by year.
///
/// A year with fewer than the minimum number of changes for the asset
/// holds NaN.
///
/// # Errors
/// Fails if the asset is missing.
pub fn std_dev_by_year(asset: AssetName, periods: &[Arc<Period>]) -> Result<YearlyTable, RiskError> {
    YearlyTable::build(asset, "std_dev", periods, |p| nan_if_insufficient(p.std_dev(asset)))
}

/// Variance of an asset's daily changes, by year.
///
/// A year with fewer than the minimum number of changes for the asset
/// holds NaN.
///
/// # Errors
/// Fails if the asset is missing.
pub fn var_by_year(asset: AssetName, periods: &[Arc<Period>]) -> Result<YearlyTable, RiskError> {
    YearlyTable::build(asset, "variance", periods, |p| nan_if_insufficient(p.variance(asset)))
}

/// Total first-to-last price change of an asset, by year. NaN for a year
/// without any price for the asset.
///
/// # Errors
/// Fails if the asset is missing from a period.
pub fn change_by_year(asset: AssetName, periods: &[Arc<Period>]) -> Result<YearlyTable, RiskError> {
    YearlyTable::build(asset, "total_change", periods, |p| p.total_change(asset))
}
