//! One calendar year of aligned multi-asset data.
//!
//! A [`Period`] owns the joint price matrix for a year (rows are trading
//! dates, columns are assets in a fixed order) and derives everything else
//! from it:
//!
//! - the change matrix, one row shorter than the price matrix because the
//!   first day of the year has no in-period predecessor
//! - sample covariance, its inverse and the correlation matrix
//! - per-asset variance, standard deviation and total change
//!
//! A price is NaN on dates before the asset's first observation. Per-asset
//! statistics use only that asset's populated rows. Joint statistics
//! (covariance, its inverse, correlation and portfolios) use the complete
//! rows, those on which every asset has a change.
//!
//! The underlying data never changes after construction, so derived
//! matrices are memoized on first access and always equal a fresh
//! recomputation.

use crate::config::RiskConfig;
use crate::covariance::{
    CovarianceError, CovarianceEstimator, SampleCovarianceEstimator, correlation_from_covariance,
    invert_matrix,
};
use crate::error::{Result, RiskError};
use crate::solver::MinVarianceSolver;
use chrono::{Datelike, NaiveDate};
use hobart_data::{AssetName, TimeSeries};
use ndarray::{Array1, Array2, Axis, s};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Change rows on which every asset is priced.
#[derive(Debug)]
struct CompleteChanges {
    dates: Vec<NaiveDate>,
    matrix: Array2<f64>,
}

/// Joint price and change data for one calendar year.
#[derive(Debug)]
pub struct Period {
    dates: Vec<NaiveDate>,
    assets: Vec<AssetName>,
    prices: Array2<f64>,
    config: RiskConfig,

    changes: OnceLock<Array2<f64>>,
    complete: OnceLock<CompleteChanges>,
    cov: OnceLock<Array2<f64>>,
    cov_inv: OnceLock<Option<Array2<f64>>>,
    corr: OnceLock<Array2<f64>>,
}

impl Period {
    /// Create a period with the default configuration.
    ///
    /// # Errors
    /// See [`Period::with_config`].
    pub fn new(dates: Vec<NaiveDate>, assets: Vec<AssetName>, prices: Array2<f64>) -> Result<Self> {
        Self::with_config(dates, assets, prices, RiskConfig::default())
    }

    /// Create a period.
    ///
    /// # Arguments
    /// * `dates` - Trading dates, strictly ascending and within one calendar year
    /// * `assets` - Column order, without duplicates
    /// * `prices` - Price matrix (dates x assets)
    /// * `config` - Tolerances for statistics on this period
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidParameter`] when any of the above does not hold.
    pub fn with_config(
        dates: Vec<NaiveDate>,
        assets: Vec<AssetName>,
        prices: Array2<f64>,
        config: RiskConfig,
    ) -> Result<Self> {
        config.validate()?;

        let first = *dates
            .first()
            .ok_or_else(|| RiskError::InvalidParameter("period has no dates".to_string()))?;

        if prices.dim() != (dates.len(), assets.len()) {
            return Err(RiskError::InvalidParameter(format!(
                "price matrix is {:?}, expected ({}, {})",
                prices.dim(),
                dates.len(),
                assets.len()
            )));
        }

        if let Some(pair) = dates.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(RiskError::InvalidParameter(format!(
                "period dates are not strictly ascending at {}",
                pair[1]
            )));
        }

        if let Some(date) = dates.iter().find(|d| d.year() != first.year()) {
            return Err(RiskError::InvalidParameter(format!(
                "date {date} does not belong to year {}",
                first.year()
            )));
        }

        let mut seen = HashSet::new();
        if let Some(asset) = assets.iter().find(|asset| !seen.insert(**asset)) {
            return Err(RiskError::InvalidParameter(format!(
                "asset {asset} appears more than once"
            )));
        }

        Ok(Self {
            dates,
            assets,
            prices,
            config,
            changes: OnceLock::new(),
            complete: OnceLock::new(),
            cov: OnceLock::new(),
            cov_inv: OnceLock::new(),
            corr: OnceLock::new(),
        })
    }

    /// Calendar year of the period.
    pub fn year(&self) -> i32 {
        self.start_date().year()
    }

    /// Period label (the year as a string).
    pub fn label(&self) -> String {
        self.year().to_string()
    }

    /// First trading date.
    pub fn start_date(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last trading date.
    pub fn end_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Trading dates of the price matrix.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Dates of the change matrix rows.
    pub fn change_dates(&self) -> &[NaiveDate] {
        &self.dates[1..]
    }

    /// Asset column order.
    pub fn assets(&self) -> &[AssetName] {
        &self.assets
    }

    /// Number of asset columns.
    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Number of change observations.
    pub fn n_observations(&self) -> usize {
        self.dates.len() - 1
    }

    /// Configuration used for statistics.
    pub const fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Joint price matrix (dates x assets).
    pub const fn price_matrix(&self) -> &Array2<f64> {
        &self.prices
    }

    /// Joint change matrix (dates - 1 x assets), NaN where either price is missing.
    pub fn change_matrix(&self) -> &Array2<f64> {
        self.changes.get_or_init(|| {
            let prev = self.prices.slice(s![..-1, ..]);
            let next = self.prices.slice(s![1.., ..]);
            &next / &prev - 1.0
        })
    }

    fn complete(&self) -> &CompleteChanges {
        self.complete.get_or_init(|| {
            let changes = self.change_matrix();
            let rows: Vec<usize> = changes
                .rows()
                .into_iter()
                .enumerate()
                .filter(|(_, row)| !row.iter().any(|v| v.is_nan()))
                .map(|(idx, _)| idx)
                .collect();
            CompleteChanges {
                dates: rows.iter().map(|&idx| self.change_dates()[idx]).collect(),
                matrix: changes.select(Axis(0), &rows),
            }
        })
    }

    /// Rows of the change matrix on which every asset has a value.
    pub fn complete_change_matrix(&self) -> &Array2<f64> {
        &self.complete().matrix
    }

    /// Dates of the complete change rows.
    pub fn complete_change_dates(&self) -> &[NaiveDate] {
        &self.complete().dates
    }

    /// Number of complete change rows.
    pub fn n_complete_observations(&self) -> usize {
        self.complete().matrix.nrows()
    }

    /// Assets without a single price in this period.
    pub fn unpriced_assets(&self) -> Vec<AssetName> {
        self.assets
            .iter()
            .zip(self.prices.columns())
            .filter(|(_, column)| column.iter().all(|p| p.is_nan()))
            .map(|(asset, _)| *asset)
            .collect()
    }

    /// Column index of an asset.
    ///
    /// # Errors
    /// Returns [`RiskError::UnknownAsset`] if the asset is not a column.
    pub fn asset_index(&self, asset: AssetName) -> Result<usize> {
        self.assets
            .iter()
            .position(|a| *a == asset)
            .ok_or_else(|| RiskError::UnknownAsset {
                period: self.label(),
                asset: asset.to_string(),
            })
    }

    /// Dated change series of one asset, over its populated rows.
    ///
    /// # Errors
    /// Returns an error if the asset is not a column.
    pub fn change_series(&self, asset: AssetName) -> Result<TimeSeries> {
        let idx = self.asset_index(asset)?;
        let (dates, values) = self
            .change_dates()
            .iter()
            .zip(self.change_matrix().column(idx))
            .filter(|(_, v)| !v.is_nan())
            .map(|(date, v)| (*date, *v))
            .unzip();
        Ok(TimeSeries::new(dates, values)?)
    }

    /// Total change of one asset over the period, from its first and last
    /// price in the period. NaN when the asset has no price in the period.
    ///
    /// # Errors
    /// Returns an error if the asset is not a column.
    pub fn total_change(&self, asset: AssetName) -> Result<f64> {
        let idx = self.asset_index(asset)?;
        Ok(self.column_total_change(idx))
    }

    /// Total change of every asset, in column order.
    pub fn total_changes(&self) -> Array1<f64> {
        (0..self.n_assets())
            .map(|idx| self.column_total_change(idx))
            .collect()
    }

    fn column_total_change(&self, idx: usize) -> f64 {
        let mut priced = self.prices.column(idx).into_iter().copied().filter(|p| !p.is_nan());
        priced
            .next()
            .map_or(f64::NAN, |first| priced.last().unwrap_or(first) / first - 1.0)
    }

    /// Sample variance of one asset's changes over its populated rows.
    ///
    /// # Errors
    /// Returns an error if the asset is unknown or has too few observations.
    pub fn variance(&self, asset: AssetName) -> Result<f64> {
        Ok(self.populated_changes(asset)?.var(1.0))
    }

    /// Sample standard deviation of one asset's changes over its populated rows.
    ///
    /// # Errors
    /// Returns an error if the asset is unknown or has too few observations.
    pub fn std_dev(&self, asset: AssetName) -> Result<f64> {
        Ok(self.populated_changes(asset)?.std(1.0))
    }

    fn populated_changes(&self, asset: AssetName) -> Result<Array1<f64>> {
        let idx = self.asset_index(asset)?;
        let values: Array1<f64> = self
            .change_matrix()
            .column(idx)
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        if values.len() < self.config.min_observations {
            return Err(self.insufficient_data(values.len()));
        }
        Ok(values)
    }

    fn insufficient_data(&self, actual: usize) -> RiskError {
        RiskError::InsufficientData {
            period: self.label(),
            required: self.config.min_observations,
            actual,
        }
    }

    /// Sample covariance matrix of the complete change rows.
    ///
    /// # Errors
    /// Returns [`RiskError::InsufficientData`] when fewer complete rows than
    /// the configured minimum exist, which includes any asset left unpriced
    /// for the whole period.
    pub fn cov_matrix(&self) -> Result<&Array2<f64>> {
        if let Some(cov) = self.cov.get() {
            return Ok(cov);
        }

        let cov = self.compute_cov_matrix()?;
        Ok(self.cov.get_or_init(|| cov))
    }

    /// Recompute the covariance matrix, bypassing the memoized value.
    ///
    /// # Errors
    /// Same as [`Period::cov_matrix`].
    pub fn compute_cov_matrix(&self) -> Result<Array2<f64>> {
        let complete = self.complete_change_matrix();
        if complete.nrows() < self.config.min_observations {
            return Err(self.insufficient_data(complete.nrows()));
        }
        SampleCovarianceEstimator::new(self.config.min_observations)
            .estimate(complete)
            .map_err(|err| match err {
                CovarianceError::InsufficientData { actual, .. } => self.insufficient_data(actual),
                other => other.into(),
            })
    }

    /// Inverse of the covariance matrix.
    ///
    /// # Errors
    /// Returns [`RiskError::SingularMatrix`] when the covariance matrix is
    /// singular or near-singular, or [`RiskError::InsufficientData`].
    pub fn cov_matrix_inv(&self) -> Result<&Array2<f64>> {
        let cov = self.cov_matrix()?;
        let inverse = self.cov_inv.get_or_init(|| {
            match invert_matrix(cov, self.config.singular_tolerance) {
                Ok(inv) => Some(inv),
                Err(err) => {
                    debug!(period = %self, error = %err, "covariance inversion failed");
                    None
                }
            }
        });

        inverse.as_ref().ok_or_else(|| RiskError::SingularMatrix {
            period: self.label(),
            assets: self.n_assets(),
            observations: self.n_complete_observations(),
        })
    }

    /// Pearson correlation matrix.
    ///
    /// # Errors
    /// Returns [`RiskError::InsufficientData`] below the minimum number of observations.
    pub fn corr_matrix(&self) -> Result<&Array2<f64>> {
        if let Some(corr) = self.corr.get() {
            return Ok(corr);
        }

        let corr = correlation_from_covariance(self.cov_matrix()?)?;
        Ok(self.corr.get_or_init(|| corr))
    }

    /// Minimum-variance weights for this period, in column order.
    ///
    /// # Errors
    /// Propagates inversion and solver errors.
    pub fn min_variance_weights(&self) -> Result<Array1<f64>> {
        let solver = MinVarianceSolver::new(self.config)?;
        solver.solve(self.cov_matrix_inv()?)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}
