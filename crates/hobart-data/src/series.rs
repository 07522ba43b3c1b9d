//! Dated value series and per-asset price series.
//!
//! A [`TimeSeries`] pairs strictly ascending dates with values. An
//! [`AssetSeries`] holds one asset's prices and the day-over-day change
//! series derived from them:
//!
//! change[t] = price[t] / price[t-1] - 1
//!
//! The first price has no change, so the change series is one shorter
//! than the price series.

use crate::error::{DataError, Result};
use crate::universe::{AssetClassType, AssetName};
use chrono::NaiveDate;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// A series of values indexed by strictly ascending dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new series.
    ///
    /// # Errors
    /// Returns an error if lengths differ or dates are not strictly ascending.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(DataError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }

        if let Some(pair) = dates.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(DataError::UnorderedDates {
                date: pair[1].to_string(),
            });
        }

        Ok(Self { dates, values })
    }

    /// An empty series.
    pub const fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Dates of the series.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Values of the series.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First observation.
    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.dates.first().copied().zip(self.values.first().copied())
    }

    /// Last observation.
    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.dates.last().copied().zip(self.values.last().copied())
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Day-over-day percentage change, dated by the later observation.
    pub fn pct_change(&self) -> Self {
        let values = self
            .values
            .windows(2)
            .map(|pair| pair[1] / pair[0] - 1.0)
            .collect();
        let dates = self.dates.iter().skip(1).copied().collect();
        Self { dates, values }
    }

    /// Values as an ndarray view.
    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }

    /// Sample variance (divisor n - 1), `None` below two observations.
    pub fn variance(&self) -> Option<f64> {
        (self.len() >= 2).then(|| self.view().var(1.0))
    }

    /// Sample standard deviation (divisor n - 1), `None` below two observations.
    pub fn std_dev(&self) -> Option<f64> {
        (self.len() >= 2).then(|| self.view().std(1.0))
    }
}

/// One asset's cleaned price series and its change series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    name: AssetName,
    prices: TimeSeries,
    changes: TimeSeries,
}

impl AssetSeries {
    /// Create an asset series from ascending prices.
    ///
    /// # Errors
    /// Returns an error if any price is negative or not finite.
    pub fn new(name: AssetName, prices: TimeSeries) -> Result<Self> {
        if let Some((date, price)) = prices.iter().find(|(_, p)| !p.is_finite() || *p < 0.0) {
            return Err(DataError::InvalidPrice {
                asset: name.to_string(),
                date: date.to_string(),
                price,
            });
        }

        let changes = prices.pct_change();
        Ok(Self {
            name,
            prices,
            changes,
        })
    }

    /// Build directly from `(date, price)` rows.
    ///
    /// # Errors
    /// Returns an error if the rows are unordered or contain invalid prices.
    pub fn from_rows(name: AssetName, rows: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let (dates, values) = rows.into_iter().unzip();
        Self::new(name, TimeSeries::new(dates, values)?)
    }

    /// Asset identity.
    pub const fn name(&self) -> AssetName {
        self.name
    }

    /// Asset-class classification.
    pub const fn asset_class(&self) -> AssetClassType {
        self.name.asset_class()
    }

    /// Price series.
    pub const fn prices(&self) -> &TimeSeries {
        &self.prices
    }

    /// Change series.
    pub const fn changes(&self) -> &TimeSeries {
        &self.changes
    }

    /// Sample variance of the change series.
    pub fn variance(&self) -> Option<f64> {
        self.changes.variance()
    }

    /// Sample standard deviation of the change series.
    pub fn std_dev(&self) -> Option<f64> {
        self.changes.std_dev()
    }
}
