//! Joint calendar alignment and yearly segmentation.
//!
//! Each asset's prices become a two-column frame (`date`, asset label). The
//! frames are outer-joined on date into one joint table, each asset column
//! is forward-filled from its previous known price, and the table is
//! partitioned by calendar year into one [`Period`] per year.
//!
//! Dates before an asset's first price have nothing to forward-fill from.
//! They stay in the table with the asset's price missing (NaN), so a late
//! starting asset never removes years the other assets cover.

use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use crate::period::Period;
use chrono::NaiveDate;
use hobart_data::{AssetName, AssetSeries};
use ndarray::Array2;
use polars::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

const DATE: &str = "date";
const YEAR: &str = "year";

/// Splits aligned asset series into yearly periods.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodSegmenter {
    config: RiskConfig,
}

impl PeriodSegmenter {
    /// Create a segmenter whose periods use `config`.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Align the assets on a joint calendar and split it by year.
    ///
    /// Column order follows the order of `assets`. Periods are returned in
    /// ascending year order; only an input without any price yields none.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidParameter`] for an empty or duplicated
    /// asset list, and [`RiskError::Frame`] if the joint table cannot be built.
    pub fn segment(&self, assets: &[AssetSeries]) -> Result<Vec<Arc<Period>>> {
        if assets.is_empty() {
            return Err(RiskError::InvalidParameter(
                "at least one asset is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = assets.iter().find(|a| !seen.insert(a.name())) {
            return Err(RiskError::InvalidParameter(format!(
                "asset {} supplied more than once",
                dup.name()
            )));
        }

        if assets.iter().all(|a| a.prices().is_empty()) {
            warn!(assets = assets.len(), "no asset has any price");
            return Ok(Vec::new());
        }

        let names: Vec<AssetName> = assets.iter().map(AssetSeries::name).collect();
        let table = forward_fill(joint_table(assets)?, &names)?;
        let years = table
            .lazy()
            .with_column(col(DATE).dt().year().alias(YEAR))
            .collect()?
            .partition_by_stable([YEAR], false)?;

        let mut periods = Vec::with_capacity(years.len());
        for frame in &years {
            let period = Period::with_config(
                frame_dates(frame)?,
                names.clone(),
                price_matrix(frame, &names)?,
                self.config,
            )?;

            let unpriced = period.unpriced_assets();
            if !unpriced.is_empty() {
                warn!(period = %period, unpriced = ?unpriced, "assets without a price in period");
            }
            debug!(period = %period, rows = frame.height(), "segmented period");
            periods.push(Arc::new(period));
        }

        Ok(periods)
    }
}

/// Split assets into yearly periods with the default configuration.
///
/// # Errors
/// See [`PeriodSegmenter::segment`].
pub fn divide_in_periods(assets: &[AssetSeries]) -> Result<Vec<Arc<Period>>> {
    PeriodSegmenter::default().segment(assets)
}

/// `date` plus one price column named after the asset.
fn price_frame(asset: &AssetSeries) -> Result<LazyFrame> {
    let dates: Vec<String> = asset.prices().dates().iter().map(ToString::to_string).collect();
    let frame = DataFrame::new(vec![
        Series::new(DATE.into(), dates).into(),
        Series::new(asset.name().label().into(), asset.prices().values()).into(),
    ])?;

    Ok(frame.lazy().with_column(col(DATE).cast(DataType::Date)))
}

/// Outer join of every asset's prices on the union of their dates.
fn joint_table(assets: &[AssetSeries]) -> Result<DataFrame> {
    let mut frames = assets.iter().map(price_frame);
    let first = frames.next().ok_or_else(|| {
        RiskError::InvalidParameter("at least one asset is required".to_string())
    })??;

    let joined = frames.try_fold(first, |joined, frame| -> Result<LazyFrame> {
        Ok(joined.join(
            frame?,
            [col(DATE)],
            [col(DATE)],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        ))
    })?;

    Ok(joined
        .sort([DATE], SortMultipleOptions::default())
        .collect()?)
}

/// Carry each asset's last known price over dates it did not trade.
fn forward_fill(mut table: DataFrame, names: &[AssetName]) -> Result<DataFrame> {
    for name in names {
        let filled = table
            .column(name.label())?
            .as_materialized_series()
            .fill_null(FillNullStrategy::Forward(None))?;
        table.with_column(filled)?;
    }
    Ok(table)
}

fn frame_dates(frame: &DataFrame) -> Result<Vec<NaiveDate>> {
    frame
        .column(DATE)?
        .as_materialized_series()
        .date()?
        .as_date_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| RiskError::InvalidParameter("joint table has a missing date".to_string()))
}

/// Prices in column order, NaN where an asset has no price yet.
fn price_matrix(frame: &DataFrame, names: &[AssetName]) -> Result<Array2<f64>> {
    let mut prices = Array2::from_elem((frame.height(), names.len()), f64::NAN);
    for (idx, name) in names.iter().enumerate() {
        let column = frame.column(name.label())?.f64()?;
        for (row, price) in column.into_iter().enumerate() {
            if let Some(price) = price {
                prices[[row, idx]] = price;
            }
        }
    }
    Ok(prices)
}
