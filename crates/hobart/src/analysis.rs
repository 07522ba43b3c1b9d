//! End-to-end yearly analysis.
//!
//! Runs the full chain over a set of asset series: segmentation into yearly
//! periods, per-period statistics and minimum-variance portfolios, and the
//! drift view of carrying each year's weights into the next.

use hobart_data::{AssetName, AssetSeries, DataError};
use hobart_output::{
    DriftSummary, PeriodSummary, Report, ReportBuilder, ReportError, generate_drift_summary,
    generate_period_summary,
};
use hobart_risk::{PeriodSegmenter, Portfolio, PortfolioSeries, RiskConfig, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Period or portfolio computation failed
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Input data error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Report serialization failed
    #[error(transparent)]
    Report(#[from] ReportError),

    /// None of the assets has a single price
    #[error("No period could be formed from {assets} assets")]
    NoPeriods {
        /// Number of input assets
        assets: usize,
    },
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Analysis configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Numerical settings for periods and the solver.
    pub risk: RiskConfig,

    /// Record periods whose covariance cannot be inverted or whose weights
    /// are degenerate instead of failing the whole run.
    pub skip_degenerate_periods: bool,
}

/// A period left out of the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPeriod {
    /// Period label.
    pub period: String,

    /// Why the period was skipped.
    pub reason: String,
}

/// Results of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyAnalysis {
    /// Assets in column order.
    pub assets: Vec<AssetName>,

    /// Summaries of every solved period, in year order.
    pub periods: Vec<PeriodSummary>,

    /// Periods that could not be solved.
    pub skipped: Vec<SkippedPeriod>,

    /// Drift between adjacent solved periods.
    pub drift: Vec<DriftSummary>,
}

/// Whether a period-level failure may be skipped rather than aborting the run.
const fn is_skippable(err: &RiskError) -> bool {
    matches!(
        err,
        RiskError::SingularMatrix { .. }
            | RiskError::DegenerateSolution { .. }
            | RiskError::InsufficientData { .. }
    )
}

impl YearlyAnalysis {
    /// Run the analysis.
    ///
    /// # Errors
    /// Returns the first period failure unless
    /// [`AnalysisConfig::skip_degenerate_periods`] is set, in which case
    /// singular, degenerate and under-populated periods are recorded in
    /// [`YearlyAnalysis::skipped`]. Years in which an asset has no price
    /// are under-populated. Fails with [`AnalysisError::NoPeriods`] when no
    /// asset has any price.
    pub fn run(assets: &[AssetSeries], config: &AnalysisConfig) -> Result<Self> {
        let periods = PeriodSegmenter::new(config.risk)?.segment(assets)?;
        if periods.is_empty() {
            return Err(AnalysisError::NoPeriods {
                assets: assets.len(),
            });
        }

        info!(
            assets = assets.len(),
            periods = periods.len(),
            "running yearly analysis"
        );

        let mut summaries = Vec::with_capacity(periods.len());
        let mut portfolios = Vec::with_capacity(periods.len());
        let mut skipped = Vec::new();

        for period in &periods {
            let solved = Portfolio::min_variance(Arc::clone(period)).and_then(|portfolio| {
                let summary = generate_period_summary(period, Some(&portfolio))?;
                Ok((portfolio, summary))
            });

            match solved {
                Ok((portfolio, summary)) => {
                    debug!(period = %period, "period solved");
                    portfolios.push(portfolio);
                    summaries.push(summary);
                }
                Err(err) if config.skip_degenerate_periods && is_skippable(&err) => {
                    warn!(period = %period, error = %err, "skipping period");
                    skipped.push(SkippedPeriod {
                        period: period.label(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        let series = PortfolioSeries::new(portfolios);
        let carried = series.prev_portfolios()?;
        let drift = series
            .portfolios()
            .windows(2)
            .zip(&carried)
            .map(|(pair, carried)| generate_drift_summary(&pair[0], carried, &pair[1]))
            .collect::<std::result::Result<Vec<_>, RiskError>>()?;

        Ok(Self {
            assets: assets.iter().map(AssetSeries::name).collect(),
            periods: summaries,
            skipped,
            drift,
        })
    }

    /// Labels of the solved periods.
    pub fn labels(&self) -> Vec<String> {
        self.periods.iter().map(|p| p.period.clone()).collect()
    }

    /// Summary for a period label.
    pub fn period(&self, label: &str) -> Option<&PeriodSummary> {
        self.periods.iter().find(|p| p.period == label)
    }

    /// Wrap the analysis in a timestamped report.
    ///
    /// # Errors
    /// Fails if the analysis cannot be serialized.
    pub fn to_report(&self, title: &str) -> Result<Report> {
        Ok(ReportBuilder::new()
            .title(title)
            .assets(self.assets.clone())
            .periods(self.labels())
            .contents(self)?
            .build()?)
    }
}

impl fmt::Display for YearlyAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.periods {
            writeln!(f, "{summary}")?;
        }

        if !self.skipped.is_empty() {
            writeln!(f, "Skipped periods")?;
            for skip in &self.skipped {
                writeln!(f, "  {}: {}", skip.period, skip.reason)?;
            }
            writeln!(f)?;
        }

        if !self.drift.is_empty() {
            writeln!(f, "Drift (previous year's weights kept)")?;
            writeln!(
                f,
                "  {:<6} {:<6} {:>12} {:>12} {:>12}",
                "From", "To", "Carried sd", "Rebal. sd", "Excess"
            )?;
            for d in &self.drift {
                writeln!(
                    f,
                    "  {:<6} {:<6} {:>12.6} {:>12.6} {:>12.6}",
                    d.from_period,
                    d.to_period,
                    d.carried.std_dev,
                    d.rebalanced_std_dev,
                    d.excess_std_dev()
                )?;
            }
        }
        Ok(())
    }
}
