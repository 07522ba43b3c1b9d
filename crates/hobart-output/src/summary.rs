//! Serializable summaries of periods and portfolios.
//!
//! These are plain data snapshots of what a [`Period`] and its portfolios
//! derive, keyed by asset name and period label, for display and export.

use chrono::NaiveDate;
use hobart_data::AssetName;
use hobart_risk::{Period, Portfolio, RiskError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Square matrix with asset labels on both axes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelledMatrix {
    /// Row and column labels, in matrix order.
    pub labels: Vec<String>,

    /// Row-major values.
    pub values: Vec<Vec<f64>>,
}

impl LabelledMatrix {
    /// Build from an ndarray matrix and the asset column order.
    pub fn from_array(assets: &[AssetName], matrix: &Array2<f64>) -> Self {
        Self {
            labels: assets.iter().map(ToString::to_string).collect(),
            values: matrix.rows().into_iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Value at (row label, column label).
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        self.values.get(i).and_then(|r| r.get(j)).copied()
    }
}

impl fmt::Display for LabelledMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12}", "")?;
        for label in &self.labels {
            write!(f, "{label:>12}")?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.values) {
            write!(f, "{label:<12}")?;
            for value in row {
                write!(f, "{value:>12.6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-asset statistics within a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetStatistics {
    /// Asset identity.
    pub asset: AssetName,

    /// Sample variance of daily changes.
    pub variance: f64,

    /// Sample standard deviation of daily changes.
    pub std_dev: f64,

    /// First-to-last price change.
    pub total_change: f64,
}

/// One asset's weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetWeight {
    /// Asset identity.
    pub asset: AssetName,

    /// Portfolio weight (may be negative).
    pub weight: f64,
}

/// Risk and return of a weighted portfolio over one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    /// Period label.
    pub period: String,

    /// Weights in the period's column order.
    pub weights: Vec<AssetWeight>,

    /// Sample variance of the portfolio's daily changes.
    pub variance: f64,

    /// Sample standard deviation of the portfolio's daily changes.
    pub std_dev: f64,

    /// Linear blend of per-asset total changes.
    pub total_change: f64,

    /// Compounded daily portfolio change.
    pub compounded_change: f64,
}

impl PortfolioSummary {
    /// Summarise a portfolio.
    ///
    /// # Errors
    /// Fails if the period has too few observations.
    pub fn from_portfolio(portfolio: &Portfolio) -> Result<Self, RiskError> {
        let period = portfolio.period();
        let weights = period
            .assets()
            .iter()
            .zip(portfolio.weights().iter())
            .map(|(asset, weight)| AssetWeight {
                asset: *asset,
                weight: *weight,
            })
            .collect();

        Ok(Self {
            period: period.label(),
            weights,
            variance: portfolio.variance()?,
            std_dev: portfolio.std_dev()?,
            total_change: portfolio.total_change(None)?,
            compounded_change: portfolio.compounded_change(None)?,
        })
    }

    /// Sum of weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }
}

/// Everything derived from one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    /// Period label (year).
    pub period: String,

    /// First trading date.
    pub start_date: NaiveDate,

    /// Last trading date.
    pub end_date: NaiveDate,

    /// Number of change observations.
    pub observations: usize,

    /// Per-asset statistics in column order.
    pub assets: Vec<AssetStatistics>,

    /// Sample covariance matrix.
    pub covariance: LabelledMatrix,

    /// Correlation matrix.
    pub correlation: LabelledMatrix,

    /// Minimum-variance portfolio, when one was solved.
    pub min_variance: Option<PortfolioSummary>,
}

/// Summarise a period and, optionally, a portfolio over it.
///
/// # Errors
/// Fails if the period has too few observations for covariance.
pub fn generate_period_summary(
    period: &Period,
    portfolio: Option<&Portfolio>,
) -> Result<PeriodSummary, RiskError> {
    let assets = period
        .assets()
        .iter()
        .map(|&asset| {
            Ok(AssetStatistics {
                asset,
                variance: period.variance(asset)?,
                std_dev: period.std_dev(asset)?,
                total_change: period.total_change(asset)?,
            })
        })
        .collect::<Result<Vec<_>, RiskError>>()?;

    Ok(PeriodSummary {
        period: period.label(),
        start_date: period.start_date(),
        end_date: period.end_date(),
        observations: period.n_observations(),
        assets,
        covariance: LabelledMatrix::from_array(period.assets(), period.cov_matrix()?),
        correlation: LabelledMatrix::from_array(period.assets(), period.corr_matrix()?),
        min_variance: portfolio.map(PortfolioSummary::from_portfolio).transpose()?,
    })
}

/// Outcome of carrying one period's weights into the next.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftSummary {
    /// Period whose weights were carried.
    pub from_period: String,

    /// Period the weights were applied to.
    pub to_period: String,

    /// Carried portfolio.
    pub carried: PortfolioSummary,

    /// Standard deviation of the target period's own optimal portfolio.
    pub rebalanced_std_dev: f64,
}

impl DriftSummary {
    /// Extra risk from not rebalancing.
    pub fn excess_std_dev(&self) -> f64 {
        self.carried.std_dev - self.rebalanced_std_dev
    }
}

/// Summarise a carried portfolio against the rebalanced one.
///
/// # Errors
/// Fails if either portfolio has too few observations.
pub fn generate_drift_summary(
    from: &Portfolio,
    carried: &Portfolio,
    rebalanced: &Portfolio,
) -> Result<DriftSummary, RiskError> {
    Ok(DriftSummary {
        from_period: from.period().label(),
        to_period: carried.period().label(),
        carried: PortfolioSummary::from_portfolio(carried)?,
        rebalanced_std_dev: rebalanced.std_dev()?,
    })
}

impl fmt::Display for PeriodSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Period {} ({} to {}, {} observations)",
            self.period, self.start_date, self.end_date, self.observations
        )?;
        writeln!(
            f,
            "  {:<12} {:>12} {:>12} {:>12}",
            "Asset", "Variance", "Std dev", "Change"
        )?;
        for stats in &self.assets {
            writeln!(
                f,
                "  {:<12} {:>12.8} {:>12.6} {:>11.2}%",
                stats.asset,
                stats.variance,
                stats.std_dev,
                stats.total_change * 100.0
            )?;
        }
        writeln!(f, "\nCorrelation")?;
        write!(f, "{}", self.correlation)?;

        if let Some(mv) = &self.min_variance {
            writeln!(f, "\nMinimum-variance weights")?;
            for w in &mv.weights {
                writeln!(f, "  {:<12} {:>9.4}", w.asset, w.weight)?;
            }
            writeln!(
                f,
                "  std dev {:.6}, total change {:.2}%, compounded {:.2}%",
                mv.std_dev,
                mv.total_change * 100.0,
                mv.compounded_change * 100.0
            )?;
        }
        Ok(())
    }
}
