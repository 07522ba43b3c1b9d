#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod covariance;
pub mod error;
pub mod period;
pub mod portfolio;
pub mod portfolio_series;
pub mod segment;
pub mod solver;

// Re-export main types
pub use config::RiskConfig;
pub use covariance::{CovarianceError, CovarianceEstimator, SampleCovarianceEstimator};
pub use error::{Result, RiskError};
pub use period::Period;
pub use portfolio::Portfolio;
pub use portfolio_series::PortfolioSeries;
pub use segment::{PeriodSegmenter, divide_in_periods};
pub use solver::{MinVarianceSolver, min_variance_weights};
