#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod ranking;
pub mod report;
pub mod summary;
pub mod yearly;

pub use export::{ExportError, ExportFormat, Exporter};
pub use ranking::{AssetRanking, rank_assets_by_std_dev};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{
    AssetStatistics, AssetWeight, DriftSummary, LabelledMatrix, PeriodSummary, PortfolioSummary,
    generate_drift_summary, generate_period_summary,
};
pub use yearly::{YearlyRow, YearlyTable, change_by_year, std_dev_by_year, var_by_year};
