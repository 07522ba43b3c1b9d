#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod csv_loader;
pub mod error;
pub mod series;
pub mod universe;

pub use csv_loader::{load_asset_csv, parse_asset_csv};
pub use error::{DataError, Result};
pub use series::{AssetSeries, TimeSeries};
pub use universe::{AssetClassType, AssetName};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
