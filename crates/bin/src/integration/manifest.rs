//! Run manifest (`hobart.toml`).
//!
//! ```toml
//! skip_degenerate_periods = true
//!
//! [[assets]]
//! name = "Gold"
//! path = "data/gold.csv"
//!
//! [[assets]]
//! name = "US bonds"
//! path = "data/us_bonds.csv"
//!
//! [risk]
//! singular_tolerance = 1e-12
//! ```
//!
//! Relative asset paths are resolved against the manifest's directory.

use hobart::AnalysisConfig;
use hobart_data::{AssetName, AssetSeries, DataError, load_asset_csv};
use hobart_risk::RiskConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Error type for manifest operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ManifestError {
    /// Manifest file could not be read.
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Manifest is not valid TOML or has the wrong shape.
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    /// Asset name outside the supported universe.
    #[error("Unknown asset {0:?}; run `hobart assets` for the supported names")]
    UnknownAsset(String),
    /// Same asset listed twice.
    #[error("Asset {0} is listed more than once")]
    DuplicateAsset(AssetName),
    /// Manifest lists no assets.
    #[error("Manifest lists no assets")]
    Empty,
    /// Price export could not be loaded.
    #[error("Failed to load {asset} from {path}: {source}")]
    Load {
        /// Asset being loaded.
        asset: AssetName,
        /// Resolved file path.
        path: PathBuf,
        /// Underlying error.
        source: DataError,
    },
}

const fn default_skip() -> bool {
    true
}

/// One `[[assets]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AssetEntry {
    /// Asset label, e.g. `"US eq."`.
    pub name: String,
    /// Path to the price export.
    pub path: PathBuf,
}

/// Parsed manifest.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Manifest {
    /// Assets to analyze, in column order.
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    /// Numerical settings.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Skip singular or degenerate years instead of failing.
    #[serde(default = "default_skip")]
    pub skip_degenerate_periods: bool,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub(crate) fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::parse(&raw)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(path = %path.display(), assets = manifest.assets.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Parse manifest text; relative paths resolve against the working directory.
    pub(crate) fn parse(raw: &str) -> Result<Self, ManifestError> {
        let manifest: Self = toml::from_str(raw)?;
        if manifest.assets.is_empty() {
            return Err(ManifestError::Empty);
        }
        manifest.asset_names()?;
        Ok(manifest)
    }

    /// Asset identities in manifest order.
    pub(crate) fn asset_names(&self) -> Result<Vec<AssetName>, ManifestError> {
        let mut seen = HashSet::new();
        self.assets
            .iter()
            .map(|entry| {
                let name = AssetName::from_label(&entry.name)
                    .ok_or_else(|| ManifestError::UnknownAsset(entry.name.clone()))?;
                if !seen.insert(name) {
                    return Err(ManifestError::DuplicateAsset(name));
                }
                Ok(name)
            })
            .collect()
    }

    /// Analysis settings, with `strict` overriding the manifest's skip policy.
    pub(crate) const fn analysis_config(&self, strict: bool) -> AnalysisConfig {
        AnalysisConfig {
            risk: self.risk,
            skip_degenerate_periods: self.skip_degenerate_periods && !strict,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Load every listed price export.
    pub(crate) fn load_assets(&self) -> Result<Vec<AssetSeries>, ManifestError> {
        let names = self.asset_names()?;
        names
            .into_iter()
            .zip(&self.assets)
            .map(|(asset, entry)| {
                let path = self.resolve(&entry.path);
                let series = load_asset_csv(&path, asset).map_err(|source| ManifestError::Load {
                    asset,
                    path: path.clone(),
                    source,
                })?;
                info!(
                    asset = %asset,
                    rows = series.prices().len(),
                    path = %path.display(),
                    "loaded asset"
                );
                Ok(series)
            })
            .collect()
    }
}
