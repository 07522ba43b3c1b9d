//! Supported asset universe and asset-class classification.

use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad asset-class categories.
///
/// Used for labeling and grouping only; no computation depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClassType {
    /// Commodities
    Commodities,

    /// Equities
    Equities,

    /// Bonds
    Bonds,
}

impl AssetClassType {
    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Commodities => "Commodities",
            Self::Equities => "Equities",
            Self::Bonds => "Bonds",
        }
    }
}

impl fmt::Display for AssetClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// The closed set of assets Hobart knows how to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetName {
    /// Crude oil
    #[serde(rename = "Oil")]
    Oil,

    /// Gold
    #[serde(rename = "Gold")]
    Gold,

    /// Corn
    #[serde(rename = "Corn")]
    Corn,

    /// China equity index
    #[serde(rename = "China eq.")]
    ChinaEquity,

    /// US equity index
    #[serde(rename = "US eq.")]
    UsEquity,

    /// Europe equity index
    #[serde(rename = "Europe eq.")]
    EuropeEquity,

    /// Japan equity index
    #[serde(rename = "Japan eq.")]
    JapanEquity,

    /// US 10-year treasury
    #[serde(rename = "US bonds")]
    UsTenYearBond,
}

impl AssetName {
    /// Returns all supported assets in canonical order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Oil,
            Self::Gold,
            Self::Corn,
            Self::ChinaEquity,
            Self::UsEquity,
            Self::EuropeEquity,
            Self::JapanEquity,
            Self::UsTenYearBond,
        ]
    }

    /// Returns the display label, which is also the serialized form.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Oil => "Oil",
            Self::Gold => "Gold",
            Self::Corn => "Corn",
            Self::ChinaEquity => "China eq.",
            Self::UsEquity => "US eq.",
            Self::EuropeEquity => "Europe eq.",
            Self::JapanEquity => "Japan eq.",
            Self::UsTenYearBond => "US bonds",
        }
    }

    /// Returns the asset-class classification.
    pub const fn asset_class(&self) -> AssetClassType {
        match self {
            Self::Oil | Self::Gold | Self::Corn => AssetClassType::Commodities,
            Self::ChinaEquity | Self::UsEquity | Self::EuropeEquity | Self::JapanEquity => {
                AssetClassType::Equities
            }
            Self::UsTenYearBond => AssetClassType::Bonds,
        }
    }

    /// Parse an asset from its label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .into_iter()
            .find(|asset| asset.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for AssetName {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| DataError::UnknownAsset(s.to_string()))
    }
}
