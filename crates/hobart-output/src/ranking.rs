//! Asset ranking by risk.

use hobart_data::{AssetClassType, AssetName, AssetSeries};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An asset's position in a risk ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRanking {
    /// Asset identity.
    pub asset: AssetName,

    /// Asset-class classification.
    pub asset_class: AssetClassType,

    /// Standard deviation of daily changes over the full history.
    pub std_dev: Option<f64>,
}

impl fmt::Display for AssetRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.std_dev {
            Some(sd) => write!(f, "{:<12} {:<12} {:.6}", self.asset, self.asset_class, sd),
            None => write!(f, "{:<12} {:<12} n/a", self.asset, self.asset_class),
        }
    }
}

/// Rank assets by the standard deviation of their change series, lowest first.
///
/// Assets with fewer than two changes have no standard deviation and sort last.
pub fn rank_assets_by_std_dev(assets: &[AssetSeries]) -> Vec<AssetRanking> {
    let mut ranking: Vec<AssetRanking> = assets
        .iter()
        .map(|asset| AssetRanking {
            asset: asset.name(),
            asset_class: asset.asset_class(),
            std_dev: asset.std_dev(),
        })
        .collect();

    ranking.sort_by(|a, b| match (a.std_dev, b.std_dev) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranking
}
