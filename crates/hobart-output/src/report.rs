//! Report envelope for a Hobart analysis run.

use chrono::{DateTime, Utc};
use hobart_data::AssetName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required field missing from the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A report from one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Assets included in the analysis, in column order.
    pub assets: Vec<AssetName>,

    /// Period labels covered.
    pub periods: Vec<String>,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(
        title: String,
        assets: Vec<AssetName>,
        periods: Vec<String>,
        contents: serde_json::Value,
    ) -> Self {
        Self {
            title,
            timestamp: Utc::now(),
            assets,
            periods,
            contents,
        }
    }

    /// Convert report to JSON string.
    ///
    /// # Errors
    /// Fails if the contents cannot be serialized.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON to a file.
    ///
    /// # Errors
    /// Fails on serialization or IO errors.
    pub fn write_json(&self, path: &std::path::Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    assets: Vec<AssetName>,
    periods: Vec<String>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the analyzed assets.
    pub fn assets(mut self, assets: Vec<AssetName>) -> Self {
        self.assets = assets;
        self
    }

    /// Set the covered period labels.
    pub fn periods(mut self, periods: Vec<String>) -> Self {
        self.periods = periods;
        self
    }

    /// Set the report contents from any serializable value.
    ///
    /// # Errors
    /// Fails if the value cannot be converted to JSON.
    pub fn contents<T: Serialize>(mut self, contents: &T) -> Result<Self, ReportError> {
        self.contents = Some(serde_json::to_value(contents)?);
        Ok(self)
    }

    /// Build the report.
    ///
    /// # Errors
    /// Fails if no contents were set.
    pub fn build(self) -> Result<Report, ReportError> {
        let contents = self.contents.ok_or(ReportError::MissingField("contents"))?;
        Ok(Report::new(
            self.title.unwrap_or_else(|| "Hobart analysis".to_string()),
            self.assets,
            self.periods,
            contents,
        ))
    }
}
