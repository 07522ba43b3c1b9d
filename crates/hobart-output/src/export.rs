//! CSV and JSON export of yearly tables, rankings, matrices and summaries.

use crate::ranking::AssetRanking;
use crate::summary::{DriftSummary, LabelledMatrix, PeriodSummary, PortfolioSummary};
use crate::yearly::YearlyTable;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize records through a csv writer into a string.
fn write_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, ExportError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

/// Flattened yearly row for CSV export.
#[derive(Debug, Serialize)]
struct YearlyFlat<'a> {
    asset: String,
    statistic: &'a str,
    period: &'a str,
    value: f64,
}

/// Flattened matrix cell for CSV export.
#[derive(Debug, Serialize)]
struct MatrixCellFlat<'a> {
    row: &'a str,
    column: &'a str,
    value: f64,
}

/// Flattened portfolio metric for CSV export.
#[derive(Debug, Serialize)]
struct PortfolioFlat<'a> {
    period: &'a str,
    metric: String,
    value: f64,
}

impl YearlyTable {
    fn to_flat_records(&self) -> impl Iterator<Item = YearlyFlat<'_>> {
        self.rows.iter().map(move |row| YearlyFlat {
            asset: self.asset.to_string(),
            statistic: &self.statistic,
            period: &row.period,
            value: row.value,
        })
    }
}

impl LabelledMatrix {
    fn to_flat_records(&self) -> impl Iterator<Item = MatrixCellFlat<'_>> {
        self.labels
            .iter()
            .zip(&self.values)
            .flat_map(move |(row, values)| {
                self.labels
                    .iter()
                    .zip(values)
                    .map(move |(column, value)| MatrixCellFlat {
                        row,
                        column,
                        value: *value,
                    })
            })
    }
}

impl PortfolioSummary {
    fn to_flat_records(&self) -> Vec<PortfolioFlat<'_>> {
        let mut records: Vec<PortfolioFlat<'_>> = self
            .weights
            .iter()
            .map(|w| PortfolioFlat {
                period: &self.period,
                metric: format!("weight_{}", w.asset),
                value: w.weight,
            })
            .collect();

        for (metric, value) in [
            ("variance", self.variance),
            ("std_dev", self.std_dev),
            ("total_change", self.total_change),
            ("compounded_change", self.compounded_change),
        ] {
            records.push(PortfolioFlat {
                period: &self.period,
                metric: metric.to_string(),
                value,
            });
        }
        records
    }
}

impl PeriodSummary {
    fn to_flat_records(&self) -> Vec<PortfolioFlat<'_>> {
        let mut records = Vec::new();
        for stats in &self.assets {
            for (metric, value) in [
                ("variance", stats.variance),
                ("std_dev", stats.std_dev),
                ("total_change", stats.total_change),
            ] {
                records.push(PortfolioFlat {
                    period: &self.period,
                    metric: format!("{}_{metric}", stats.asset),
                    value,
                });
            }
        }
        if let Some(mv) = &self.min_variance {
            records.extend(mv.to_flat_records());
        }
        records
    }
}

impl Exporter for YearlyTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.to_flat_records()),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for Vec<YearlyTable> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.iter().flat_map(YearlyTable::to_flat_records)),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for Vec<AssetRanking> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for LabelledMatrix {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.to_flat_records()),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for PortfolioSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.to_flat_records()),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for Vec<PeriodSummary> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.iter().flat_map(PeriodSummary::to_flat_records)),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for Vec<DriftSummary> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();
                for drift in self {
                    output.push_str(&format!(
                        "# Carried from {} into {}, rebalanced std dev {}\n",
                        drift.from_period, drift.to_period, drift.rebalanced_std_dev
                    ));
                    output.push_str(&write_csv(drift.carried.to_flat_records())?);
                }
                Ok(output)
            }
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::AssetWeight;
    use crate::yearly::YearlyRow;
    use hobart_data::{AssetClassType, AssetName};
    use rstest::rstest;

    fn table() -> YearlyTable {
        YearlyTable {
            asset: AssetName::ChinaEquity,
            statistic: "std_dev".to_string(),
            rows: vec![
                YearlyRow {
                    period: "2020".to_string(),
                    value: 0.0125,
                },
                YearlyRow {
                    period: "2021".to_string(),
                    value: 0.0098,
                },
            ],
        }
    }

    fn portfolio() -> PortfolioSummary {
        PortfolioSummary {
            period: "2021".to_string(),
            weights: vec![
                AssetWeight {
                    asset: AssetName::Gold,
                    weight: 0.7,
                },
                AssetWeight {
                    asset: AssetName::UsEquity,
                    weight: 0.3,
                },
            ],
            variance: 0.0001,
            std_dev: 0.01,
            total_change: 0.05,
            compounded_change: 0.049,
        }
    }

    #[test]
    fn test_yearly_table_csv() {
        let csv = table().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("asset,statistic,period,value"));
        assert_eq!(lines.next(), Some("China eq.,std_dev,2020,0.0125"));
        assert_eq!(lines.next(), Some("China eq.,std_dev,2021,0.0098"));
    }

    #[test]
    fn test_yearly_table_json() {
        let json = table().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"China eq.\""));
        assert!(json.contains("\"rows\""));

        let back: YearlyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table());
    }

    #[test]
    fn test_ranking_csv_keeps_undefined_blank() {
        let ranking = vec![
            AssetRanking {
                asset: AssetName::UsTenYearBond,
                asset_class: AssetClassType::Bonds,
                std_dev: Some(0.004),
            },
            AssetRanking {
                asset: AssetName::Corn,
                asset_class: AssetClassType::Commodities,
                std_dev: None,
            },
        ];

        let csv = ranking.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("US bonds,Bonds,0.004"));
        assert!(csv.contains("Corn,Commodities,\n"));
    }

    #[test]
    fn test_matrix_csv_is_long_form() {
        let matrix = LabelledMatrix {
            labels: vec!["Oil".to_string(), "Gold".to_string()],
            values: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        };

        let csv = matrix.export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 5);
        assert!(csv.contains("Oil,Gold,0.5"));
    }

    #[test]
    fn test_portfolio_csv() {
        let csv = portfolio().export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("2021,weight_Gold,0.7"));
        assert!(csv.contains("2021,std_dev,0.01"));
        assert!(csv.contains("compounded_change"));
    }

    #[test]
    fn test_drift_csv_has_comment_header() {
        let drifts = vec![DriftSummary {
            from_period: "2020".to_string(),
            to_period: "2021".to_string(),
            carried: portfolio(),
            rebalanced_std_dev: 0.009,
        }];

        let csv = drifts.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("# Carried from 2020 into 2021"));
        assert!(csv.contains("weight_US eq."));
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let json = portfolio().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\n  \"period\""));
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] raw: &str, #[case] expected: ExportFormat) {
        assert_eq!(raw.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_format_from_str_rejects_unknown() {
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_export_to_file() {
        let temp_dir = std::env::temp_dir();
        let csv_path = temp_dir.join("hobart_export_test.csv");
        let json_path = temp_dir.join("hobart_export_test.json");

        table().export_to_file(&csv_path, ExportFormat::Csv).unwrap();
        let csv_content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv_content.contains("China eq."));

        table().export_to_file(&json_path, ExportFormat::Json).unwrap();
        let json_content = std::fs::read_to_string(&json_path).unwrap();
        assert!(json_content.contains("\"std_dev\""));

        std::fs::remove_file(csv_path).ok();
        std::fs::remove_file(json_path).ok();
    }
}
