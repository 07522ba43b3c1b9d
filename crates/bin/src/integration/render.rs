//! Output selection and writing for CLI commands.

use hobart_data::AssetName;
use hobart_output::{AssetRanking, ExportError, ExportFormat, Exporter};
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

/// Where a command's result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Human-readable tables.
    Text,
    /// Machine-readable export.
    Export(ExportFormat),
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else {
            ExportFormat::from_str(s).map(Self::Export)
        }
    }
}

/// Render `value` as text via `Display` or through its exporter.
pub(crate) fn render<T>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) -> Result<String, ExportError>
where
    T: Exporter,
{
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Export(export) => value.export_to_string(export),
    }
}

/// Write to `output`, or stdout when none is given.
pub(crate) fn emit(content: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content),
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

/// Text table of a risk ranking.
pub(crate) fn ranking_table(ranking: &[AssetRanking]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4} {:<12} {:<12} {}", "#", "Asset", "Class", "Std dev");
    for (i, row) in ranking.iter().enumerate() {
        let _ = writeln!(out, "{:<4} {row}", i + 1);
    }
    out
}

/// Text table of the supported universe.
pub(crate) fn universe_table() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {}", "Asset", "Class");
    for asset in AssetName::all() {
        let _ = writeln!(out, "{:<12} {}", asset, asset.asset_class());
    }
    out
}
