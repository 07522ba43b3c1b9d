//! Hobart CLI binary.
//!
//! Provides command-line interface for yearly asset-class risk analytics.

mod integration;

use clap::{Parser, Subcommand};
use hobart::{AnalysisError, YearlyAnalysis};
use hobart_data::{AssetName, AssetSeries};
use hobart_output::{
    ExportFormat, Exporter, YearlyTable, change_by_year, rank_assets_by_std_dev, std_dev_by_year,
    var_by_year,
};
use hobart_risk::PeriodSegmenter;
use integration::manifest::Manifest;
use integration::render::{OutputFormat, emit, ranking_table, render, universe_table};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: yearly asset-class risk and minimum-variance analytics", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-year statistics, minimum-variance weights and drift
    Analyze {
        /// Run manifest listing the asset price exports
        #[arg(long, default_value = "hobart.toml")]
        manifest: PathBuf,

        /// Output format (text, csv, json or pretty-json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write results to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fail on the first singular or degenerate year
        #[arg(long)]
        strict: bool,
    },

    /// Rank assets by the standard deviation of their daily changes
    Rank {
        /// Run manifest listing the asset price exports
        #[arg(long, default_value = "hobart.toml")]
        manifest: PathBuf,

        /// Output format (text, csv, json or pretty-json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Yearly variance, standard deviation and total change per asset
    Periods {
        /// Run manifest listing the asset price exports
        #[arg(long, default_value = "hobart.toml")]
        manifest: PathBuf,

        /// Restrict to one asset
        #[arg(long)]
        asset: Option<String>,

        /// Output format (text, csv, json or pretty-json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the supported assets and their classes
    Assets,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Analyze {
            manifest,
            format,
            output,
            strict,
        } => analyze(&manifest, format.parse()?, output.as_deref(), strict)?,
        Commands::Rank { manifest, format } => rank(&manifest, format.parse()?)?,
        Commands::Periods {
            manifest,
            asset,
            format,
        } => periods(&manifest, asset.as_deref(), format.parse()?)?,
        Commands::Assets => emit(&universe_table(), None)?,
    }
    Ok(())
}

fn analyze(
    manifest_path: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::load(manifest_path)?;
    let assets = manifest.load_assets()?;
    let analysis = YearlyAnalysis::run(&assets, &manifest.analysis_config(strict))?;

    if !analysis.skipped.is_empty() {
        info!(skipped = analysis.skipped.len(), "some periods were skipped");
    }

    let content = match format {
        OutputFormat::Text => analysis.to_string(),
        OutputFormat::Export(ExportFormat::Csv) => {
            analysis.periods.export_to_string(ExportFormat::Csv)?
        }
        OutputFormat::Export(ExportFormat::Json | ExportFormat::PrettyJson) => analysis
            .to_report(&format!("Hobart analysis of {}", manifest_path.display()))?
            .to_json()?,
    };
    emit(&content, output)?;
    Ok(())
}

fn rank(manifest_path: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let assets = Manifest::load(manifest_path)?.load_assets()?;
    let ranking = rank_assets_by_std_dev(&assets);
    emit(&render(&ranking, format, |r| ranking_table(r))?, None)?;
    Ok(())
}

fn periods(
    manifest_path: &Path,
    asset: Option<&str>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::load(manifest_path)?;
    let assets = manifest.load_assets()?;
    let tables = yearly_tables(&assets, asset, &manifest)?;

    let content = render(&tables, format, |tables| {
        tables
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    emit(&content, None)?;
    Ok(())
}

fn yearly_tables(
    assets: &[AssetSeries],
    only: Option<&str>,
    manifest: &Manifest,
) -> Result<Vec<YearlyTable>, AnalysisError> {
    let periods = PeriodSegmenter::new(manifest.risk)?.segment(assets)?;
    if periods.is_empty() {
        return Err(AnalysisError::NoPeriods {
            assets: assets.len(),
        });
    }

    let selected: Vec<AssetName> = match only {
        Some(label) => vec![label.parse()?],
        None => assets.iter().map(AssetSeries::name).collect(),
    };

    let mut tables = Vec::with_capacity(selected.len() * 3);
    for asset in selected {
        tables.push(var_by_year(asset, &periods)?);
        tables.push(std_dev_by_year(asset, &periods)?);
        tables.push(change_by_year(asset, &periods)?);
    }
    Ok(tables)
}
