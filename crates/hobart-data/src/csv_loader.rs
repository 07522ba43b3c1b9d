//! CSV ingestion for historical price exports.
//!
//! Expects an Investing.com style export: a header row with a `Date` column
//! and a `Price` column (a `Close` column is accepted instead). Other columns
//! are ignored. Rows are usually newest first; the loaded series is always
//! returned in ascending date order.
//!
//! Cleaning rules:
//! - thousands separators are stripped from prices (`"1,234.50"`)
//! - blank or unparseable prices are forward-filled from the previous row in
//!   file order

use crate::error::{DataError, Result};
use crate::series::AssetSeries;
use crate::universe::AssetName;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Date formats tried in order.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%b %d, %Y", "%d.%m.%Y"];

/// Load an asset's price history from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be read or contains no usable rows.
pub fn load_asset_csv(path: &Path, name: AssetName) -> Result<AssetSeries> {
    debug!(asset = %name, path = %path.display(), "loading price history");
    let file = File::open(path)?;
    parse_asset_csv(file, name)
}

/// Parse an asset's price history from any CSV reader.
///
/// # Errors
/// Returns an error if the header lacks the required columns, a date cannot
/// be parsed, or the first price has nothing to fill from.
pub fn parse_asset_csv<R: Read>(reader: R, name: AssetName) -> Result<AssetSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = find_column(&headers, &["Date"]).unwrap_or(0);
    let price_idx = find_column(&headers, &["Price", "Close"]).ok_or_else(|| {
        DataError::MissingData {
            asset: name.to_string(),
            reason: "no Price column in header".to_string(),
        }
    })?;

    let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
    let mut last_price: Option<f64> = None;
    let mut filled = 0usize;

    for record in rdr.records() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        if raw_date.is_empty() {
            continue;
        }
        let date = parse_date(raw_date)?;

        let price = match record.get(price_idx).and_then(parse_price) {
            Some(price) => price,
            None => {
                filled += 1;
                last_price.ok_or_else(|| DataError::MissingData {
                    asset: name.to_string(),
                    reason: format!("no price on {date} and nothing to forward-fill from"),
                })?
            }
        };
        last_price = Some(price);
        rows.push((date, price));
    }

    if rows.is_empty() {
        return Err(DataError::MissingData {
            asset: name.to_string(),
            reason: "file contains no price rows".to_string(),
        });
    }

    if filled > 0 {
        warn!(asset = %name, filled, "forward-filled missing prices");
    }

    rows.sort_by_key(|(date, _)| *date);
    debug!(asset = %name, rows = rows.len(), "parsed price history");
    AssetSeries::from_rows(name, rows)
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim_start_matches('\u{feff}').trim();
        candidates
            .iter()
            .any(|candidate| header.eq_ignore_ascii_case(candidate))
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| DataError::Parse(format!("unrecognised date: {raw}")))
}

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|price| price.is_finite())
}
