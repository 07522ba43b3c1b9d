//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while building or loading price series.
#[derive(Debug, Error)]
pub enum DataError {
    /// Dates and values of a series have different lengths
    #[error("Length mismatch: {dates} dates but {values} values")]
    LengthMismatch {
        /// Number of dates
        dates: usize,
        /// Number of values
        values: usize,
    },

    /// Dates are not strictly ascending
    #[error("Dates are not strictly ascending at {date}")]
    UnorderedDates {
        /// First offending date
        date: String,
    },

    /// A price is negative or not finite
    #[error("Invalid price {price} for {asset} on {date}")]
    InvalidPrice {
        /// Asset label
        asset: String,
        /// Date of the offending row
        date: String,
        /// Offending price
        price: f64,
    },

    /// Missing data
    #[error("Missing data for {asset}: {reason}")]
    MissingData {
        /// Asset label
        asset: String,
        /// Reason for missing data
        reason: String,
    },

    /// Unknown asset name
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
