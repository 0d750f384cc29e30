//! CSV import and export of price series.

pub mod export;
pub mod import;

use thiserror::Error;

use crate::error::PriceError;

/// Column header shared by export and import.
pub const HEADER: [&str; 3] = ["day", "hour", "price"];

/// Failures reading or writing price CSV files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// File could not be opened or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A row has an unusable value.
    #[error("line {line}: {message}")]
    Record {
        /// 1-based line number in the file, header included.
        line: u64,
        /// What was wrong with the row.
        message: String,
    },

    /// Rows parse but do not form a valid series.
    #[error(transparent)]
    Series(#[from] PriceError),
}
