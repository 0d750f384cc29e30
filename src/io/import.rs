//! CSV import of a price series.
//!
//! Accepts the layout written by [`super::export::write_csv`]: a
//! `day,hour,price` header and one row per hour. Rows may appear in any
//! order; each day bucket must end up empty or complete.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::CsvError;
use crate::series::{Day, HourPrice, PriceSeries};

#[derive(Debug, Deserialize)]
struct PriceRow {
    day: String,
    hour: u8,
    price: String,
}

/// Loads a series from a CSV file.
///
/// # Errors
///
/// Returns a `CsvError` if the file cannot be opened, a row is malformed,
/// or the rows do not form a valid series.
pub fn load_csv(path: &Path) -> Result<PriceSeries, CsvError> {
    let file = File::open(path)?;
    read_csv(file)
}

/// Reads a series from any CSV source.
///
/// # Errors
///
/// See [`load_csv`].
pub fn read_csv(reader: impl Read) -> Result<PriceSeries, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut today = Vec::new();
    let mut tomorrow = Vec::new();

    let headers = rdr.headers()?.clone();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: PriceRow = record.deserialize(Some(&headers))?;
        let day = Day::from_str(&row.day).map_err(|message| CsvError::Record { line, message })?;
        let price = Decimal::from_str(&row.price).map_err(|e| CsvError::Record {
            line,
            message: format!("invalid price \"{}\": {e}", row.price),
        })?;

        let entry = HourPrice::new(row.hour, price);
        match day {
            Day::Today => today.push(entry),
            Day::Tomorrow => tomorrow.push(entry),
        }
    }

    today.sort_by_key(|entry| entry.hour);
    tomorrow.sort_by_key(|entry| entry.hour);
    debug!(today = today.len(), tomorrow = tomorrow.len(), "read price rows");

    Ok(PriceSeries::new(today, Some(tomorrow))?)
}
