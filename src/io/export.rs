//! CSV export of the logical price timeline.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::{CsvError, HEADER};
use crate::series::PriceSeries;

/// Exports a series to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour in timeline order
/// (today, then tomorrow). Produces deterministic output for identical
/// inputs.
///
/// # Errors
///
/// Returns a `CsvError` if file creation or writing fails.
pub fn export_csv(series: &PriceSeries, path: &Path) -> Result<(), CsvError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(series, buf)
}

/// Writes a series as CSV to any writer.
///
/// # Errors
///
/// Returns a `CsvError` if writing fails.
pub fn write_csv(series: &PriceSeries, writer: impl Write) -> Result<(), CsvError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;
    for slot in series.timeline() {
        wtr.write_record(&[
            slot.day.to_string(),
            slot.hour.to_string(),
            slot.price.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn make_series(with_tomorrow: bool) -> PriceSeries {
        let today: Vec<Decimal> = (0..24).map(|h| Decimal::new(2000 + h * 10, 4)).collect();
        let tomorrow: Vec<Decimal> = (0..24).map(|h| Decimal::new(-h, 2)).collect();
        PriceSeries::from_hourly(&today, with_tomorrow.then_some(tomorrow.as_slice())).unwrap()
    }

    #[test]
    fn header_and_first_row() {
        let mut buf = Vec::new();
        write_csv(&make_series(false), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let mut lines = output.as_deref().unwrap_or("").lines();
        assert_eq!(lines.next(), Some("day,hour,price"));
        assert_eq!(lines.next(), Some("today,0,0.2000"));
    }

    #[test]
    fn row_count_matches_timeline() {
        let mut buf = Vec::new();
        write_csv(&make_series(true), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 48 data rows
        assert_eq!(lines.len(), 49);
        assert_eq!(lines[25], "tomorrow,0,0.00");
        assert_eq!(lines[48], "tomorrow,23,-0.23");
    }

    #[test]
    fn empty_series_writes_header_only() {
        let mut buf = Vec::new();
        write_csv(&PriceSeries::empty(), &mut buf).ok();
        assert_eq!(String::from_utf8(buf).ok().as_deref(), Some("day,hour,price\n"));
    }

    #[test]
    fn deterministic_output() {
        let series = make_series(true);
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&series, &mut buf1).ok();
        write_csv(&series, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }
}
