//! Provider payload to [`PriceSeries`] conversion.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{RpcResponse, RpcResult};
use crate::error::PriceError;
use crate::series::{Day, HOURS_PER_DAY, HourPrice, PriceSeries};

/// Failures turning a provider payload into a price series.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body is not valid JSON for the response envelope.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider reported an error.
    #[error("API returned error: {text} (code: {code})")]
    Api {
        /// Provider error code.
        code: i64,
        /// Provider error description.
        text: String,
    },

    /// Parsed prices violate the series invariants.
    #[error(transparent)]
    Series(#[from] PriceError),
}

type Bucket = [Option<Decimal>; HOURS_PER_DAY];

/// Parses a raw response body.
///
/// # Errors
///
/// Returns [`ParseError::Json`] for malformed JSON and otherwise the errors
/// of [`parse_response`].
pub fn parse_body(body: &str, today: NaiveDate) -> Result<PriceSeries, ParseError> {
    let response: RpcResponse = serde_json::from_str(body)?;
    parse_response(response, today)
}

/// Converts a decoded response into a price series.
///
/// Entries are assigned to today or tomorrow by their date relative to
/// `today`; other dates, entries without an `Uhr` time, and unparseable
/// prices are skipped. A day that does not end up with all 24 hours is
/// dropped rather than stored partially. A response without payload, or
/// with mismatched `datum`/`wert` arrays, yields an empty series.
///
/// # Errors
///
/// Returns [`ParseError::Api`] when the provider reports a non-zero error
/// code.
pub fn parse_response(response: RpcResponse, today: NaiveDate) -> Result<PriceSeries, ParseError> {
    let Some(result) = response.result else {
        warn!("no result data in API response");
        return Ok(PriceSeries::empty());
    };

    if result.error_code != 0 {
        return Err(ParseError::Api {
            code: result.error_code,
            text: result
                .error_text
                .unwrap_or_else(|| "Unknown API error".to_string()),
        });
    }

    if result.datum.is_empty() || result.wert.is_empty() || result.datum.len() != result.wert.len()
    {
        warn!(
            datum = result.datum.len(),
            wert = result.wert.len(),
            "invalid or missing price data in API response"
        );
        return Ok(PriceSeries::empty());
    }

    let (today_bucket, tomorrow_bucket) = bucket_prices(&result, today);
    let series = PriceSeries::new(
        complete_bucket(Day::Today, &today_bucket),
        Some(complete_bucket(Day::Tomorrow, &tomorrow_bucket)),
    )?;
    debug!(
        today = series.today().len(),
        tomorrow = series.day(Day::Tomorrow).len(),
        "processed electricity prices"
    );
    Ok(series)
}

fn bucket_prices(result: &RpcResult, today: NaiveDate) -> (Bucket, Bucket) {
    let tomorrow = today.succ_opt();
    let mut today_bucket: Bucket = [None; HOURS_PER_DAY];
    let mut tomorrow_bucket: Bucket = [None; HOURS_PER_DAY];

    for (i, (stamp, value)) in result.datum.iter().zip(&result.wert).enumerate() {
        let Some((date, hour)) = parse_timestamp(stamp) else {
            debug!(index = i, stamp = %stamp, "skipping entry without hourly timestamp");
            continue;
        };
        let bucket = if date == today {
            &mut today_bucket
        } else if Some(date) == tomorrow {
            &mut tomorrow_bucket
        } else {
            continue;
        };
        match parse_price(value) {
            Some(price) => bucket[usize::from(hour)] = Some(price),
            None => debug!(index = i, value = %value, "skipping unparseable price"),
        }
    }

    (today_bucket, tomorrow_bucket)
}

fn complete_bucket(day: Day, bucket: &Bucket) -> Vec<HourPrice> {
    let entries: Vec<HourPrice> = bucket
        .iter()
        .zip(0u8..)
        .filter_map(|(price, hour)| price.map(|p| HourPrice::new(hour, p)))
        .collect();
    if !entries.is_empty() && entries.len() != HOURS_PER_DAY {
        warn!(
            %day,
            hours = entries.len(),
            "dropping incomplete day of prices"
        );
        return Vec::new();
    }
    entries
}

/// Parses `"DD.MM.YY, HH:MM Uhr"` into its date and hour.
fn parse_timestamp(stamp: &str) -> Option<(NaiveDate, u8)> {
    let stamp = stamp.trim().strip_suffix(" Uhr")?;
    let (date_part, time_part) = stamp.split_once(", ")?;
    let date = NaiveDate::parse_from_str(date_part.trim(), "%d.%m.%y").ok()?;
    let hour: u8 = time_part.split(':').next()?.trim().parse().ok()?;
    (usize::from(hour) < HOURS_PER_DAY).then_some((date, hour))
}

/// Parses a price given as a decimal-comma string or a JSON number.
fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(&s.trim().replace(',', ".")).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}
