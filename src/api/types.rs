//! API response and query types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::series::{Day, Period};

/// Query parameters for `GET /price`.
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    /// Clock hour, `0..=23`.
    pub hour: u8,
    /// Day bucket; defaults to today.
    #[serde(default = "default_day")]
    pub day: Day,
}

fn default_day() -> Day {
    Day::Today
}

/// A single hourly price.
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    /// Day bucket of the hour.
    pub day: Day,
    /// Clock hour.
    pub hour: u8,
    /// Unit price for the hour.
    pub price: Decimal,
}

/// Query parameters for `GET /window`.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// Window length in hours; may be fractional.
    pub duration: f64,
    /// Period to search; defaults to the day period.
    #[serde(default = "default_period")]
    pub period: Period,
}

fn default_period() -> Period {
    Period::Day
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
