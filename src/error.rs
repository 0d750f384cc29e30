//! Error types reported by the price engine and its collaborators.

use thiserror::Error;

use crate::series::{Day, Period};

/// Failures raised by [`PriceSeries`](crate::series::PriceSeries)
/// construction and by the aggregation queries in [`stats`](crate::stats).
///
/// Every query reports its failure explicitly; none of them fall back to a
/// default or best-effort value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    /// Input violates the hour-uniqueness, ordering, range or length invariant.
    #[error("malformed price series: {0}")]
    MalformedSeries(String),

    /// A query needs today's prices but none are present.
    #[error("no prices available for today")]
    EmptySeries,

    /// The period's hour restriction leaves no candidate hours.
    #[error("no prices available in the {0} period")]
    NoDataInWindow(Period),

    /// Direct hour lookup missed.
    #[error("no price for hour {hour} {day}")]
    HourNotFound {
        /// Day bucket that was searched.
        day: Day,
        /// Requested hour of day.
        hour: u8,
    },

    /// Requested duration is non-positive, not finite, or exceeds the
    /// period's capacity.
    #[error(
        "invalid duration {0} h: must be > 0 and <= {day} h (day) or {night} h (night)",
        day = Period::Day.capacity_hours(),
        night = Period::Night.capacity_hours()
    )]
    InvalidDuration(f64),

    /// The concrete series does not cover a full window of the requested length.
    #[error(
        "insufficient coverage: {requested} h requested but only {available} h of prices available"
    )]
    InsufficientWindowCoverage {
        /// Requested window length in hours.
        requested: f64,
        /// Hours of price data available in the period.
        available: usize,
    },
}

/// Convenience alias used throughout the engine.
pub type PriceResult<T> = Result<T, PriceError>;
