//! Highest and lowest prices with the hour they occur.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{PriceError, PriceResult};
use crate::series::{Day, Period, PriceSeries, TimelineSlot};

/// A price together with the hour it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    /// Unit price for the hour.
    pub price: Decimal,
    /// Day bucket of the hour.
    pub day: Day,
    /// Clock hour within that day.
    pub hour: u8,
}

impl From<TimelineSlot> for PricePoint {
    fn from(slot: TimelineSlot) -> Self {
        Self {
            price: slot.price,
            day: slot.day,
            hour: slot.hour,
        }
    }
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:02}:00 {}", self.price, self.hour, self.day)
    }
}

/// Highest price of today; the earliest hour wins ties.
///
/// # Errors
///
/// Returns [`PriceError::EmptySeries`] if today has no prices.
pub fn highest_today(series: &PriceSeries) -> PriceResult<PricePoint> {
    let slots = series
        .today()
        .iter()
        .map(|entry| PricePoint {
            price: entry.price,
            day: Day::Today,
            hour: entry.hour,
        });
    first_by(slots, |candidate, best| candidate > best).ok_or(PriceError::EmptySeries)
}

/// Lowest price within 06:00–18:00 of today; the earliest hour wins ties.
///
/// # Errors
///
/// Returns [`PriceError::NoDataInWindow`] if no hour of the day period is
/// present.
pub fn lowest_day(series: &PriceSeries) -> PriceResult<PricePoint> {
    lowest_in(series, Period::Day)
}

/// Lowest price from 18:00 today through 06:00 tomorrow.
///
/// Ties prefer the earlier point on the logical timeline, so this evening's
/// hours beat tomorrow morning's.
///
/// # Errors
///
/// Returns [`PriceError::NoDataInWindow`] if neither today's evening nor
/// tomorrow's early morning is present.
pub fn lowest_night(series: &PriceSeries) -> PriceResult<PricePoint> {
    lowest_in(series, Period::Night)
}

/// Direct price lookup for one hour.
///
/// # Errors
///
/// Returns [`PriceError::HourNotFound`] if the hour is absent.
pub fn price_at(series: &PriceSeries, hour: u8, day: Day) -> PriceResult<Decimal> {
    series.price_at(hour, day)
}

/// Price-only projection of [`highest_today`].
pub fn highest_price_today(series: &PriceSeries) -> PriceResult<Decimal> {
    highest_today(series).map(|point| point.price)
}

/// Price-only projection of [`lowest_day`].
pub fn lowest_price_day(series: &PriceSeries) -> PriceResult<Decimal> {
    lowest_day(series).map(|point| point.price)
}

/// Price-only projection of [`lowest_night`].
pub fn lowest_price_night(series: &PriceSeries) -> PriceResult<Decimal> {
    lowest_night(series).map(|point| point.price)
}

fn lowest_in(series: &PriceSeries, period: Period) -> PriceResult<PricePoint> {
    let slots = series
        .period_timeline(period)
        .into_iter()
        .map(PricePoint::from);
    first_by(slots, |candidate, best| candidate < best).ok_or(PriceError::NoDataInWindow(period))
}

/// Picks the first point whose price strictly beats all earlier ones, so
/// chronological order decides ties.
fn first_by(
    points: impl Iterator<Item = PricePoint>,
    beats: impl Fn(Decimal, Decimal) -> bool,
) -> Option<PricePoint> {
    points.fold(None, |best, point| match best {
        Some(b) if !beats(point.price, b.price) => Some(b),
        _ => Some(point),
    })
}
