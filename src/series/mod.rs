//! Hourly spot-price series for today and, once published, tomorrow.

mod timeline;

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, PriceResult};

pub use timeline::{Period, TimelineSlot};

/// Number of hourly entries in a complete day bucket.
pub const HOURS_PER_DAY: usize = 24;

/// Day bucket selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    /// The current calendar day (logical hours 0–23).
    Today,
    /// The following calendar day (logical hours 24–47).
    Tomorrow,
}

impl Day {
    /// Offset of this bucket on the logical 48-hour timeline.
    pub fn timeline_offset(self) -> usize {
        match self {
            Self::Today => 0,
            Self::Tomorrow => HOURS_PER_DAY,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::Tomorrow => f.write_str("tomorrow"),
        }
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            other => Err(format!(
                "unknown day \"{other}\", expected \"today\" or \"tomorrow\""
            )),
        }
    }
}

/// Price valid for one full clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourPrice {
    /// Hour of day in `0..=23`.
    pub hour: u8,
    /// Unit price for the hour, in the provider's currency unit.
    pub price: Decimal,
}

impl HourPrice {
    /// Creates a new hourly price entry.
    pub fn new(hour: u8, price: Decimal) -> Self {
        Self { hour, price }
    }
}

/// Immutable hourly price series for today and optionally tomorrow.
///
/// Each bucket holds either no entries or exactly 24, one per hour in
/// ascending order. A missing tomorrow (prices not yet published) is
/// represented as `None`; an empty tomorrow is normalized to `None`.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use spot_stats::series::{Day, PriceSeries};
///
/// let today: Vec<Decimal> = (0..24).map(Decimal::from).collect();
/// let series = PriceSeries::from_hourly(&today, None).unwrap();
/// assert_eq!(series.price_at(5, Day::Today), Ok(Decimal::from(5)));
/// assert!(!series.has_tomorrow());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    today: Vec<HourPrice>,
    tomorrow: Option<Vec<HourPrice>>,
}

impl PriceSeries {
    /// Builds a series from explicit hourly entries.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::MalformedSeries`] if a bucket's length is
    /// neither 0 nor 24, or its hours are out of range, duplicated, or not
    /// ascending.
    pub fn new(today: Vec<HourPrice>, tomorrow: Option<Vec<HourPrice>>) -> PriceResult<Self> {
        validate_bucket(Day::Today, &today)?;
        if let Some(entries) = &tomorrow {
            validate_bucket(Day::Tomorrow, entries)?;
        }

        Ok(Self {
            today,
            tomorrow: tomorrow.filter(|entries| !entries.is_empty()),
        })
    }

    /// Builds a series from plain price slices, assigning hours `0..n`.
    ///
    /// # Errors
    ///
    /// Same as [`PriceSeries::new`].
    pub fn from_hourly(today: &[Decimal], tomorrow: Option<&[Decimal]>) -> PriceResult<Self> {
        Self::new(
            to_hour_prices(Day::Today, today)?,
            tomorrow
                .map(|prices| to_hour_prices(Day::Tomorrow, prices))
                .transpose()?,
        )
    }

    /// An empty series: no prices for either day.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Today's hourly prices in ascending hour order.
    pub fn today(&self) -> &[HourPrice] {
        &self.today
    }

    /// Tomorrow's hourly prices, if published.
    pub fn tomorrow(&self) -> Option<&[HourPrice]> {
        self.tomorrow.as_deref()
    }

    /// Prices for the given day bucket (empty slice when absent).
    pub fn day(&self, day: Day) -> &[HourPrice] {
        match day {
            Day::Today => &self.today,
            Day::Tomorrow => self.tomorrow().unwrap_or_default(),
        }
    }

    /// Whether tomorrow's prices are present.
    pub fn has_tomorrow(&self) -> bool {
        self.tomorrow.is_some()
    }

    /// Whether the series holds no prices at all.
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.tomorrow.is_none()
    }

    /// Looks up the price of one hour.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::HourNotFound`] if the hour is not present in
    /// the selected bucket.
    pub fn price_at(&self, hour: u8, day: Day) -> PriceResult<Decimal> {
        self.day(day)
            .binary_search_by_key(&hour, |entry| entry.hour)
            .map(|idx| self.day(day)[idx].price)
            .map_err(|_| PriceError::HourNotFound { day, hour })
    }

    /// The logical timeline: today's hours followed by tomorrow's, in
    /// chronological order.
    pub fn timeline(&self) -> Vec<TimelineSlot> {
        [Day::Today, Day::Tomorrow]
            .into_iter()
            .flat_map(|day| {
                self.day(day)
                    .iter()
                    .map(move |entry| TimelineSlot::new(day, entry))
            })
            .collect()
    }

    /// Candidate timeline for a period, in chronological order.
    ///
    /// For [`Period::Night`] this is today's evening followed by tomorrow's
    /// early morning.
    pub fn period_timeline(&self, period: Period) -> Vec<TimelineSlot> {
        self.timeline()
            .into_iter()
            .filter(|slot| period.contains(slot.day, slot.hour))
            .collect()
    }
}

fn to_hour_prices(day: Day, prices: &[Decimal]) -> PriceResult<Vec<HourPrice>> {
    if prices.len() > HOURS_PER_DAY {
        return Err(PriceError::MalformedSeries(format!(
            "{day} has {} entries, expected 0 or {HOURS_PER_DAY}",
            prices.len()
        )));
    }
    Ok(prices
        .iter()
        .zip(0u8..)
        .map(|(price, hour)| HourPrice::new(hour, *price))
        .collect())
}

fn validate_bucket(day: Day, entries: &[HourPrice]) -> PriceResult<()> {
    if !entries.is_empty() && entries.len() != HOURS_PER_DAY {
        return Err(PriceError::MalformedSeries(format!(
            "{day} has {} entries, expected 0 or {HOURS_PER_DAY}",
            entries.len()
        )));
    }
    if let Some(entry) = entries.iter().find(|e| usize::from(e.hour) >= HOURS_PER_DAY) {
        return Err(PriceError::MalformedSeries(format!(
            "{day} has hour {} outside 0..=23",
            entry.hour
        )));
    }
    if let Some(pair) = entries.windows(2).find(|w| w[0].hour >= w[1].hour) {
        return Err(PriceError::MalformedSeries(format!(
            "{day} hours must be unique and ascending, found {} before {}",
            pair[0].hour, pair[1].hour
        )));
    }
    Ok(())
}
