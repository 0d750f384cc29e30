//! Named periods and the derived timeline they select.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Day, HourPrice};

/// First hour of the day period (inclusive).
pub const DAY_START_HOUR: u8 = 6;
/// End of the day period and start of the night period.
pub const DAY_END_HOUR: u8 = 18;

static DAY_RANGES: [(Day, Range<u8>); 1] = [(Day::Today, DAY_START_HOUR..DAY_END_HOUR)];
static NIGHT_RANGES: [(Day, Range<u8>); 2] = [
    (Day::Today, DAY_END_HOUR..24),
    (Day::Tomorrow, 0..DAY_START_HOUR),
];

/// Named time restriction over the price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 06:00–18:00 of today.
    Day,
    /// 18:00–24:00 of today followed by 00:00–06:00 of tomorrow.
    Night,
}

impl Period {
    /// Longest duration a window search in this period accepts.
    ///
    /// The day period's clock span only holds 12 hours of data, so day
    /// durations above 12 pass validation and then fail on coverage.
    pub fn capacity_hours(self) -> f64 {
        match self {
            Self::Day => 24.0,
            Self::Night => 12.0,
        }
    }

    /// Half-open hour ranges selected by this period, per day bucket, in
    /// chronological order.
    pub fn ranges(self) -> &'static [(Day, Range<u8>)] {
        match self {
            Self::Day => &DAY_RANGES,
            Self::Night => &NIGHT_RANGES,
        }
    }

    /// Whether the given bucket/hour falls inside this period.
    pub fn contains(self, day: Day, hour: u8) -> bool {
        self.ranges()
            .iter()
            .any(|(d, hours)| *d == day && hours.contains(&hour))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("day"),
            Self::Night => f.write_str("night"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "night" => Ok(Self::Night),
            other => Err(format!(
                "unknown period \"{other}\", expected \"day\" or \"night\""
            )),
        }
    }
}

/// One hour on the logical 48-hour timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineSlot {
    /// Day bucket the hour belongs to.
    pub day: Day,
    /// Clock hour within that day.
    pub hour: u8,
    /// Unit price valid for the whole hour.
    pub price: Decimal,
}

impl TimelineSlot {
    pub(crate) fn new(day: Day, entry: &HourPrice) -> Self {
        Self {
            day,
            hour: entry.hour,
            price: entry.price,
        }
    }

    /// Position on the logical timeline (today 0–23, tomorrow 24–47).
    pub fn logical_hour(&self) -> usize {
        self.day.timeline_offset() + usize::from(self.hour)
    }
}
