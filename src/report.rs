//! Aggregate price report computed from one series.

use std::fmt;

use serde::Serialize;

use crate::series::{Period, PriceSeries};
use crate::stats::{
    CheapestWindow, Granularity, PricePoint, cheapest_window, highest_today, lowest_day,
    lowest_night,
};

/// Outcome of one cheapest-window search in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowEntry {
    /// Period that was searched.
    pub period: Period,
    /// Duration as requested.
    pub requested_hours: f64,
    /// The cheapest window, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<CheapestWindow>,
    /// Why no window could be found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// All extrema plus the cheapest windows for a list of durations.
///
/// Missing data never fails the report as a whole: an unavailable
/// extremum is `None` and an impossible window carries its error text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    /// Whether tomorrow's prices were available.
    pub has_tomorrow: bool,
    /// Highest price of today.
    pub highest_today: Option<PricePoint>,
    /// Lowest price in the day period.
    pub lowest_day: Option<PricePoint>,
    /// Lowest price in the night period.
    pub lowest_night: Option<PricePoint>,
    /// Day-period windows first, then night, each in duration order.
    pub windows: Vec<WindowEntry>,
}

impl PriceReport {
    /// Computes the report for `series`.
    ///
    /// # Arguments
    ///
    /// * `series` - Prices to aggregate
    /// * `durations_hours` - Window lengths to search in each period
    /// * `granularity` - Start-point grid for window searches
    pub fn from_series(
        series: &PriceSeries,
        durations_hours: &[f64],
        granularity: Granularity,
    ) -> Self {
        let windows = [Period::Day, Period::Night]
            .into_iter()
            .flat_map(|period| {
                durations_hours.iter().map(move |&hours| {
                    match cheapest_window(series, period, hours, granularity) {
                        Ok(window) => WindowEntry {
                            period,
                            requested_hours: hours,
                            window: Some(window),
                            error: None,
                        },
                        Err(e) => WindowEntry {
                            period,
                            requested_hours: hours,
                            window: None,
                            error: Some(e.to_string()),
                        },
                    }
                })
            })
            .collect();

        Self {
            has_tomorrow: series.has_tomorrow(),
            highest_today: highest_today(series).ok(),
            lowest_day: lowest_day(series).ok(),
            lowest_night: lowest_night(series).ok(),
            windows,
        }
    }
}

fn write_point(f: &mut fmt::Formatter<'_>, label: &str, point: Option<&PricePoint>) -> fmt::Result {
    match point {
        Some(p) => writeln!(f, "{label:<22} {p}"),
        None => writeln!(f, "{label:<22} n/a"),
    }
}

impl fmt::Display for PriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Price Report ---")?;
        writeln!(
            f,
            "Tomorrow published:    {}",
            if self.has_tomorrow { "yes" } else { "no" }
        )?;
        write_point(f, "Highest today:", self.highest_today.as_ref())?;
        write_point(f, "Lowest day (06-18):", self.lowest_day.as_ref())?;
        write_point(f, "Lowest night (18-06):", self.lowest_night.as_ref())?;
        write!(f, "Cheapest windows:")?;
        for entry in &self.windows {
            match (&entry.window, &entry.error) {
                (Some(window), _) => write!(f, "\n  {window}")?,
                (None, Some(error)) => write!(
                    f,
                    "\n  {:>5} h {:<5} {error}",
                    entry.requested_hours, entry.period
                )?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}
