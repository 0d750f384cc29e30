//! Cheapest contiguous window of a given duration within a period.
//!
//! Windows start on a fixed minute grid (quarter hours by default) and last
//! exactly the requested duration, so they may begin or end mid-hour. A
//! partially covered hour contributes its price weighted by the covered
//! fraction. The search keeps a running total and slides it one grid step
//! at a time, so the whole period is scanned in time linear in its number
//! of steps.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::debug;

use crate::error::{PriceError, PriceResult};
use crate::series::{Day, HOURS_PER_DAY, Period, PriceSeries, TimelineSlot};

const MINUTES_PER_HOUR: u8 = 60;

/// Alignment grid for window start points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Granularity {
    minutes: u8,
}

impl Granularity {
    /// Quarter-hour alignment, the default.
    pub const QUARTER_HOUR: Self = Self { minutes: 15 };
    /// Half-hour alignment.
    pub const HALF_HOUR: Self = Self { minutes: 30 };
    /// Whole-hour alignment.
    pub const HOUR: Self = Self { minutes: 60 };

    /// Builds a grid of `minutes` per step.
    ///
    /// Returns `None` unless `minutes` is in `1..=60` and divides an hour
    /// evenly.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        let minutes = u8::try_from(minutes).ok()?;
        (minutes > 0 && minutes <= MINUTES_PER_HOUR && MINUTES_PER_HOUR % minutes == 0)
            .then_some(Self { minutes })
    }

    /// Minutes per grid step.
    pub fn minutes(self) -> u8 {
        self.minutes
    }

    /// Grid steps per clock hour.
    pub fn steps_per_hour(self) -> usize {
        usize::from(MINUTES_PER_HOUR / self.minutes)
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::QUARTER_HOUR
    }
}

/// Result of a cheapest-window search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheapestWindow {
    /// Period that was searched.
    pub period: Period,
    /// Day bucket in which the window starts.
    pub start_day: Day,
    /// Start as a clock hour with fraction within `start_day` (6.5 = 06:30).
    pub start_hour: f64,
    /// Day bucket in which the window ends.
    pub end_day: Day,
    /// End as a clock hour with fraction within `end_day`.
    pub end_hour: f64,
    /// Start offset in hours from the first hour of the period's timeline.
    pub start_offset_hours: f64,
    /// Window length in hours, exactly as requested.
    pub duration_hours: f64,
    /// Sum of overlap-weighted hourly prices.
    pub total_cost: Decimal,
    /// `total_cost / duration_hours`.
    pub average_price_per_hour: Decimal,
}

impl CheapestWindow {
    /// Start time as `HH:MM`.
    pub fn start_label(&self) -> String {
        clock_label(self.start_hour)
    }

    /// End time as `HH:MM`.
    pub fn end_label(&self) -> String {
        clock_label(self.end_hour)
    }
}

impl fmt::Display for CheapestWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} h {:<5} {} {} -> {} {} | total {} avg {}",
            self.duration_hours,
            self.period,
            self.start_label(),
            self.start_day,
            self.end_label(),
            self.end_day,
            self.total_cost.round_dp(4),
            self.average_price_per_hour.round_dp(4),
        )
    }
}

/// Finds the cheapest contiguous window of exactly `duration_hours` in
/// `period`.
///
/// Start points lie on the granularity grid; the end point is wherever the
/// duration takes it, so the first and last hour may be partially covered.
/// Ties between equally cheap windows go to the earliest start.
///
/// # Errors
///
/// - [`PriceError::InvalidDuration`] if the duration is not finite, not
///   positive, or exceeds [`Period::capacity_hours`].
/// - [`PriceError::InsufficientWindowCoverage`] if the series has fewer
///   hours in the period than the window needs.
pub fn cheapest_window(
    series: &PriceSeries,
    period: Period,
    duration_hours: f64,
    granularity: Granularity,
) -> PriceResult<CheapestWindow> {
    if !duration_hours.is_finite()
        || duration_hours <= 0.0
        || duration_hours > period.capacity_hours()
    {
        return Err(PriceError::InvalidDuration(duration_hours));
    }
    let window_minutes = duration_minutes(duration_hours)
        .filter(|minutes| *minutes > Decimal::ZERO)
        .ok_or(PriceError::InvalidDuration(duration_hours))?;

    let slots = series.period_timeline(period);
    let total_minutes = Decimal::from(slots.len() * usize::from(MINUTES_PER_HOUR));
    if window_minutes > total_minutes {
        return Err(PriceError::InsufficientWindowCoverage {
            requested: duration_hours,
            available: slots.len(),
        });
    }

    let step = Decimal::from(granularity.minutes());
    // Last grid start whose window still ends inside the timeline.
    let last_start = ((total_minutes - window_minutes) / step).floor();
    let candidates = last_start.to_usize().unwrap_or_default() + 1;

    let (best_start, best_sum) = slide(&slots, step, window_minutes, candidates);

    let steps_per_hour = granularity.steps_per_hour();
    let start_slot = slots[best_start / steps_per_hour];
    let start_minutes = (best_start % steps_per_hour) * usize::from(granularity.minutes());
    let start_logical = start_slot.logical_hour() as f64 + start_minutes as f64 / 60.0;
    let (start_day, start_hour) = split_logical(start_logical);
    let (end_day, end_hour) = split_logical(start_logical + duration_hours);

    let window = CheapestWindow {
        period,
        start_day,
        start_hour,
        end_day,
        end_hour,
        start_offset_hours: best_start as f64 / steps_per_hour as f64,
        duration_hours,
        total_cost: (best_sum / Decimal::from(MINUTES_PER_HOUR)).normalize(),
        average_price_per_hour: (best_sum / window_minutes).normalize(),
    };

    debug!(
        %period,
        duration_hours,
        candidates,
        start = %window.start_label(),
        total = %window.total_cost,
        "cheapest window found"
    );

    Ok(window)
}

/// Exact window length in minutes.
///
/// Goes through the shortest decimal representation of the float, so a
/// request of 2.3 h costs exactly 138 minutes.
fn duration_minutes(duration_hours: f64) -> Option<Decimal> {
    let hours = Decimal::from_str(&duration_hours.to_string()).ok()?;
    hours.checked_mul(Decimal::from(MINUTES_PER_HOUR))
}

/// Price-times-minutes covered by `[from, to)` on the period timeline, with
/// slot `i` spanning minutes `[60 i, 60 (i + 1))`.
fn cost_between(slots: &[TimelineSlot], from: Decimal, to: Decimal) -> Decimal {
    let hour = Decimal::from(MINUTES_PER_HOUR);
    let first = (from / hour).floor().to_usize().unwrap_or_default();
    let mut cost = Decimal::ZERO;
    for (i, slot) in slots.iter().enumerate().skip(first) {
        let slot_start = Decimal::from(i) * hour;
        if slot_start >= to {
            break;
        }
        let overlap = to.min(slot_start + hour) - from.max(slot_start);
        if overlap > Decimal::ZERO {
            cost += slot.price * overlap;
        }
    }
    cost
}

/// Slides a window of `window_minutes` over grid starts `0, step, 2 step,
/// ...` and returns the earliest start index with the minimal sum.
///
/// Moving by one step drops the cost of the trailing step and adds the cost
/// of the step past the leading edge, which may straddle an hour boundary.
/// Sums are kept in exact price-times-minutes units.
fn slide(
    slots: &[TimelineSlot],
    step: Decimal,
    window_minutes: Decimal,
    candidates: usize,
) -> (usize, Decimal) {
    let mut running = cost_between(slots, Decimal::ZERO, window_minutes);
    let mut best = (0, running);

    for start in 1..candidates {
        let prev = Decimal::from(start - 1) * step;
        let lead = prev + window_minutes;
        running += cost_between(slots, lead, lead + step) - cost_between(slots, prev, prev + step);
        if running < best.1 {
            best = (start, running);
        }
    }

    best
}

fn split_logical(logical_hour: f64) -> (Day, f64) {
    let day_hours = HOURS_PER_DAY as f64;
    if logical_hour < day_hours {
        (Day::Today, logical_hour)
    } else {
        (Day::Tomorrow, logical_hour - day_hours)
    }
}

fn clock_label(hour: f64) -> String {
    let minutes = (hour * 60.0).round() as u32;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn series(today: &[i64], tomorrow: Option<&[i64]>) -> PriceSeries {
        let today: Vec<Decimal> = today.iter().copied().map(Decimal::from).collect();
        let tomorrow: Option<Vec<Decimal>> =
            tomorrow.map(|t| t.iter().copied().map(Decimal::from).collect());
        PriceSeries::from_hourly(&today, tomorrow.as_deref()).unwrap()
    }

    /// Reference search: for every grid start, overlap of each clock hour
    /// with `[start, start + duration)` in minutes, computed independently
    /// of the sliding update.
    fn brute_force(slots: &[TimelineSlot], step_minutes: i64, duration: Decimal) -> (i64, Decimal) {
        let window = duration * Decimal::from(60);
        let total = Decimal::from(slots.len() as i64 * 60);
        let mut best: Option<(i64, Decimal)> = None;
        let mut start = 0_i64;
        while Decimal::from(start) + window <= total {
            let lo = Decimal::from(start);
            let hi = lo + window;
            let mut cost = Decimal::ZERO;
            for (i, slot) in slots.iter().enumerate() {
                let slot_lo = Decimal::from(i as i64 * 60);
                let overlap = hi.min(slot_lo + Decimal::from(60)) - lo.max(slot_lo);
                if overlap > Decimal::ZERO {
                    cost += slot.price * overlap / Decimal::from(60);
                }
            }
            if best.is_none_or(|(_, b)| cost < b) {
                best = Some((start, cost));
            }
            start += step_minutes;
        }
        best.unwrap()
    }

    #[test]
    fn fractional_duration_weights_partial_hours() {
        let mut today = vec![10; 24];
        today[6] = 5;
        today[7] = 1;
        today[8] = 1;
        today[9] = 8;
        let s = series(&today, None);

        let w = cheapest_window(&s, Period::Day, 2.5, Granularity::QUARTER_HOUR).unwrap();
        // 06:30-09:00: half of hour 6, all of hours 7 and 8.
        assert_eq!(w.start_day, Day::Today);
        assert_eq!(w.start_hour, 6.5);
        assert_eq!(w.end_hour, 9.0);
        assert_eq!(w.start_offset_hours, 0.5);
        assert_eq!(w.total_cost, Decimal::new(45, 1));
        assert_eq!(w.average_price_per_hour, Decimal::new(18, 1));
        assert_eq!(w.start_label(), "06:30");
        assert_eq!(w.end_label(), "09:00");
    }

    #[test]
    fn whole_hour_grid_keeps_exact_duration() {
        let mut today = vec![10; 24];
        today[6] = 5;
        today[7] = 1;
        today[8] = 1;
        today[9] = 8;
        let s = series(&today, None);

        let w = cheapest_window(&s, Period::Day, 2.5, Granularity::HOUR).unwrap();
        // 07:00-09:30 costs 1 + 1 + half of 8; 06:00-08:30 would cost 6.5.
        assert_eq!(w.duration_hours, 2.5);
        assert_eq!(w.start_hour, 7.0);
        assert_eq!(w.end_hour, 9.5);
        assert_eq!(w.total_cost, Decimal::from(6));
        assert_eq!(w.average_price_per_hour, Decimal::new(24, 1));
    }

    #[test]
    fn integer_duration_matches_whole_hour_sums() {
        let today = [
            9, 7, 8, 3, 6, 5, 4, 8, 2, 9, 1, 6, 3, 7, 2, 8, 5, 4, 9, 6, 7, 3, 8, 5,
        ];
        let s = series(&today, None);

        let sums: Vec<i64> = (6..=15).map(|h| today[h..h + 3].iter().sum()).collect();
        let min = *sums.iter().min().unwrap();
        let first = sums.iter().position(|&v| v == min).unwrap() + 6;

        for granularity in [Granularity::HOUR, Granularity::HALF_HOUR, Granularity::QUARTER_HOUR] {
            let w = cheapest_window(&s, Period::Day, 3.0, granularity).unwrap();
            assert_eq!(w.total_cost, Decimal::from(min), "{granularity:?}");
            assert_eq!(w.start_hour, first as f64, "{granularity:?}");
        }
    }

    #[test]
    fn night_window_straddles_midnight() {
        let mut today = vec![20; 24];
        today[23] = 2;
        let mut tomorrow = vec![20; 24];
        tomorrow[0] = 1;
        tomorrow[1] = 3;
        let s = series(&today, Some(&tomorrow));

        let w = cheapest_window(&s, Period::Night, 3.0, Granularity::default()).unwrap();
        assert_eq!((w.start_day, w.start_hour), (Day::Today, 23.0));
        assert_eq!((w.end_day, w.end_hour), (Day::Tomorrow, 2.0));
        assert_eq!(w.start_offset_hours, 5.0);
        assert_eq!(w.total_cost, Decimal::from(6));
        assert_eq!(w.average_price_per_hour, Decimal::from(2));
    }

    #[test]
    fn full_night_window_starts_at_eighteen() {
        let s = series(&[4; 24], Some(&[4; 24]));
        let w = cheapest_window(&s, Period::Night, 12.0, Granularity::default()).unwrap();
        assert_eq!((w.start_day, w.start_hour), (Day::Today, 18.0));
        assert_eq!((w.end_day, w.end_hour), (Day::Tomorrow, 6.0));
        assert_eq!(w.total_cost, Decimal::from(48));
    }

    #[test]
    fn ties_go_to_earliest_start() {
        let s = series(&[5; 24], None);
        let w = cheapest_window(&s, Period::Day, 1.75, Granularity::default()).unwrap();
        assert_eq!(w.start_hour, 6.0);
        assert_eq!(w.total_cost, Decimal::new(875, 2));
    }

    #[test]
    fn negative_prices_are_preferred() {
        let mut today = vec![3; 24];
        today[13] = -4;
        let s = series(&today, None);
        let w = cheapest_window(&s, Period::Day, 0.5, Granularity::default()).unwrap();
        assert_eq!(w.start_hour, 13.0);
        assert_eq!(w.total_cost, Decimal::from(-2));
    }

    #[test]
    fn insufficient_night_coverage_without_tomorrow() {
        let s = series(&[1; 24], None);
        let err = cheapest_window(&s, Period::Night, 10.0, Granularity::default()).unwrap_err();
        assert_eq!(
            err,
            PriceError::InsufficientWindowCoverage {
                requested: 10.0,
                available: 6,
            }
        );
        assert!(cheapest_window(&s, Period::Night, 6.0, Granularity::default()).is_ok());
    }

    #[test]
    fn empty_series_has_no_coverage() {
        let err = cheapest_window(&PriceSeries::empty(), Period::Day, 1.0, Granularity::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PriceError::InsufficientWindowCoverage { available: 0, .. }
        ));
    }

    #[test]
    fn invalid_durations_are_rejected() {
        let s = series(&[1; 24], Some(&[1; 24]));
        for d in [0.0, -1.0, 24.5, f64::NAN, f64::INFINITY] {
            let err = cheapest_window(&s, Period::Day, d, Granularity::default()).unwrap_err();
            assert!(matches!(err, PriceError::InvalidDuration(_)), "{d}");
        }
        let err = cheapest_window(&s, Period::Night, 12.25, Granularity::default()).unwrap_err();
        assert_eq!(err, PriceError::InvalidDuration(12.25));
    }

    #[test]
    fn day_duration_beyond_twelve_hours_lacks_coverage() {
        let s = series(&[1; 24], Some(&[1; 24]));
        let err = cheapest_window(&s, Period::Day, 13.0, Granularity::default()).unwrap_err();
        assert_eq!(
            err,
            PriceError::InsufficientWindowCoverage {
                requested: 13.0,
                available: 12,
            }
        );
    }

    #[test]
    fn off_grid_duration_is_costed_exactly() {
        let s = series(&[2; 24], None);
        let w = cheapest_window(&s, Period::Day, 2.3, Granularity::default()).unwrap();
        assert_eq!(w.duration_hours, 2.3);
        assert_eq!(w.total_cost, Decimal::new(46, 1));
        assert_eq!(w.average_price_per_hour, Decimal::from(2));
        assert_eq!(w.start_label(), "06:00");
        assert_eq!(w.end_label(), "08:18");
    }

    #[test]
    fn short_duration_below_one_step_is_valid() {
        let mut today = vec![4; 24];
        today[10] = 1;
        let s = series(&today, None);
        let w = cheapest_window(&s, Period::Day, 0.1, Granularity::default()).unwrap();
        assert_eq!(w.start_hour, 10.0);
        assert_eq!(w.duration_hours, 0.1);
        assert_eq!(w.total_cost, Decimal::new(1, 1));
        assert_eq!(w.average_price_per_hour, Decimal::ONE);
    }

    #[test]
    fn sliding_total_matches_brute_force_on_random_series() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..25 {
            let today: Vec<Decimal> = (0..24)
                .map(|_| Decimal::new(rng.random_range(-500..5000), 3))
                .collect();
            let tomorrow: Vec<Decimal> = (0..24)
                .map(|_| Decimal::new(rng.random_range(-500..5000), 3))
                .collect();
            let s = PriceSeries::from_hourly(&today, Some(&tomorrow)).unwrap();

            for period in [Period::Day, Period::Night] {
                let slots = s.period_timeline(period);
                for granularity in [
                    Granularity::QUARTER_HOUR,
                    Granularity::HALF_HOUR,
                    Granularity::HOUR,
                ] {
                    let step = i64::from(granularity.minutes());
                    for d in [0.1, 0.25, 0.75, 1.3, 2.5, 2.7, 4.25, 7.05, 11.9, 12.0] {
                        let (start, cost) =
                            brute_force(&slots, step, Decimal::from_str(&d.to_string()).unwrap());
                        let w = cheapest_window(&s, period, d, granularity).unwrap();
                        assert_eq!(w.duration_hours, d);
                        assert_eq!(w.total_cost, cost.normalize(), "{period} {d} {granularity:?}");
                        assert_eq!(w.start_offset_hours, start as f64 / 60.0);
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let s = series(&[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3, 2, 3, 8, 4, 6, 2, 6, 4], None);
        let a = cheapest_window(&s, Period::Day, 2.75, Granularity::default());
        let b = cheapest_window(&s, Period::Day, 2.75, Granularity::default());
        assert_eq!(a, b);
    }

    #[test]
    fn granularity_must_divide_the_hour() {
        assert_eq!(Granularity::from_minutes(15), Some(Granularity::QUARTER_HOUR));
        assert_eq!(Granularity::from_minutes(1).map(Granularity::steps_per_hour), Some(60));
        assert!(Granularity::from_minutes(0).is_none());
        assert!(Granularity::from_minutes(7).is_none());
        assert!(Granularity::from_minutes(90).is_none());
        assert!(Granularity::from_minutes(300).is_none());
    }
}
