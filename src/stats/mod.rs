//! Aggregation queries over a [`PriceSeries`](crate::series::PriceSeries).
//!
//! Every function here is pure: it reads an immutable series and returns a
//! value or a [`PriceError`](crate::error::PriceError). Nothing is cached
//! between calls, so concurrent callers need no synchronization.

pub mod extrema;
pub mod window;

pub use extrema::{
    PricePoint, highest_price_today, highest_today, lowest_day, lowest_night, lowest_price_day,
    lowest_price_night, price_at,
};
pub use window::{CheapestWindow, Granularity, cheapest_window};
