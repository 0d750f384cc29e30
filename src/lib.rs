//! Electricity spot-price aggregation for today and tomorrow.
//!
//! A [`series::PriceSeries`] holds hourly prices for today and, once the
//! provider has published them, tomorrow. The [`stats`] functions answer
//! questions over it: highest and lowest prices, and the cheapest
//! contiguous window of a given length in the day (06–18) or night
//! (18–06) period.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod provider;
pub mod report;
pub mod series;
pub mod stats;
pub mod synthetic;
