//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use spot_stats::series::PriceSeries;

/// Parses a decimal literal.
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Today's prices: cheap early morning, peak at 11:00, second dip at 20:00.
pub const SAMPLE_TODAY: [&str; 24] = [
    "0.20", "0.19", "0.18", "0.17", "0.16", "0.15", "0.22", "0.24", "0.26", "0.28", "0.30", "0.32",
    "0.31", "0.29", "0.27", "0.25", "0.23", "0.21", "0.19", "0.17", "0.15", "0.16", "0.18", "0.20",
];

/// Tomorrow's prices: minimum 0.10 at 04:00, flat 0.30 after 06:00.
pub fn sample_tomorrow() -> Vec<&'static str> {
    let mut tomorrow = vec!["0.14", "0.13", "0.12", "0.11", "0.10", "0.11"];
    tomorrow.resize(24, "0.30");
    tomorrow
}

/// Sample series with tomorrow published.
pub fn sample_series() -> PriceSeries {
    let today: Vec<Decimal> = SAMPLE_TODAY.iter().map(|s| dec(s)).collect();
    let tomorrow: Vec<Decimal> = sample_tomorrow().iter().map(|s| dec(s)).collect();
    PriceSeries::from_hourly(&today, Some(tomorrow.as_slice())).unwrap()
}

/// Sample series before tomorrow's prices are published.
pub fn sample_today_only() -> PriceSeries {
    let today: Vec<Decimal> = SAMPLE_TODAY.iter().map(|s| dec(s)).collect();
    PriceSeries::from_hourly(&today, None).unwrap()
}

/// Series built from integer prices.
pub fn int_series(today: &[i64], tomorrow: Option<&[i64]>) -> PriceSeries {
    let today: Vec<Decimal> = today.iter().copied().map(Decimal::from).collect();
    let tomorrow: Option<Vec<Decimal>> =
        tomorrow.map(|t| t.iter().copied().map(Decimal::from).collect());
    PriceSeries::from_hourly(&today, tomorrow.as_deref()).unwrap()
}

/// Provider-style JSON body with both days, prices as decimal-comma strings.
///
/// Today is 2025-08-04 with `0.20 + h/100`; tomorrow `0.25 + h/100`.
pub fn provider_body() -> String {
    let mut datum = Vec::new();
    let mut wert = Vec::new();
    for (date, base) in [("04.08.25", 20), ("05.08.25", 25)] {
        for hour in 0..24 {
            datum.push(format!("{date}, {hour:02}:00 Uhr"));
            wert.push(format!("0,{:02}", base + hour));
        }
    }
    serde_json::json!({ "result": { "errorCode": 0, "datum": datum, "wert": wert } }).to_string()
}
