//! Seeded synthetic price series for demos and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

use crate::series::{HOURS_PER_DAY, PriceSeries};

/// Decimal places kept in generated prices.
const PRICE_SCALE: u32 = 4;

/// Generator for a plausible two-day hourly price curve.
///
/// The curve has a cheap night, a morning ramp, a solar dip around noon and
/// an evening peak, with Gaussian noise on top. Identical seeds produce
/// identical series.
///
/// # Examples
///
/// ```
/// use spot_stats::synthetic::SyntheticPrices;
///
/// let a = SyntheticPrices::new(42).series(true);
/// let b = SyntheticPrices::new(42).series(true);
/// assert_eq!(a, b);
/// assert_eq!(a.today().len(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticPrices {
    /// Average price level per kWh.
    pub base_price: f64,
    /// Height of the evening peak above base.
    pub evening_peak: f64,
    /// Depth of the midday solar dip below base.
    pub solar_dip: f64,
    /// Standard deviation of the hourly noise.
    pub noise_std: f64,
    seed: u64,
}

impl SyntheticPrices {
    /// Creates a generator with default curve parameters.
    pub fn new(seed: u64) -> Self {
        Self {
            base_price: 0.28,
            evening_peak: 0.12,
            solar_dip: 0.08,
            noise_std: 0.015,
            seed,
        }
    }

    /// Generates today's prices and, if `with_tomorrow`, tomorrow's.
    pub fn series(&self, with_tomorrow: bool) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let today = self.day_prices(&mut rng);
        let tomorrow = with_tomorrow.then(|| self.day_prices(&mut rng));
        // Always 24 entries per day, so construction cannot fail.
        PriceSeries::from_hourly(&today, tomorrow.as_deref()).unwrap_or_default()
    }

    fn day_prices(&self, rng: &mut StdRng) -> Vec<Decimal> {
        (0..HOURS_PER_DAY)
            .map(|hour| {
                let value = self.shape(hour) + gaussian_noise(rng, self.noise_std);
                to_price(value)
            })
            .collect()
    }

    /// Noise-free price for an hour of the day.
    fn shape(&self, hour: usize) -> f64 {
        let h = hour as f64;
        let night = if hour < 6 { -0.06 } else { 0.0 };
        let evening = self.evening_peak * bump(h, 18.5, 2.0);
        let morning = 0.5 * self.evening_peak * bump(h, 8.0, 1.5);
        let solar = self.solar_dip * bump(h, 13.0, 2.5);
        self.base_price + night + morning + evening - solar
    }
}

fn bump(h: f64, center: f64, width: f64) -> f64 {
    let z = (h - center) / width;
    (-0.5 * z * z).exp()
}

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

fn to_price(value: f64) -> Decimal {
    let scaled = (value * 10f64.powi(PRICE_SCALE as i32)).round() as i64;
    Decimal::new(scaled, PRICE_SCALE)
}
