//! Random reference points and synthetic demo fares.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Airline, ChartLayout, PixelPoint, Record};
use crate::error::AppError;

/// Days between consecutive demo observations.
const DEMO_STEP_DAYS: i64 = 7;
/// Number of demo observations per airline (one year of weekly fares).
const DEMO_STEPS: usize = 53;
/// Pull back toward the airline's base fare on every step.
const MEAN_REVERSION: f64 = 0.15;
/// Weekly fare shock standard deviation in dollars.
const FARE_SHOCK_SD: f64 = 18.0;
const MIN_FARE: f64 = 49.0;
/// Base fares for `Airline::KNOWN`, in the same order.
const BASE_FARES: [f64; 3] = [310.0, 365.0, 420.0];

/// RNG for reference points: seeded when reproducibility is requested,
/// otherwise drawn from OS entropy.
pub fn reference_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// `count` points uniformly placed over the drawable area.
pub fn generate_reference_points<R: Rng>(count: usize, layout: &ChartLayout, rng: &mut R) -> Vec<PixelPoint> {
    // `gen_range` panics on an empty range.
    let w = layout.inner_width().max(f64::MIN_POSITIVE);
    let h = layout.inner_height().max(f64::MIN_POSITIVE);
    (0..count)
        .map(|_| PixelPoint::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h)))
        .collect()
}

/// Deterministic weekly fares for the three known airlines over one year.
///
/// Each airline follows a mean-reverting random walk around its own base fare.
/// Rows are interleaved by date, the way an exported fare table would be.
pub fn generate_demo_fares(seed: u64) -> Result<Vec<Record>, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shock = Normal::new(0.0, FARE_SHOCK_SD)
        .map_err(|e| AppError::new(4, format!("Fare distribution error: {e}")))?;

    let start = NaiveDate::from_ymd_opt(2023, 1, 2)
        .ok_or_else(|| AppError::new(4, "Invalid demo start date."))?;

    let bases: Vec<(Airline, f64)> = Airline::KNOWN.into_iter().zip(BASE_FARES).collect();
    let mut prices: Vec<f64> = bases.iter().map(|(_, base)| *base).collect();

    let mut records = Vec::with_capacity(DEMO_STEPS * bases.len());
    for step in 0..DEMO_STEPS {
        let date = start + Duration::days(DEMO_STEP_DAYS * step as i64);
        for ((airline, base), price) in bases.iter().zip(prices.iter_mut()) {
            let drift = MEAN_REVERSION * (base - *price);
            *price = (*price + drift + shock.sample(&mut rng)).max(MIN_FARE);
            records.push(Record {
                date,
                price: (*price * 100.0).round() / 100.0,
                airline: airline.clone(),
            });
        }
    }

    Ok(records)
}
