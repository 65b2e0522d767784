//! Daily spend trend.
//!
//! The backend has no daily-spend endpoint yet, so this view synthesizes one
//! pseudo-random point per calendar day of the selected range. The series is
//! a placeholder; wire it to `GET /analytics/cost/daily` only once that
//! contract is confirmed. A seed (`[dashboard] trend_seed`) makes the series
//! reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{DailySpend, DateRange};
use crate::resource::{RemoteResource, ResourceState};

/// Lower bound of a synthesized daily cost (USD).
const MOCK_MIN_COST: f64 = 800.0;

/// Width of the synthesized cost band (USD).
const MOCK_COST_SPREAD: f64 = 700.0;

/// Synthesize one point per day of `range`, both ends included.
pub fn mock_daily_spend(range: &DateRange, rng: &mut impl Rng) -> Vec<DailySpend> {
    range
        .days()
        .map(|date| {
            let cost = MOCK_MIN_COST + rng.gen_range(0.0..MOCK_COST_SPREAD);
            DailySpend {
                date,
                cost: (cost * 100.0).round() / 100.0,
            }
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct TrendChart {
    seed: Option<u64>,
    resource: RemoteResource<DateRange, Vec<DailySpend>>,
}

impl TrendChart {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            resource: RemoteResource::new(),
        }
    }

    pub fn load(&mut self, range: DateRange) -> &ResourceState<Vec<DailySpend>> {
        let seed = self.seed;
        self.resource.load(range, |r| Ok(generate(r, seed)))
    }

    pub fn retry(&mut self) -> &ResourceState<Vec<DailySpend>> {
        let seed = self.seed;
        self.resource.retry(|r| Ok(generate(r, seed)))
    }

    pub fn state(&self) -> &ResourceState<Vec<DailySpend>> {
        self.resource.state()
    }

    /// Total spend over the range, if loaded.
    pub fn total(&self) -> Option<f64> {
        self.state().data().map(|d| d.iter().map(|p| p.cost).sum())
    }
}

fn generate(range: &DateRange, seed: Option<u64>) -> Vec<DailySpend> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    mock_daily_spend(range, &mut rng)
}
