//! Deterministic synthetic market data.
//!
//! A seeded random walk over a fixed coverage window, with periodic shock
//! days (outsized move plus a volume burst) so anomaly detection has
//! something to find. Used by tests, benches, and offline runs; never by
//! default in production analysis.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, MarketDataProvider, RawBar};

/// In-memory provider generating one bar per calendar day inside its
/// coverage window. Generation is a pure function of the seed and the
/// coverage window, so repeated fetches are identical.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    coverage_start: NaiveDate,
    coverage_end: NaiveDate,
    /// Every n-th bar becomes a shock day. `None` disables shocks.
    shock_every: Option<usize>,
}

impl SyntheticProvider {
    pub fn new(coverage_start: NaiveDate, coverage_end: NaiveDate) -> Self {
        Self {
            seed: 7,
            coverage_start,
            coverage_end,
            shock_every: Some(97),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shock_every(mut self, every: Option<usize>) -> Self {
        self.shock_every = every;
        self
    }

    /// Generate the full coverage series.
    pub fn bars(&self) -> Vec<RawBar> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let days = (self.coverage_end - self.coverage_start).num_days();
        if days < 0 {
            return Vec::new();
        }

        let mut close = 100.0;
        let mut bars = Vec::with_capacity(days as usize + 1);
        for i in 0..=days {
            let date = self.coverage_start + Duration::days(i);
            let shock = matches!(self.shock_every, Some(every) if every > 0 && i as usize % every == every - 1);

            let mut step: f64 = rng.gen_range(-0.012..0.012);
            let mut volume = rng.gen_range(800_000..1_200_000u64);
            if shock {
                step *= 6.0;
                volume *= 5;
            }

            let open = close;
            close = (close * (1.0 + step)).max(1.0);
            let spread = close.max(open) * rng.gen_range(0.001..0.008);
            bars.push(RawBar {
                date,
                open,
                high: open.max(close) + spread,
                low: open.min(close) - spread,
                close,
                volume,
            });
        }
        bars
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        _symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        Ok(self
            .bars()
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect())
    }
}
