//! Stochastic oscillator %K.
//!
//! Raw %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over
//! `period` bars, then smoothed with an SMA over `smoothing` periods.
//! A flat high/low window has no defined %K and yields NaN.
//! Lookback: period + smoothing - 2.

use crate::domain::Bar;
use crate::indicators::rolling::rolling_mean;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct StochasticK {
    period: usize,
    smoothing: usize,
    name: String,
}

impl StochasticK {
    pub fn new(period: usize, smoothing: usize) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        assert!(smoothing >= 1, "stochastic smoothing must be >= 1");
        Self {
            period,
            smoothing,
            name: format!("stoch_k_{period}_{smoothing}"),
        }
    }
}

impl Indicator for StochasticK {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period + self.smoothing - 2
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut raw = vec![f64::NAN; n];
        if n < self.period {
            return raw;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range > 0.0 {
                raw[i] = 100.0 * (bars[i].close - lowest) / range;
            }
        }

        rolling_mean(&raw, self.smoothing)
    }
}
