//! MACD histogram.
//!
//! MACD line = EMA(close, fast) - EMA(close, slow); signal line = EMA of the
//! MACD line over `signal` periods; histogram = MACD line - signal line.
//! Lookback: (slow - 1) + (signal - 1).

use crate::domain::Bar;
use crate::indicators::ema::ema_of_series;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct MacdHistogram {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl MacdHistogram {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be shorter than slow");
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for MacdHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow + self.signal - 2
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.slow {
            return result;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast_ema = ema_of_series(&closes, self.fast);
        let slow_ema = ema_of_series(&closes, self.slow);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(f, s)| f - s)
            .collect();

        // The signal EMA is seeded on the valid tail of the MACD line, past
        // the slow EMA's warm-up prefix.
        let first_valid = match macd_line.iter().position(|v| !v.is_nan()) {
            Some(i) => i,
            None => return result,
        };
        let signal_tail = ema_of_series(&macd_line[first_valid..], self.signal);

        for (offset, sig) in signal_tail.iter().enumerate() {
            let i = first_valid + offset;
            result[i] = macd_line[i] - sig;
        }

        result
    }
}
