//! On-Balance Volume (OBV).
//!
//! Cumulative volume flow: add the bar's volume when the close rises,
//! subtract it when the close falls, leave unchanged on an equal close.
//! Seeded at the first bar's volume. Lookback: 0.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Obv {
    name: String,
}

impl Obv {
    pub fn new() -> Self {
        Self { name: "obv".into() }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n == 0 {
            return result;
        }

        let mut obv = bars[0].volume as f64;
        result[0] = obv;
        for i in 1..n {
            let prev = bars[i - 1].close;
            let curr = bars[i].close;
            if curr > prev {
                obv += bars[i].volume as f64;
            } else if curr < prev {
                obv -= bars[i].volume as f64;
            }
            result[i] = obv;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn obv_accumulates_with_direction() {
        // Closes: 100 (start), up, down, flat, up. Volume is 1000 per bar.
        let bars = make_bars(&[100.0, 101.0, 99.0, 99.0, 102.0]);
        let result = Obv::new().compute(&bars);
        assert_approx(result[0], 1000.0, DEFAULT_EPSILON);
        assert_approx(result[1], 2000.0, DEFAULT_EPSILON);
        assert_approx(result[2], 1000.0, DEFAULT_EPSILON);
        assert_approx(result[3], 1000.0, DEFAULT_EPSILON); // unchanged on equal close
        assert_approx(result[4], 2000.0, DEFAULT_EPSILON);
    }

    #[test]
    fn obv_empty_series() {
        let result = Obv::new().compute(&[]);
        assert!(result.is_empty());
    }

    #[test]
    fn obv_lookback_is_zero() {
        assert_eq!(Obv::new().lookback(), 0);
    }
}
