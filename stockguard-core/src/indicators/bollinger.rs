//! Bollinger Bands: SMA(close, period) ± multiplier * rolling stddev.
//!
//! Multi-output: middle, upper, lower, and the normalized width
//! `(upper - lower) / middle * 100`. Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::rolling::{rolling_mean, rolling_std};

/// All four Bollinger series, aligned with the input bars.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

pub fn bollinger_bands(bars: &[Bar], period: usize, multiplier: f64) -> BollingerBands {
    assert!(period >= 1, "Bollinger period must be >= 1");
    let n = bars.len();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let middle = rolling_mean(&closes, period);
    let stddev = rolling_std(&closes, period, 0);

    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];
    let mut width = vec![f64::NAN; n];
    for i in 0..n {
        if middle[i].is_nan() || stddev[i].is_nan() {
            continue;
        }
        upper[i] = middle[i] + multiplier * stddev[i];
        lower[i] = middle[i] - multiplier * stddev[i];
        // Non-finite on a zero middle band; the engine's null-drop policy
        // removes such bars.
        width[i] = (upper[i] - lower[i]) / middle[i] * 100.0;
    }

    BollingerBands {
        middle,
        upper,
        lower,
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn middle_band_is_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let bands = bollinger_bands(&bars, 3, 2.0);
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.middle[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_are_symmetric_around_middle() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let bands = bollinger_bands(&bars, 3, 2.0);
        for i in 2..5 {
            let half_up = bands.upper[i] - bands.middle[i];
            let half_down = bands.middle[i] - bands.lower[i];
            assert_approx(half_up, half_down, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn constant_price_collapses_bands() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let bands = bollinger_bands(&bars, 3, 2.0);
        assert_approx(bands.upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.width[2], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn width_is_normalized_by_middle() {
        let bars = make_bars(&[10.0, 12.0, 14.0, 16.0]);
        let bands = bollinger_bands(&bars, 3, 2.0);
        let expected = (bands.upper[2] - bands.lower[2]) / bands.middle[2] * 100.0;
        assert_approx(bands.width[2], expected, DEFAULT_EPSILON);
    }
}
