//! Rolling-window statistics over plain f64 series.
//!
//! Used for series that are not close prices: log-return volatility, the
//! volume moving average, and stochastic %K smoothing. A window containing
//! any NaN yields NaN at that index.

/// Rolling mean over `period` values. First `period - 1` outputs are NaN.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }
    result
}

/// Rolling standard deviation over `period` values.
///
/// `ddof` selects the divisor `period - ddof`: 0 for population stddev
/// (Bollinger bands), 1 for sample stddev (log-return volatility, matching
/// the usual statistics-library default).
pub fn rolling_std(values: &[f64], period: usize, ddof: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period || ddof >= period {
        return result;
    }

    let divisor = (period - ddof) as f64;
    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / period as f64;
        let sum_sq: f64 = window.iter().map(|v| (v - mean) * (v - mean)).sum();
        result[i] = (sum_sq / divisor).sqrt();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rolling_mean_basic() {
        let result = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_mean_nan_window() {
        let result = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 3);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert_approx(result[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_std_population() {
        // Window [2, 4, 6]: mean 4, variance (4+0+4)/3
        let result = rolling_std(&[2.0, 4.0, 6.0], 3, 0);
        assert_approx(result[2], (8.0f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_std_sample() {
        // Window [2, 4, 6]: mean 4, variance (4+0+4)/2 = 4
        let result = rolling_std(&[2.0, 4.0, 6.0], 3, 1);
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_std_constant_is_zero() {
        let result = rolling_std(&[5.0; 6], 4, 1);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
        assert_approx(result[5], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn too_few_values_all_nan() {
        assert!(rolling_mean(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
        assert!(rolling_std(&[1.0, 2.0], 5, 1).iter().all(|v| v.is_nan()));
    }
}
