//! Anomaly detector: builds the feature matrix, fits the forest, and writes
//! labels and scores back onto the bars.

use ndarray::Array2;

use crate::anomaly::isolation_forest::IsolationForest;
use crate::domain::{AnomalyFlag, Bar};
use crate::error::AnalysisError;
use crate::rng::SeedHierarchy;

/// Derived columns the detector feeds to the forest, in matrix order.
pub const ANOMALY_FEATURES: [&str; 11] = [
    "returns",
    "log_returns",
    "volatility_14",
    "rsi",
    "macd",
    "vol_spike",
    "atr",
    "adx",
    "stoch_k",
    "dist_ma_50",
    "dist_ma_200",
];

/// Below this many bars the model is unreliable; everything is labeled
/// normal with a zero score instead of fitting.
pub const MIN_DETECT_SAMPLES: usize = 50;

/// Seeded isolation-forest detector.
///
/// `detect` labels each bar and assigns `anomaly_score = threshold - score`,
/// so anomalous bars carry strictly negative values and lower means more
/// anomalous. With `k = round(contamination * n)`, the threshold is the
/// `(k + 1)`-th highest raw score and only scores strictly above it are
/// labeled anomalous: ties at the threshold stay normal, and `k = 0` flags
/// nothing. Distinct scores therefore yield exactly `k` anomalies;
/// degenerate tie-heavy matrices yield fewer, never more.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    contamination: f64,
    n_trees: usize,
    seeds: SeedHierarchy,
}

impl AnomalyDetector {
    /// Fails with `InvalidContamination` unless `contamination` lies in the
    /// open interval `(0, 0.5)`.
    pub fn new(contamination: f64, seed: u64) -> Result<Self, AnalysisError> {
        if !(contamination > 0.0 && contamination < 0.5) {
            return Err(AnalysisError::InvalidContamination {
                value: contamination,
            });
        }
        Ok(Self {
            contamination,
            n_trees: IsolationForest::DEFAULT_N_TREES,
            seeds: SeedHierarchy::new(seed),
        })
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    /// Label every bar and return the number marked anomalous.
    pub fn detect(&self, bars: &mut [Bar]) -> Result<usize, AnalysisError> {
        // Only columns resolved on every bar participate; a column missing
        // anywhere is excluded rather than failing the run. With zero usable
        // columns the series is returned untouched, even when it is short.
        let columns: Vec<&str> = ANOMALY_FEATURES
            .iter()
            .copied()
            .filter(|name| bars.iter().all(|b| b.feature(name).is_some()))
            .collect();
        if columns.is_empty() {
            return Ok(0);
        }

        let n = bars.len();
        if n < MIN_DETECT_SAMPLES {
            for bar in bars.iter_mut() {
                bar.anomaly = Some(AnomalyFlag::Normal);
                bar.anomaly_score = Some(0.0);
            }
            return Ok(0);
        }

        let matrix = feature_matrix(bars, &columns)?;
        let forest = IsolationForest::fit(matrix.view(), self.n_trees, &self.seeds);
        let scores = forest.score_samples(matrix.view());
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(AnalysisError::ModelFitting(
                "non-finite score produced by the forest".into(),
            ));
        }

        let threshold = self.threshold(&scores);
        let mut anomalies = 0;
        for (bar, &score) in bars.iter_mut().zip(&scores) {
            let flag = if score > threshold {
                anomalies += 1;
                AnomalyFlag::Anomalous
            } else {
                AnomalyFlag::Normal
            };
            bar.anomaly = Some(flag);
            bar.anomaly_score = Some(threshold - score);
        }
        Ok(anomalies)
    }

    /// Highest raw score that stays normal: the `(k + 1)`-th highest with
    /// `k = round(contamination * n)`. Scores strictly above it are flagged,
    /// so threshold ties are not anomalous and `k = 0` flags nothing.
    fn threshold(&self, scores: &[f64]) -> f64 {
        let n = scores.len();
        let k = ((self.contamination * n as f64).round() as usize).min(n - 1);
        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted[k]
    }

}

fn feature_matrix(bars: &[Bar], columns: &[&str]) -> Result<Array2<f64>, AnalysisError> {
    let mut flat = Vec::with_capacity(bars.len() * columns.len());
    for bar in bars {
        for &name in columns {
            // Presence was established per-column above; finiteness was not.
            let value = bar.feature(name).unwrap_or(f64::NAN);
            if !value.is_finite() {
                return Err(AnalysisError::FeatureComputation(format!(
                    "column {name} non-finite on {}",
                    bar.date
                )));
            }
            flat.push(value);
        }
    }
    Array2::from_shape_vec((bars.len(), columns.len()), flat)
        .map_err(|e| AnalysisError::ModelFitting(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::RawBar;
    use chrono::{Duration, NaiveDate};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn featured_bars(n: usize, seed: u64) -> Vec<Bar> {
        let base_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                let close = 100.0 + rng.gen_range(-2.0..2.0);
                let mut bar = Bar::from_raw(RawBar {
                    date: base_date + Duration::days(i as i64),
                    open: close - 0.3,
                    high: close + 0.8,
                    low: close - 0.8,
                    close,
                    volume: 1_000_000,
                });
                bar.returns = Some(rng.gen_range(-0.01..0.01));
                bar.log_returns = Some(rng.gen_range(-0.01..0.01));
                bar.volatility_14 = Some(rng.gen_range(0.005..0.015));
                bar.rsi = Some(rng.gen_range(40.0..60.0));
                bar.macd = Some(rng.gen_range(-0.5..0.5));
                bar.vol_spike = Some(rng.gen_range(0.8..1.2));
                bar.atr = Some(rng.gen_range(1.0..2.0));
                bar.adx = Some(rng.gen_range(15.0..30.0));
                bar.stoch_k = Some(rng.gen_range(30.0..70.0));
                bar.dist_ma_50 = Some(rng.gen_range(-0.02..0.02));
                bar.dist_ma_200 = Some(rng.gen_range(-0.05..0.05));
                bar
            })
            .collect()
    }

    #[test]
    fn rejects_contamination_outside_open_interval() {
        assert!(AnomalyDetector::new(0.0, 42).is_err());
        assert!(AnomalyDetector::new(0.5, 42).is_err());
        assert!(AnomalyDetector::new(-0.1, 42).is_err());
        assert!(AnomalyDetector::new(f64::NAN, 42).is_err());
        assert!(AnomalyDetector::new(0.05, 42).is_ok());
    }

    #[test]
    fn short_series_all_normal_zero_score() {
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let mut bars = featured_bars(30, 1);
        let count = detector.detect(&mut bars).unwrap();
        assert_eq!(count, 0);
        for bar in &bars {
            assert_eq!(bar.anomaly, Some(AnomalyFlag::Normal));
            assert_eq!(bar.anomaly_score, Some(0.0));
        }
    }

    #[test]
    fn labels_roughly_contamination_share() {
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let mut bars = featured_bars(200, 1);
        let count = detector.detect(&mut bars).unwrap();
        // 5% of 200 = 10; exact with distinct scores, ties only reduce.
        assert!((8..=10).contains(&count), "count = {count}");
        let flagged = bars.iter().filter(|b| b.is_anomalous()).count();
        assert_eq!(flagged, count);
    }

    #[test]
    fn identical_rows_produce_no_anomalies() {
        // Every row ties the threshold score; ties stay normal, so a
        // degenerate constant matrix must not be flagged wholesale.
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let mut bars = featured_bars(60, 1);
        let template = bars[0].clone();
        for bar in bars.iter_mut() {
            bar.returns = template.returns;
            bar.log_returns = template.log_returns;
            bar.volatility_14 = template.volatility_14;
            bar.rsi = template.rsi;
            bar.macd = template.macd;
            bar.vol_spike = template.vol_spike;
            bar.atr = template.atr;
            bar.adx = template.adx;
            bar.stoch_k = template.stoch_k;
            bar.dist_ma_50 = template.dist_ma_50;
            bar.dist_ma_200 = template.dist_ma_200;
        }
        let count = detector.detect(&mut bars).unwrap();
        assert_eq!(count, 0);
        for bar in &bars {
            assert_eq!(bar.anomaly, Some(AnomalyFlag::Normal));
        }
    }

    #[test]
    fn contamination_rounding_to_zero_flags_nothing() {
        // round(0.005 * 60) == 0: no anomaly quota, so nothing is flagged.
        let detector = AnomalyDetector::new(0.005, 42).unwrap();
        let mut bars = featured_bars(60, 1);
        let count = detector.detect(&mut bars).unwrap();
        assert_eq!(count, 0);
        assert!(bars.iter().all(|b| b.anomaly == Some(AnomalyFlag::Normal)));
    }

    #[test]
    fn anomalous_bars_have_lowest_scores() {
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let mut bars = featured_bars(200, 1);
        detector.detect(&mut bars).unwrap();

        let worst_normal = bars
            .iter()
            .filter(|b| !b.is_anomalous())
            .map(|b| b.anomaly_score.unwrap())
            .fold(f64::INFINITY, f64::min);
        for bar in bars.iter().filter(|b| b.is_anomalous()) {
            let score = bar.anomaly_score.unwrap();
            assert!(score < 0.0);
            assert!(score <= worst_normal);
        }
    }

    #[test]
    fn detection_is_deterministic_for_a_seed() {
        let mut a = featured_bars(120, 3);
        let mut b = featured_bars(120, 3);
        AnomalyDetector::new(0.1, 42).unwrap().detect(&mut a).unwrap();
        AnomalyDetector::new(0.1, 42).unwrap().detect(&mut b).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.anomaly, y.anomaly);
            assert_eq!(
                x.anomaly_score.unwrap().to_bits(),
                y.anomaly_score.unwrap().to_bits()
            );
        }
    }

    #[test]
    fn partially_resolved_column_is_excluded_not_fatal() {
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let mut bars = featured_bars(60, 1);
        bars[10].rsi = None; // drops the rsi column, detection still runs
        detector.detect(&mut bars).unwrap();
        assert!(bars.iter().all(|b| b.anomaly.is_some()));
    }

    #[test]
    fn no_resolved_columns_is_a_noop() {
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let base_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let mut bars: Vec<Bar> = (0..60)
            .map(|i| {
                Bar::from_raw(RawBar {
                    date: base_date + Duration::days(i),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0,
                    volume: 1_000_000,
                })
            })
            .collect();
        let count = detector.detect(&mut bars).unwrap();
        assert_eq!(count, 0);
        assert!(bars.iter().all(|b| b.anomaly.is_none()));
    }

    #[test]
    fn short_series_without_columns_is_left_unlabeled() {
        // The no-op on zero usable columns applies before the small-sample
        // policy: a short bare series comes back untouched, not Normal/0.0.
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let base_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let mut bars: Vec<Bar> = (0..30)
            .map(|i| {
                Bar::from_raw(RawBar {
                    date: base_date + Duration::days(i),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0,
                    volume: 1_000_000,
                })
            })
            .collect();
        let count = detector.detect(&mut bars).unwrap();
        assert_eq!(count, 0);
        assert!(bars.iter().all(|b| b.anomaly.is_none()));
        assert!(bars.iter().all(|b| b.anomaly_score.is_none()));
    }

    #[test]
    fn non_finite_column_is_a_feature_error() {
        let detector = AnomalyDetector::new(0.05, 42).unwrap();
        let mut bars = featured_bars(60, 1);
        bars[10].macd = Some(f64::INFINITY);
        let err = detector.detect(&mut bars).unwrap_err();
        assert!(matches!(err, AnalysisError::FeatureComputation(_)));
    }
}
