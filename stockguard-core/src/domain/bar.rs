//! Bar — one trading day, raw OHLCV plus derived indicator fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::provider::RawBar;
use crate::domain::labels::{Action, AnomalyFlag, Sentiment};

/// OHLCV bar for a single trading day.
///
/// Derived fields are `None` until the feature engine has enough history to
/// fill the rolling window behind them; the engine drops any bar that still
/// carries a `None` after all indicators have run. Consumers that read a
/// derived field before then must supply their own documented default (the
/// signal evaluator does exactly that).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,

    // Populated by the feature engine.
    #[serde(default)]
    pub returns: Option<f64>,
    #[serde(default)]
    pub log_returns: Option<f64>,
    #[serde(default)]
    pub volatility_14: Option<f64>,
    #[serde(default)]
    pub ma_50: Option<f64>,
    #[serde(default)]
    pub ma_200: Option<f64>,
    #[serde(default)]
    pub dist_ma_50: Option<f64>,
    #[serde(default)]
    pub dist_ma_200: Option<f64>,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub macd: Option<f64>,
    #[serde(default)]
    pub bb_mid: Option<f64>,
    #[serde(default)]
    pub bb_upper: Option<f64>,
    #[serde(default)]
    pub bb_lower: Option<f64>,
    #[serde(default)]
    pub bb_width: Option<f64>,
    #[serde(default)]
    pub atr: Option<f64>,
    #[serde(default)]
    pub adx: Option<f64>,
    #[serde(default)]
    pub stoch_k: Option<f64>,
    #[serde(default)]
    pub obv: Option<f64>,
    #[serde(default)]
    pub vol_spike: Option<f64>,

    // Populated by the signal evaluator.
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub action: Option<Action>,

    // Populated by the anomaly detector.
    #[serde(default)]
    pub anomaly: Option<AnomalyFlag>,
    #[serde(default)]
    pub anomaly_score: Option<f64>,
}

impl Bar {
    /// Build a bar from a raw provider record, all derived fields unset.
    pub fn from_raw(raw: RawBar) -> Self {
        Self {
            date: raw.date,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
            returns: None,
            log_returns: None,
            volatility_14: None,
            ma_50: None,
            ma_200: None,
            dist_ma_50: None,
            dist_ma_200: None,
            rsi: None,
            macd: None,
            bb_mid: None,
            bb_upper: None,
            bb_lower: None,
            bb_width: None,
            atr: None,
            adx: None,
            stoch_k: None,
            obv: None,
            vol_spike: None,
            sentiment: None,
            action: None,
            anomaly: None,
            anomaly_score: None,
        }
    }

    /// True if every core OHLC field is a finite number.
    ///
    /// Providers report gap days with NaN quotes; those rows are dropped
    /// before any indicator computation.
    pub fn has_core_fields(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// True if every derived indicator field has been resolved.
    pub fn derived_complete(&self) -> bool {
        self.returns.is_some()
            && self.log_returns.is_some()
            && self.volatility_14.is_some()
            && self.ma_50.is_some()
            && self.ma_200.is_some()
            && self.dist_ma_50.is_some()
            && self.dist_ma_200.is_some()
            && self.rsi.is_some()
            && self.macd.is_some()
            && self.bb_mid.is_some()
            && self.bb_upper.is_some()
            && self.bb_lower.is_some()
            && self.bb_width.is_some()
            && self.atr.is_some()
            && self.adx.is_some()
            && self.stoch_k.is_some()
            && self.obv.is_some()
            && self.vol_spike.is_some()
    }

    /// Look up a derived feature by column name.
    ///
    /// Covers the columns the anomaly detector draws from; returns `None`
    /// both for unresolved values and for unknown names.
    pub fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "returns" => self.returns,
            "log_returns" => self.log_returns,
            "volatility_14" => self.volatility_14,
            "rsi" => self.rsi,
            "macd" => self.macd,
            "vol_spike" => self.vol_spike,
            "atr" => self.atr,
            "adx" => self.adx,
            "stoch_k" => self.stoch_k,
            "dist_ma_50" => self.dist_ma_50,
            "dist_ma_200" => self.dist_ma_200,
            _ => None,
        }
    }

    pub fn is_anomalous(&self) -> bool {
        self.anomaly == Some(AnomalyFlag::Anomalous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::from_raw(RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        })
    }

    #[test]
    fn raw_bar_has_core_fields() {
        assert!(sample_bar().has_core_fields());
    }

    #[test]
    fn nan_quote_fails_core_check() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.has_core_fields());
    }

    #[test]
    fn fresh_bar_is_not_derived_complete() {
        assert!(!sample_bar().derived_complete());
    }

    #[test]
    fn feature_lookup_by_name() {
        let mut bar = sample_bar();
        assert_eq!(bar.feature("rsi"), None);
        bar.rsi = Some(61.5);
        assert_eq!(bar.feature("rsi"), Some(61.5));
        assert_eq!(bar.feature("no_such_column"), None);
    }

    #[test]
    fn serialization_roundtrip_preserves_labels() {
        let mut bar = sample_bar();
        bar.sentiment = Some(Sentiment::Bullish);
        bar.action = Some(Action::Hold);
        bar.anomaly = Some(AnomalyFlag::Anomalous);
        bar.anomaly_score = Some(-0.12);

        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar.date, deser.date);
        assert_eq!(deser.sentiment, Some(Sentiment::Bullish));
        assert_eq!(deser.anomaly, Some(AnomalyFlag::Anomalous));
        assert_eq!(deser.anomaly_score, Some(-0.12));
    }
}
