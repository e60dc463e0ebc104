//! Feature engine: derives the full indicator set from raw OHLCV bars.
//!
//! Indicators run in dependency order over the whole series, each with its
//! own warm-up prefix. After all columns are computed, every bar with any
//! unresolved value is dropped — the 200-day moving average dominates, so
//! the surviving series starts roughly 200 trading days into the input.
//! Non-finite results (e.g. a distance against a zero moving average)
//! propagate as unresolved values and are removed by the same drop.

use crate::domain::Bar;
use crate::error::AnalysisError;
use crate::indicators::{
    bollinger_bands, rolling_mean, rolling_std, Adx, Atr, Indicator, MacdHistogram, Obv, Rsi, Sma,
    StochasticK,
};
use crate::signal;

/// Minimum usable raw bars before indicator computation is attempted.
pub const MIN_HISTORY: usize = 50;

/// Indicator window configuration. `Default` matches the production setup;
/// tests shrink windows to keep fixtures small.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    pub volatility_period: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_multiplier: f64,
    pub atr_period: usize,
    pub adx_period: usize,
    pub stoch_period: usize,
    pub stoch_smoothing: usize,
    pub vol_ma_period: usize,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self {
            volatility_period: 14,
            ma_short: 50,
            ma_long: 200,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_multiplier: 2.0,
            atr_period: 14,
            adx_period: 14,
            stoch_period: 14,
            stoch_smoothing: 3,
            vol_ma_period: 20,
        }
    }
}

impl FeatureEngine {
    /// Compute all derived fields and attach per-bar signals.
    ///
    /// Re-sorts defensively, drops rows with missing core OHLC fields, and
    /// fails with `InsufficientHistory` when fewer than [`MIN_HISTORY`]
    /// usable bars remain. An empty result after the warm-up drop is NOT an
    /// error here; the caller decides whether that is fatal.
    pub fn compute(&self, mut bars: Vec<Bar>) -> Result<Vec<Bar>, AnalysisError> {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        bars.retain(Bar::has_core_fields);

        if bars.len() < MIN_HISTORY {
            return Err(AnalysisError::InsufficientHistory {
                have: bars.len(),
                need: MIN_HISTORY,
            });
        }

        let n = bars.len();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        // Simple and log returns off the close series.
        let mut returns = vec![f64::NAN; n];
        let mut log_returns = vec![f64::NAN; n];
        for i in 1..n {
            returns[i] = closes[i] / closes[i - 1] - 1.0;
            log_returns[i] = (closes[i] / closes[i - 1]).ln();
        }

        // Rolling sample stddev of log returns.
        let volatility = rolling_std(&log_returns, self.volatility_period, 1);

        let ma_short = Sma::new(self.ma_short).compute(&bars);
        let ma_long = Sma::new(self.ma_long).compute(&bars);
        let rsi = Rsi::new(self.rsi_period).compute(&bars);
        let macd =
            MacdHistogram::new(self.macd_fast, self.macd_slow, self.macd_signal).compute(&bars);
        let bands = bollinger_bands(&bars, self.bb_period, self.bb_multiplier);
        let atr = Atr::new(self.atr_period).compute(&bars);
        let adx = Adx::new(self.adx_period).compute(&bars);
        let stoch = StochasticK::new(self.stoch_period, self.stoch_smoothing).compute(&bars);
        let obv = Obv::new().compute(&bars);

        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let vol_ma = rolling_mean(&volumes, self.vol_ma_period);

        for (i, bar) in bars.iter_mut().enumerate() {
            bar.returns = finite(returns[i]);
            bar.log_returns = finite(log_returns[i]);
            bar.volatility_14 = finite(volatility[i]);
            bar.ma_50 = finite(ma_short[i]);
            bar.ma_200 = finite(ma_long[i]);
            bar.dist_ma_50 = finite((bar.close - ma_short[i]) / ma_short[i]);
            bar.dist_ma_200 = finite((bar.close - ma_long[i]) / ma_long[i]);
            bar.rsi = finite(rsi[i]);
            bar.macd = finite(macd[i]);
            bar.bb_mid = finite(bands.middle[i]);
            bar.bb_upper = finite(bands.upper[i]);
            bar.bb_lower = finite(bands.lower[i]);
            bar.bb_width = finite(bands.width[i]);
            bar.atr = finite(atr[i]);
            bar.adx = finite(adx[i]);
            bar.stoch_k = finite(stoch[i]);
            bar.obv = finite(obv[i]);
            bar.vol_spike = finite(volumes[i] / vol_ma[i]);
        }

        // Warm-up drop: a bar survives only with every column resolved.
        bars.retain(Bar::derived_complete);

        for bar in &mut bars {
            let (sentiment, action) = signal::evaluate(bar);
            bar.sentiment = Some(sentiment);
            bar.action = Some(action);
        }

        Ok(bars)
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
