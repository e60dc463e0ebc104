//! Rule-based per-bar sentiment and action classification.
//!
//! A pure function of the current bar — no hysteresis, no memory of prior
//! bars. Each optional input has an explicit documented default:
//!
//! - `rsi` absent -> 50 (neither overbought nor oversold)
//! - `macd` absent -> 0 (no momentum signal)
//! - `ma_50` absent -> `close` (price sits on its own trend, a neutral read)

use crate::domain::{Action, Bar, Sentiment};

/// RSI below this threshold suggests an oversold market.
pub const RSI_OVERSOLD: f64 = 30.0;
/// RSI above this threshold suggests an overbought market.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Classify one bar into `(sentiment, action)`.
///
/// Sentiment score: ±1 for close vs MA-50, ±1 for the MACD histogram sign
/// (zero counts as non-positive), ±0.5 for RSI vs 50 (exactly 50 contributes
/// nothing). Bullish above +1, bearish below -1, neutral in between.
///
/// Action depends on RSI alone: < 30 buy, > 70 sell, hold otherwise.
pub fn evaluate(bar: &Bar) -> (Sentiment, Action) {
    let rsi = bar.rsi.unwrap_or(50.0);
    let macd = bar.macd.unwrap_or(0.0);
    let ma_50 = bar.ma_50.unwrap_or(bar.close);

    let mut score = 0.0;
    score += if bar.close > ma_50 { 1.0 } else { -1.0 };
    score += if macd > 0.0 { 1.0 } else { -1.0 };
    if rsi > 50.0 {
        score += 0.5;
    } else if rsi < 50.0 {
        score -= 0.5;
    }

    let sentiment = if score > 1.0 {
        Sentiment::Bullish
    } else if score < -1.0 {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    };

    let action = if rsi < RSI_OVERSOLD {
        Action::Buy
    } else if rsi > RSI_OVERBOUGHT {
        Action::Sell
    } else {
        Action::Hold
    };

    (sentiment, action)
}
