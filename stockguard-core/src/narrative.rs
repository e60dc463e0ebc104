//! Narrative generation interface.
//!
//! The analyzer hands a narrator the anomaly subset, the latest bar, and an
//! opaque language code; the narrator returns free text plus an overall
//! sentiment/action pair. The core ships a deterministic template
//! implementation; richer generators plug in behind the same trait.

use crate::domain::{Action, Bar, Sentiment};

/// Everything a narrator may draw on. The language code is passed through
/// opaquely; the core never interprets it.
pub struct NarrativeInput<'a> {
    pub symbol: &'a str,
    pub anomalies: &'a [Bar],
    pub latest: &'a Bar,
    pub language: &'a str,
}

#[derive(Debug, Clone)]
pub struct Narrative {
    pub text: String,
    pub sentiment: Sentiment,
    pub action: Action,
}

pub trait NarrativeGenerator: Send + Sync {
    fn generate(&self, input: &NarrativeInput<'_>) -> Narrative;
}

/// Deterministic template narrator. Echoes the latest bar's signal as the
/// overall stance and summarizes the anomaly subset in one paragraph.
#[derive(Debug, Default, Clone)]
pub struct TemplateNarrator;

impl NarrativeGenerator for TemplateNarrator {
    fn generate(&self, input: &NarrativeInput<'_>) -> Narrative {
        let sentiment = input.latest.sentiment.unwrap_or(Sentiment::Neutral);
        let action = input.latest.action.unwrap_or(Action::Hold);

        let stance = match sentiment {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        };
        let advice = match action {
            Action::Buy => "buy",
            Action::Sell => "sell",
            Action::Hold => "hold",
        };

        let anomaly_part = match input.anomalies.len() {
            0 => "No anomalous sessions were flagged in the requested window.".to_string(),
            1 => format!(
                "1 anomalous session was flagged, on {}.",
                input.anomalies[0].date
            ),
            n => format!(
                "{n} anomalous sessions were flagged, the most recent on {}.",
                input.anomalies[n - 1].date
            ),
        };

        let text = format!(
            "{symbol} closed at {close:.2} on {date}. The indicator profile reads {stance}; \
             the suggested action is {advice}. {anomaly_part}",
            symbol = input.symbol,
            close = input.latest.close,
            date = input.latest.date,
        );

        Narrative {
            text,
            sentiment,
            action,
        }
    }
}
