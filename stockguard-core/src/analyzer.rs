//! Analyzer: the window manager driving the pipeline end to end.
//!
//! Fetches a buffered window (requested start minus the configured lookback)
//! so rolling indicators are warm by the time the requested range begins,
//! runs feature computation and anomaly detection over the buffered series,
//! then filters back to exactly the requested range.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyDetector;
use crate::config::AnalyzeConfig;
use crate::data::provider::MarketDataProvider;
use crate::domain::{Action, Bar, Sentiment};
use crate::error::AnalysisError;
use crate::features::{FeatureEngine, MIN_HISTORY};
use crate::narrative::{NarrativeGenerator, NarrativeInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything the pipeline produced for one request, before narration.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub symbol: String,
    /// Fully derived bars inside the requested range, ascending by date.
    pub series: Vec<Bar>,
    /// The anomalous subset of `series`, same order.
    pub anomalies: Vec<Bar>,
    /// Last bar of `series`.
    pub latest: Bar,
}

impl Analysis {
    pub fn anomalies_count(&self) -> usize {
        self.anomalies.len()
    }
}

/// Wire-shaped response for one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub symbol: String,
    pub series: Vec<Bar>,
    pub anomalies_count: usize,
    pub narrative_text: String,
    pub overall_sentiment: Sentiment,
    pub overall_action: Action,
}

pub struct Analyzer<P: MarketDataProvider> {
    provider: P,
    config: AnalyzeConfig,
    engine: FeatureEngine,
}

impl<P: MarketDataProvider> Analyzer<P> {
    pub fn new(provider: P, config: AnalyzeConfig) -> Self {
        Self {
            provider,
            config,
            engine: FeatureEngine::default(),
        }
    }

    pub fn config(&self) -> &AnalyzeConfig {
        &self.config
    }

    /// Run fetch, feature computation, detection, and range filtering.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<Analysis, AnalysisError> {
        let buffered_start = request.start - Duration::days(self.config.lookback_days);
        let raw = self
            .provider
            .fetch(&request.symbol, buffered_start, request.end)?;
        if raw.is_empty() {
            return Err(AnalysisError::DataNotFound {
                symbol: request.symbol.clone(),
                start: request.start,
                end: request.end,
            });
        }

        let bars: Vec<Bar> = raw.into_iter().map(Bar::from_raw).collect();
        let mut featured = self.engine.compute(bars)?;
        if featured.is_empty() {
            // Enough raw bars to attempt computation, none survived warm-up.
            return Err(AnalysisError::InsufficientHistory {
                have: 0,
                need: MIN_HISTORY,
            });
        }

        let detector = AnomalyDetector::new(self.config.contamination, self.config.seed)?;
        detector.detect(&mut featured)?;

        featured.retain(|b| b.date >= request.start && b.date <= request.end);
        let latest = match featured.last() {
            Some(bar) => bar.clone(),
            None => {
                return Err(AnalysisError::InsufficientRange {
                    symbol: request.symbol.clone(),
                    start: request.start,
                    end: request.end,
                })
            }
        };

        let anomalies: Vec<Bar> = featured.iter().filter(|b| b.is_anomalous()).cloned().collect();

        Ok(Analysis {
            symbol: request.symbol.clone(),
            series: featured,
            anomalies,
            latest,
        })
    }

    /// Run an analysis and assemble the wire response via a narrator.
    pub fn respond(
        &self,
        request: &AnalyzeRequest,
        narrator: &dyn NarrativeGenerator,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let analysis = self.analyze(request)?;
        let narrative = narrator.generate(&NarrativeInput {
            symbol: &analysis.symbol,
            anomalies: &analysis.anomalies,
            latest: &analysis.latest,
            language: &self.config.language,
        });

        Ok(AnalysisResponse {
            symbol: analysis.symbol.clone(),
            anomalies_count: analysis.anomalies_count(),
            series: analysis.series,
            narrative_text: narrative.text,
            overall_sentiment: narrative.sentiment,
            overall_action: narrative.action,
        })
    }
}
