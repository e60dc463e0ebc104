//! Pipeline error types.
//!
//! Every stage returns a tagged `Result` so failure handling is total and
//! inspectable across layer boundaries. Validation-class errors
//! (`DataNotFound`, `InsufficientHistory`, `InsufficientRange`) carry enough
//! context for the caller to adjust its request; computation-class errors
//! (`FeatureComputation`, `ModelFitting`) carry cause detail and indicate a
//! server-side failure.

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::provider::DataError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no market data for {symbol} between {start} and {end}")]
    DataNotFound {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("insufficient history: {have} usable bars, need at least {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("no processed bars for {symbol} inside the requested window {start} to {end}")]
    InsufficientRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("feature computation failed: {0}")]
    FeatureComputation(String),

    #[error("anomaly model fitting failed: {0}")]
    ModelFitting(String),

    #[error("contamination must be in the open interval (0, 0.5), got {value}")]
    InvalidContamination { value: f64 },

    #[error("data provider error: {0}")]
    Provider(#[from] DataError),
}
