//! Feature engineering over a daily bar series.

pub mod engine;

pub use engine::{FeatureEngine, MIN_HISTORY};
