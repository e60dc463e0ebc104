//! Unsupervised anomaly detection over derived feature columns.

pub mod detector;
pub mod isolation_forest;

pub use detector::{AnomalyDetector, ANOMALY_FEATURES, MIN_DETECT_SAMPLES};
pub use isolation_forest::IsolationForest;
