//! Domain types: bars, sentiment/action labels, anomaly flags.

pub mod bar;
pub mod labels;

pub use bar::Bar;
pub use labels::{Action, AnomalyFlag, Sentiment};
