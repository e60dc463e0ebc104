//! StockGuard Core — daily OHLCV analysis pipeline.
//!
//! This crate contains the heart of the analysis pipeline:
//! - Domain types (bars, sentiment/action labels, anomaly flags)
//! - Technical indicators over daily bar series
//! - Feature engine deriving the full indicator column set
//! - Seeded isolation-forest anomaly detection
//! - Rule-based per-bar signal evaluation
//! - Window-managed analyzer orchestrating fetch, compute, detect, filter
//! - Data provider trait with Yahoo Finance and synthetic implementations
//! - Narrative generation interface with a deterministic template default

pub mod analyzer;
pub mod anomaly;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod indicators;
pub mod narrative;
pub mod report;
pub mod rng;
pub mod signal;

pub use analyzer::{AnalyzeRequest, Analysis, AnalysisResponse, Analyzer};
pub use config::AnalyzeConfig;
pub use error::AnalysisError;
