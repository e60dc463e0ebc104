//! Analysis configuration.
//!
//! Loadable from a TOML file; every field has a default so a missing file or
//! empty table still yields a runnable configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzeConfig {
    /// Expected fraction of anomalous bars, open interval (0, 0.5).
    pub contamination: f64,
    /// Master seed for the anomaly model.
    pub seed: u64,
    /// Extra history fetched before the requested start, in calendar days.
    pub lookback_days: i64,
    /// Narrative language code, passed through opaquely.
    pub language: String,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            contamination: 0.05,
            seed: 42,
            lookback_days: 365,
            language: "en".to_string(),
        }
    }
}

impl AnalyzeConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.contamination > 0.0 && self.contamination < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "contamination must be in (0, 0.5), got {}",
                self.contamination
            )));
        }
        if self.lookback_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be positive, got {}",
                self.lookback_days
            )));
        }
        Ok(())
    }
}
