//! Analysis settings, loadable from TOML.
//!
//! ```toml
//! search_depth = 20
//! predictor_ratings = [1100, 1500, 1900]
//! channel_capacity = 128
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Depth at which a search result counts as satisfied
    pub search_depth: u32,
    /// Rating tiers the move predictor is queried for
    pub predictor_ratings: Vec<u16>,
    /// Capacity of the evaluator -> session result channel
    pub channel_capacity: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            search_depth: 18,
            predictor_ratings: (1100..=1900).step_by(100).collect(),
            channel_capacity: 64,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be positive"));
        }
        if self.predictor_ratings.is_empty() {
            return Err(ConfigError::Invalid("predictor_ratings must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
