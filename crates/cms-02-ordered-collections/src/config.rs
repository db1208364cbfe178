//! Configuration for ordered collections

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Collection configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Extra append attempts after an order_index conflict
    pub max_append_retries: u32,
    /// Largest number of records one collection may hold
    pub max_collection_size: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            max_append_retries: 3,
            max_collection_size: 1_000,
        }
    }
}

impl CollectionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_collection_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_collection_size must be > 0".into(),
            ));
        }
        if self.max_collection_size > u32::MAX as usize {
            return Err(ConfigError::InvalidLimit(
                "max_collection_size must fit in an order index".into(),
            ));
        }
        if self.max_append_retries > 100 {
            return Err(ConfigError::InvalidRetries(
                "max_append_retries must be <= 100".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid retry budget
    #[error("invalid retries: {0}")]
    InvalidRetries(String),
}
