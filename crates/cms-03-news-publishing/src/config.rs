//! Configuration for news publishing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Publishing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Most tags one article may carry
    pub max_tags_per_article: usize,
    /// Longest generated slug in bytes (before any `-N` suffix)
    pub max_slug_len: usize,
    /// Suffixed slug candidates tried before falling back to an id-based slug
    pub max_slug_attempts: u32,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            max_tags_per_article: 10,
            max_slug_len: 80,
            max_slug_attempts: 100,
        }
    }
}

impl PublishingConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slug_len < 8 {
            return Err(ConfigError::InvalidSlug("max_slug_len must be >= 8".into()));
        }
        if self.max_slug_attempts == 0 {
            return Err(ConfigError::InvalidSlug(
                "max_slug_attempts must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Slug generation limits out of range
    #[error("invalid slug settings: {0}")]
    InvalidSlug(String),
}
