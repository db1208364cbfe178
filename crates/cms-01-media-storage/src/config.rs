//! Configuration for media uploads

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Media configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Largest accepted image upload in bytes
    pub max_image_bytes: u64,
    /// Largest accepted video upload in bytes (reels only)
    pub max_video_bytes: u64,
    /// Lifetime of a presigned upload URL
    #[serde(with = "humantime_serde")]
    pub upload_ttl: Duration,
    /// Longest accepted client file name in characters
    pub max_file_name_len: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * 1024 * 1024,
            max_video_bytes: 200 * 1024 * 1024,
            upload_ttl: Duration::from_secs(15 * 60),
            max_file_name_len: 255,
        }
    }
}

impl MediaConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_image_bytes == 0 {
            return Err(ConfigError::InvalidLimit("max_image_bytes must be > 0".into()));
        }
        if self.max_video_bytes < self.max_image_bytes {
            return Err(ConfigError::InvalidLimit(
                "max_video_bytes must be >= max_image_bytes".into(),
            ));
        }
        if self.upload_ttl.is_zero() {
            return Err(ConfigError::InvalidTimeout("upload_ttl must be > 0".into()));
        }
        if self.upload_ttl > Duration::from_secs(7 * 24 * 3600) {
            return Err(ConfigError::InvalidTimeout(
                "upload_ttl must not exceed 7 days".into(),
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
    /// Invalid URL lifetime
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}
