//! # Runtime Configuration
//!
//! Unified configuration for every subsystem plus the gateway.
//!
//! ## Security Requirements
//!
//! - `media.signing_secret` MUST NOT be the default zero value in production
//! - All limits have sane defaults with override capability

use std::net::IpAddr;
use std::path::PathBuf;

use cms_01_media_storage::MediaConfig;
use cms_02_ordered_collections::CollectionConfig;
use cms_03_news_publishing::PublishingConfig;
use cms_04_api_gateway::{GatewayConfig, StaffToken};
use thiserror::Error;
use tracing::info;

/// Length of the media signing secret in bytes.
pub const MEDIA_SECRET_LEN: usize = 32;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// HTTP surface, staff tokens and request limits.
    pub gateway: GatewayConfig,
    /// Upload signing and public URLs.
    pub media: MediaSettings,
    /// Where content is persisted.
    pub storage: StorageConfig,
    /// FAQ, team and product collections.
    pub collections: CollectionConfig,
    /// News articles and tags.
    pub publishing: PublishingConfig,
}

/// Media configuration.
#[derive(Debug, Clone)]
pub struct MediaSettings {
    /// HMAC key for presigned upload URLs.
    pub signing_secret: [u8; MEDIA_SECRET_LEN],
    /// Base URL the browser uploads to.
    pub upload_base_url: String,
    /// Base URL stored objects are served from.
    pub public_base_url: String,
    /// Upload limits.
    pub limits: MediaConfig,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            signing_secret: [0u8; MEDIA_SECRET_LEN],
            upload_base_url: "http://localhost:9000/uploads".to_string(),
            public_base_url: "http://localhost:9000/media".to_string(),
            limits: MediaConfig::default(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// SQLite database file. `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Signing secret is not set (zero value).
    #[error(
        "SECURITY VIOLATION: media signing secret is the default zero value. \
         Set the CMS_MEDIA_SECRET environment variable."
    )]
    InsecureMediaSecret,

    /// An environment variable could not be parsed.
    #[error("invalid {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    /// A subsystem rejected its configuration.
    #[error("invalid {section} configuration: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `CMS_HTTP_HOST`, `CMS_HTTP_PORT`: gateway listen address
    /// - `CMS_STAFF_TOKENS`: `token:user_id:display name` entries separated by `;`
    /// - `CMS_MEDIA_SECRET`: 32-byte signing key, hex encoded
    /// - `CMS_MEDIA_BASE_URL`: upload base URL
    /// - `CMS_PUBLIC_BASE_URL`: public media base URL
    /// - `CMS_DATABASE_PATH`: SQLite file (in-memory stores when unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("CMS_HTTP_HOST") {
            config.gateway.http.host =
                host.parse::<IpAddr>().map_err(|e| ConfigError::InvalidVar {
                    name: "CMS_HTTP_HOST",
                    reason: e.to_string(),
                })?;
        }
        if let Some(port) = lookup("CMS_HTTP_PORT") {
            config.gateway.http.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidVar {
                    name: "CMS_HTTP_PORT",
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(raw) = lookup("CMS_STAFF_TOKENS") {
            config.gateway.auth.staff_tokens =
                StaffToken::parse_list(&raw).map_err(|e| ConfigError::InvalidVar {
                    name: "CMS_STAFF_TOKENS",
                    reason: e.to_string(),
                })?;
            info!(
                count = config.gateway.auth.staff_tokens.len(),
                "Loaded staff tokens from environment"
            );
        }

        if let Some(secret_hex) = lookup("CMS_MEDIA_SECRET") {
            let secret = hex::decode(secret_hex.trim()).map_err(|e| ConfigError::InvalidVar {
                name: "CMS_MEDIA_SECRET",
                reason: e.to_string(),
            })?;
            if secret.len() != MEDIA_SECRET_LEN {
                return Err(ConfigError::InvalidVar {
                    name: "CMS_MEDIA_SECRET",
                    reason: format!(
                        "must be {} bytes ({} hex chars)",
                        MEDIA_SECRET_LEN,
                        MEDIA_SECRET_LEN * 2
                    ),
                });
            }
            config.media.signing_secret.copy_from_slice(&secret);
            info!("Loaded media signing secret from environment");
        }

        if let Some(url) = lookup("CMS_MEDIA_BASE_URL") {
            config.media.upload_base_url = url;
        }
        if let Some(url) = lookup("CMS_PUBLIC_BASE_URL") {
            config.media.public_base_url = url;
        }

        config.storage.database_path = lookup("CMS_DATABASE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Validate every subsystem section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate().map_err(|e| ConfigError::Invalid {
            section: "gateway",
            reason: e.to_string(),
        })?;
        self.media
            .limits
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "media",
                reason: e.to_string(),
            })?;
        self.collections
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "collections",
                reason: e.to_string(),
            })?;
        self.publishing
            .validate()
            .map_err(|e| ConfigError::Invalid {
                section: "publishing",
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if the media signing secret is the default zero value.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.media.signing_secret == [0u8; MEDIA_SECRET_LEN] {
            return Err(ConfigError::InsecureMediaSecret);
        }
        Ok(())
    }
}
