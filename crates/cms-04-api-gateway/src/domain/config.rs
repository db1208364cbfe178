//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use shared_types::Actor;
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Shortest staff token accepted.
pub const MIN_TOKEN_LEN: usize = 16;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Staff token configuration
    pub auth: AuthConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.limits.max_batch_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_batch_size cannot be 0".into(),
            ));
        }

        if self.timeouts.request.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        self.auth.validate()
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// One long-lived staff token and the account it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffToken {
    pub token: String,
    pub user_id: String,
    pub display_name: String,
}

impl StaffToken {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.display_name.clone())
    }

    /// Parse `token:user_id:display name` entries separated by `;`.
    ///
    /// Empty entries are skipped; the display name may contain `:`.
    pub fn parse_list(raw: &str) -> Result<Vec<StaffToken>, ConfigError> {
        raw.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let mut parts = entry.splitn(3, ':');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(token), Some(user_id), Some(display_name))
                        if !token.is_empty() && !user_id.trim().is_empty() =>
                    {
                        Ok(StaffToken {
                            token: token.to_string(),
                            user_id: user_id.trim().to_string(),
                            display_name: display_name.trim().to_string(),
                        })
                    }
                    _ => Err(ConfigError::InvalidToken(
                        "expected token:user_id:display name".into(),
                    )),
                }
            })
            .collect()
    }
}

/// Staff authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Tokens accepted in `Authorization: Bearer <token>`.
    pub staff_tokens: Vec<StaffToken>,
}

impl AuthConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.staff_tokens {
            if entry.token.len() < MIN_TOKEN_LEN {
                return Err(ConfigError::InvalidToken(format!(
                    "token for {} is shorter than {} characters",
                    entry.user_id, MIN_TOKEN_LEN
                )));
            }
            if !seen.insert(entry.token.as_str()) {
                return Err(ConfigError::InvalidToken(format!(
                    "token for {} is configured twice",
                    entry.user_id
                )));
            }
        }
        Ok(())
    }
}

/// Request validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes
    pub max_request_size: usize,
    /// Maximum calls in one batch
    pub max_batch_size: usize,
    /// Maximum length of a string request id
    pub max_id_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 1024 * 1024,
            max_batch_size: 20,
            max_id_length: 256,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout
    #[serde(with = "humantime_serde")]
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins (`*` for any)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache (seconds)
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["content-type".to_string(), "authorization".to_string()],
            max_age: 3600,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid limit value
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Malformed or weak staff token
    #[error("invalid staff token: {0}")]
    InvalidToken(String),
}
