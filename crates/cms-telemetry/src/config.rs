//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `info,cms_04_api_gateway=debug`
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to include ANSI colours in pretty output
    pub ansi: bool,

    /// Deployment environment (production, staging, dev)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "charcoal-cms".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
            environment: "dev".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CMS_SERVICE_NAME`: Service name (default: charcoal-cms)
    /// - `CMS_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `CMS_JSON_LOGS`: Enable JSON logs (default: true in containers)
    /// - `CMS_ENVIRONMENT`: Environment name (default: dev)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        let json_logs = env::var("CMS_JSON_LOGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(is_container);

        Self {
            service_name: env::var("CMS_SERVICE_NAME")
                .unwrap_or_else(|_| "charcoal-cms".to_string()),

            log_level: env::var("CMS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs,

            ansi: !json_logs,

            environment: env::var("CMS_ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
        }
    }
}
