//! # CMS Telemetry
//!
//! Logging and metrics for the CMS services.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry with an `EnvFilter` and either a
//!   pretty or JSON formatter
//! - **Metrics**: Prometheus counters and histograms, exported by the gateway
//!   at `GET /metrics`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cms_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CMS_SERVICE_NAME` | `charcoal-cms` | Service name in log lines |
//! | `CMS_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CMS_JSON_LOGS` | `false` (`true` in containers) | JSON log output |
//! | `CMS_ENVIRONMENT` | `dev` | Deployment environment |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, APPEND_CONFLICTS, ARTICLE_STATUS_CHANGES,
    ORPHANED_OBJECTS,
    RECORDS_REINDEXED, RPC_REQUESTS, RPC_REQUEST_DURATION, UPLOADS_PRESIGNED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging and register metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;
    Ok(())
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
