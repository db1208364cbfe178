//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → CORS → BodyLimit → Tracing → Timeout → Auth → Handler

pub mod auth;
pub mod cors;
pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use auth::{resolve_session, AuthLayer};
pub use cors::create_cors_layer;
pub use metrics::{GatewayMetrics, RequestTimer};
pub use timeout::TimeoutLayer;
pub use self::tracing::{record_rpc_method, TracingLayer};

use crate::domain::config::GatewayConfig;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Middleware stack builder
pub struct MiddlewareStack {
    pub cors: CorsLayer,
    pub body_limit: DefaultBodyLimit,
    pub tracing: TracingLayer,
    pub timeout: TimeoutLayer,
    pub auth: AuthLayer,
    pub metrics: Arc<GatewayMetrics>,
}

impl MiddlewareStack {
    /// Create middleware stack from gateway config
    pub fn from_config(config: &GatewayConfig, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            cors: create_cors_layer(&config.cors),
            body_limit: DefaultBodyLimit::max(config.limits.max_request_size),
            tracing: TracingLayer::new(),
            timeout: TimeoutLayer::new(&config.timeouts, Arc::clone(&metrics)),
            auth: AuthLayer::new(&config.auth),
            metrics,
        }
    }

    /// Get shared metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }
}
