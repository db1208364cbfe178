//! CMS-04 API Gateway - JSON-RPC surface for the public site and the staff
//! dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       API GATEWAY (cms-04)                       │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   POST /rpc          GET /health          GET /metrics           │
//! │        │                                                         │
//! │  ┌─────┴──────────────────────────────────────────┐              │
//! │  │                Middleware Stack                │              │
//! │  │  CORS → BodyLimit → Tracing → Timeout → Auth   │              │
//! │  └─────┬──────────────────────────────────────────┘              │
//! │        │                                                         │
//! │  ┌─────┴──────────────────────────────────────────┐              │
//! │  │   Method table (tier check) → RpcHandlers      │              │
//! │  └─────┬──────────────────────────────────────────┘              │
//! └────────┼─────────────────────────────────────────────────────────┘
//!          │
//!     ┌────┴──────────────┬─────────────────────┬──────────────┐
//!     ▼                   ▼                     ▼              ▼
//! cms-02 faq/team    cms-02 products     cms-03 news    cms-01 media
//! ```
//!
//! # Method Tiers
//!
//! - **Public**: no session (`*.list`, `*.get`, `news.getBySlug`)
//! - **Staff**: `Authorization: Bearer <token>` matching a configured staff
//!   token (every mutation, `*.listAll`, `news.get`, `news.listTags`,
//!   `media.requestUpload`)
//!
//! # Usage
//!
//! ```ignore
//! use cms_04_api_gateway::{ApiGatewayService, GatewayConfig, RpcHandlers};
//!
//! let mut service = ApiGatewayService::new(GatewayConfig::default(), handlers)?;
//! let addr = service.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod rpc;
pub mod service;

// Re-exports for public API
pub use domain::config::{ConfigError, GatewayConfig, StaffToken};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use domain::methods::{get_method_info, is_method_supported, MethodInfo, MethodTier};
pub use middleware::GatewayMetrics;
pub use rpc::RpcHandlers;
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_method_support() {
        assert!(is_method_supported("faq.reorder"));
        assert!(is_method_supported("news.setStatus"));
        assert!(is_method_supported("media.requestUpload"));
        assert!(!is_method_supported("eth_getBalance"));
    }
}
