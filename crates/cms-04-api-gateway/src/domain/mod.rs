//! Domain types for the API Gateway.
//!
//! Configuration, the method table and the error model. Nothing here knows
//! about axum routing or the subsystem services.

pub mod config;
pub mod error;
pub mod methods;

// Re-exports for convenience
pub use config::{
    AuthConfig, ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, StaffToken,
    TimeoutConfig,
};
pub use error::{ApiError, ApiResult, GatewayError};
pub use methods::{
    get_method_info, get_method_tier, is_method_supported, MethodCategory, MethodInfo, MethodTier,
};
