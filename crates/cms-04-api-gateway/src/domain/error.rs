//! API Gateway error types with JSON-RPC 2.0 error codes.
//!
//! Subsystem errors reach the gateway as an [`ErrorKind`] plus a message;
//! each kind owns one code and one HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cms_01_media_storage::MediaError;
use cms_02_ordered_collections::CollectionError;
use cms_03_news_publishing::PublishingError;
use serde::{Deserialize, Serialize};
use shared_types::ErrorKind;
use std::fmt;
use tracing::error;

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    // JSON-RPC 2.0 standard errors (-32700 to -32600)
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Server errors (-32000 to -32099)
    pub const RESOURCE_NOT_FOUND: i32 = -32001;
    pub const LIMIT_EXCEEDED: i32 = -32005;
    pub const TIMEOUT: i32 = -32006;
    pub const UNAUTHORIZED: i32 = -32010;
}

/// API Gateway error with JSON-RPC code
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// JSON-RPC error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional additional data
    pub data: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create error with additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error - invalid JSON
    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(
            codes::PARSE_ERROR,
            format!("Parse error: {}", details.into()),
        )
    }

    /// Invalid request - not a valid JSON-RPC request
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_REQUEST,
            format!("Invalid request: {}", details.into()),
        )
    }

    /// Method not found
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    /// Invalid parameters
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::new(
            codes::INVALID_PARAMS,
            format!("Invalid params: {}", details.into()),
        )
    }

    /// Internal error. The details stay in the logs.
    pub fn internal() -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal error")
    }

    /// Referenced record does not exist
    pub fn not_found(details: impl Into<String>) -> Self {
        Self::new(codes::RESOURCE_NOT_FOUND, details.into())
    }

    /// Limit exceeded (batch size, etc.)
    pub fn limit_exceeded(limit: impl Into<String>) -> Self {
        Self::new(
            codes::LIMIT_EXCEEDED,
            format!("Limit exceeded: {}", limit.into()),
        )
    }

    /// Request timeout
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            codes::TIMEOUT,
            format!("Request timeout: {}", operation.into()),
        )
    }

    /// Unauthorized - missing or invalid session
    pub fn unauthorized(details: impl Into<String>) -> Self {
        let mut error = Self::new(
            codes::UNAUTHORIZED,
            format!("Unauthorized: {}", details.into()),
        );
        error.data = Some(serde_json::json!({ "kind": ErrorKind::Unauthorized.as_str() }));
        error
    }

    /// Build the error for a subsystem failure of the given kind.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut error = match kind {
            ErrorKind::Unauthorized => Self::new(codes::UNAUTHORIZED, message),
            ErrorKind::NotFound => Self::not_found(message),
            ErrorKind::BadRequest => Self::new(codes::INVALID_PARAMS, message),
            ErrorKind::Internal => Self::internal(),
        };
        error.data = Some(serde_json::json!({ "kind": kind.as_str() }));
        error
    }

    /// Error kind this code belongs to, if it came from a subsystem class.
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            codes::UNAUTHORIZED => ErrorKind::Unauthorized,
            codes::RESOURCE_NOT_FOUND | codes::METHOD_NOT_FOUND => ErrorKind::NotFound,
            codes::INTERNAL_ERROR | codes::TIMEOUT => ErrorKind::Internal,
            _ => ErrorKind::BadRequest,
        }
    }

    /// HTTP status for a single-call response carrying this error.
    pub fn http_status(&self) -> StatusCode {
        match self.code {
            codes::UNAUTHORIZED => StatusCode::UNAUTHORIZED,
            codes::RESOURCE_NOT_FOUND | codes::METHOD_NOT_FOUND => StatusCode::NOT_FOUND,
            codes::TIMEOUT => StatusCode::GATEWAY_TIMEOUT,
            codes::LIMIT_EXCEEDED => StatusCode::PAYLOAD_TOO_LARGE,
            codes::INTERNAL_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Envelope for errors raised before a request id is known.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "error": self,
            "id": null
        });
        (status, Json(body)).into_response()
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let fields = if self.data.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("ApiError", fields)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        if let Some(ref data) = self.data {
            state.serialize_field("data", data)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for ApiError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ErrorHelper {
            code: i32,
            message: String,
            data: Option<serde_json::Value>,
        }

        let helper = ErrorHelper::deserialize(deserializer)?;
        Ok(ApiError {
            code: helper.code,
            message: helper.message,
            data: helper.data,
        })
    }
}

// Conversions from subsystem error types

fn subsystem_error(kind: ErrorKind, message: String) -> ApiError {
    if kind == ErrorKind::Internal {
        error!(error = %message, "Subsystem failure");
    }
    ApiError::from_kind(kind, message)
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_syntax() || e.is_eof() {
            ApiError::parse_error(e.to_string())
        } else {
            ApiError::invalid_params(e.to_string())
        }
    }
}

impl From<CollectionError> for ApiError {
    fn from(e: CollectionError) -> Self {
        subsystem_error(e.kind(), e.to_string())
    }
}

impl From<PublishingError> for ApiError {
    fn from(e: PublishingError) -> Self {
        subsystem_error(e.kind(), e.to_string())
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        subsystem_error(e.kind(), e.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (not JSON-RPC, internal use)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}
