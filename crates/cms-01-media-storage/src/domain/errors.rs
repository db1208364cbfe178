//! Error types for media storage

use shared_types::{ErrorKind, ValidationError};
use thiserror::Error;

/// Errors surfaced by the media service.
#[derive(Debug, Error)]
pub enum MediaError {
    /// No valid staff session
    #[error("Authentication required")]
    Unauthorized,

    /// Object key failed path checks
    #[error("Invalid object key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Content type not accepted for the target folder
    #[error("Content type {content_type} is not accepted in folder {folder}")]
    UnsupportedContentType {
        folder: &'static str,
        content_type: String,
    },

    /// Declared upload size over the configured limit
    #[error("File too large: {size} bytes > {max} bytes")]
    TooLarge { size: u64, max: u64 },

    /// Request field failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Object storage backend failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl MediaError {
    /// Coarse class used by the gateway for status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::Unauthorized => ErrorKind::Unauthorized,
            MediaError::InvalidKey { .. }
            | MediaError::UnsupportedContentType { .. }
            | MediaError::TooLarge { .. }
            | MediaError::Validation(_) => ErrorKind::BadRequest,
            MediaError::Storage(_) => ErrorKind::Internal,
        }
    }
}

/// Errors from an object storage backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Rejection reasons when checking a presigned URL.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Signature expired")]
    Expired,

    #[error("Signature malformed")]
    Malformed,

    #[error("Signature mismatch")]
    Mismatch,
}
