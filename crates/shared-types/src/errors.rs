//! # Error Types
//!
//! The error taxonomy every subsystem maps its own errors onto, plus the
//! field-level validation error used by payload schemas.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse error classes surfaced to callers.
///
/// Each subsystem error exposes `kind()` so the gateway can pick a status
/// code without knowing every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller has no valid session.
    Unauthorized,
    /// Referenced record does not exist.
    NotFound,
    /// Input failed schema, permutation or transition checks.
    BadRequest,
    /// Store or storage layer failed unexpectedly.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed schema constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `question.ar`).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
