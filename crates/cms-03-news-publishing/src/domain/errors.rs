//! Error types for news publishing

use shared_types::{ErrorKind, RecordId, ValidationError};
use thiserror::Error;

use super::status::TransitionError;

/// All errors surfaced by the news service.
#[derive(Debug, Error)]
pub enum PublishingError {
    /// No valid staff session
    #[error("Authentication required")]
    Unauthorized,

    /// Article missing, or not published for a public read
    #[error("Article {0} not found")]
    ArticleNotFound(String),

    /// Input failed schema checks
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Status change not allowed from the current state
    #[error("Invalid status change: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Store failure
    #[error("Store error: {0}")]
    Store(#[from] NewsStoreError),
}

impl PublishingError {
    pub fn not_found(id: RecordId) -> Self {
        PublishingError::ArticleNotFound(id.to_string())
    }

    /// Coarse class used by the gateway for status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishingError::Unauthorized => ErrorKind::Unauthorized,
            PublishingError::ArticleNotFound(_) => ErrorKind::NotFound,
            PublishingError::Validation(_) | PublishingError::InvalidTransition(_) => {
                ErrorKind::BadRequest
            }
            PublishingError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Errors from article and tag store adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NewsStoreError {
    /// Unique constraint on slug violated
    #[error("slug {0} already taken")]
    SlugTaken(String),

    #[error("record {id} not found")]
    NotFound { id: RecordId },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("backend failure: {0}")]
    Backend(String),
}
