//! Error types for ordered collections

use shared_types::{ErrorKind, RecordId, ValidationError};
use thiserror::Error;

use super::entities::{CollectionKind, OrderIndex};

/// All errors surfaced by an ordered collection service.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// No valid staff session
    #[error("Authentication required")]
    Unauthorized,

    /// Record does not exist (or is hidden from the caller)
    #[error("{collection} record {id} not found")]
    NotFound {
        collection: CollectionKind,
        id: RecordId,
    },

    /// Payload failed schema checks
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Reorder list is not a permutation of the collection
    #[error("Invalid reorder for {collection}: {reason}")]
    InvalidReorder {
        collection: CollectionKind,
        reason: ReorderMismatch,
    },

    /// Append would exceed the configured collection size
    #[error("{collection} is full: {max} records")]
    CollectionFull {
        collection: CollectionKind,
        max: usize,
    },

    /// Append kept losing the order_index race
    #[error("Could not allocate an order index for {collection} after {attempts} attempts")]
    AppendConflict {
        collection: CollectionKind,
        attempts: u32,
    },

    /// Store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CollectionError {
    /// Coarse class used by the gateway for status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectionError::Unauthorized => ErrorKind::Unauthorized,
            CollectionError::NotFound { .. } => ErrorKind::NotFound,
            CollectionError::Validation(_)
            | CollectionError::InvalidReorder { .. }
            | CollectionError::CollectionFull { .. } => ErrorKind::BadRequest,
            CollectionError::AppendConflict { .. } | CollectionError::Store(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Why a reorder request is not an exact permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReorderMismatch {
    #[error("id {0} appears more than once")]
    DuplicateId(RecordId),

    #[error("id {0} is not in the collection")]
    UnknownId(RecordId),

    #[error("{count} record(s) missing from the list")]
    MissingIds { count: usize },
}

/// Errors from a record store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Another record already holds this position
    #[error("order_index {index} already taken")]
    OrderIndexTaken { index: OrderIndex },

    /// Record missing at write time
    #[error("record {id} not found")]
    NotFound { id: RecordId },

    /// Payload could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Backend failure
    #[error("backend failure: {0}")]
    Backend(String),
}
