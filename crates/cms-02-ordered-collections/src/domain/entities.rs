//! Core entities for ordered collections

use serde::{Deserialize, Serialize};
use shared_types::{RecordId, Timestamp};
use std::fmt;

/// Display position within a collection, contiguous from zero.
pub type OrderIndex = u32;

/// The collections managed by the ordering logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Faq,
    Team,
    Product,
}

impl CollectionKind {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Faq => "faq",
            CollectionKind::Team => "team",
            CollectionKind::Product => "product",
        }
    }

    /// Backing table name in persistent stores.
    pub fn table_name(&self) -> &'static str {
        match self {
            CollectionKind::Faq => "faqs",
            CollectionKind::Team => "team_members",
            CollectionKind::Product => "products",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted record with its display position.
///
/// Payload fields are flattened into the record when serialized, so a FAQ
/// renders as `{"id", "orderIndex", "question", "answer", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedRecord<P> {
    pub id: RecordId,
    pub order_index: OrderIndex,
    #[serde(flatten)]
    pub payload: P,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<P> OrderedRecord<P> {
    pub fn new(id: RecordId, order_index: OrderIndex, payload: P, now: Timestamp) -> Self {
        Self {
            id,
            order_index,
            payload,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A deleted record and the number of survivors renumbered to close its gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal<P> {
    pub record: OrderedRecord<P>,
    pub reindexed: usize,
}

/// Target position for one record in a renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAssignment {
    pub id: RecordId,
    pub order_index: OrderIndex,
}

impl OrderAssignment {
    pub fn new(id: RecordId, order_index: OrderIndex) -> Self {
        Self { id, order_index }
    }
}
