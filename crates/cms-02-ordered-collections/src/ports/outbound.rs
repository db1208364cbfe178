//! Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::{OrderAssignment, OrderIndex, OrderedRecord, Removal};
use crate::domain::errors::StoreError;
use async_trait::async_trait;
use shared_types::{RecordId, Timestamp};

/// Persisted record store for one collection.
///
/// Implementations must reject a second record at an occupied
/// `order_index` with [`StoreError::OrderIndexTaken`], and must apply an
/// [`apply_order`](RecordStore::apply_order) or
/// [`delete_and_compact`](RecordStore::delete_and_compact) call
/// all-or-nothing.
#[async_trait]
pub trait RecordStore<P>: Send + Sync {
    /// All records sorted by `order_index` ascending.
    async fn list_ordered(&self) -> Result<Vec<OrderedRecord<P>>, StoreError>;

    /// One record by id.
    async fn get(&self, id: RecordId) -> Result<Option<OrderedRecord<P>>, StoreError>;

    /// Highest `order_index`, or `None` when empty.
    async fn max_order_index(&self) -> Result<Option<OrderIndex>, StoreError>;

    /// Number of records.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Insert a new record.
    async fn insert(&self, record: &OrderedRecord<P>) -> Result<(), StoreError>;

    /// Replace a record's payload and `updated_at`.
    async fn update_payload(
        &self,
        id: RecordId,
        payload: &P,
        updated_at: Timestamp,
    ) -> Result<OrderedRecord<P>, StoreError>;

    /// Remove a record and renumber the survivors to `0..n-1` in one
    /// atomic write. `None` when the record did not exist.
    async fn delete_and_compact(&self, id: RecordId) -> Result<Option<Removal<P>>, StoreError>;

    /// Set every listed record's `order_index` atomically.
    async fn apply_order(&self, assignments: &[OrderAssignment]) -> Result<(), StoreError>;
}

/// Mock implementations for testing
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Wraps a store and reports `OrderIndexTaken` for the first N inserts,
    /// as if another process won the race each time.
    pub struct ContendedStore<P> {
        pub inner: Arc<dyn RecordStore<P>>,
        pub conflicts_left: AtomicU32,
    }

    impl<P> ContendedStore<P> {
        pub fn new(inner: Arc<dyn RecordStore<P>>, conflicts: u32) -> Self {
            Self {
                inner,
                conflicts_left: AtomicU32::new(conflicts),
            }
        }
    }

    #[async_trait]
    impl<P: Send + Sync + 'static> RecordStore<P> for ContendedStore<P> {
        async fn list_ordered(&self) -> Result<Vec<OrderedRecord<P>>, StoreError> {
            self.inner.list_ordered().await
        }

        async fn get(&self, id: RecordId) -> Result<Option<OrderedRecord<P>>, StoreError> {
            self.inner.get(id).await
        }

        async fn max_order_index(&self) -> Result<Option<OrderIndex>, StoreError> {
            self.inner.max_order_index().await
        }

        async fn count(&self) -> Result<usize, StoreError> {
            self.inner.count().await
        }

        async fn insert(&self, record: &OrderedRecord<P>) -> Result<(), StoreError> {
            let left = self.conflicts_left.load(Ordering::SeqCst);
            if left > 0 {
                self.conflicts_left.store(left - 1, Ordering::SeqCst);
                return Err(StoreError::OrderIndexTaken {
                    index: record.order_index,
                });
            }
            self.inner.insert(record).await
        }

        async fn update_payload(
            &self,
            id: RecordId,
            payload: &P,
            updated_at: Timestamp,
        ) -> Result<OrderedRecord<P>, StoreError> {
            self.inner.update_payload(id, payload, updated_at).await
        }

        async fn delete_and_compact(
            &self,
            id: RecordId,
        ) -> Result<Option<Removal<P>>, StoreError> {
            self.inner.delete_and_compact(id).await
        }

        async fn apply_order(&self, assignments: &[OrderAssignment]) -> Result<(), StoreError> {
            self.inner.apply_order(assignments).await
        }
    }

    /// Store whose every call fails.
    pub struct BrokenStore;

    #[async_trait]
    impl<P: Send + Sync + 'static> RecordStore<P> for BrokenStore {
        async fn list_ordered(&self) -> Result<Vec<OrderedRecord<P>>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn get(&self, _id: RecordId) -> Result<Option<OrderedRecord<P>>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn max_order_index(&self) -> Result<Option<OrderIndex>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn count(&self) -> Result<usize, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn insert(&self, _record: &OrderedRecord<P>) -> Result<(), StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn update_payload(
            &self,
            _id: RecordId,
            _payload: &P,
            _updated_at: Timestamp,
        ) -> Result<OrderedRecord<P>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn delete_and_compact(
            &self,
            _id: RecordId,
        ) -> Result<Option<Removal<P>>, StoreError> {
            Err(StoreError::Backend("offline".into()))
        }

        async fn apply_order(&self, _assignments: &[OrderAssignment]) -> Result<(), StoreError> {
            Err(StoreError::Backend("offline".into()))
        }
    }
}
