//! In-memory record store.
//!
//! Every method takes the lock once, so `apply_order` and
//! `delete_and_compact` each finish inside one write section.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{RecordId, Timestamp};
use std::collections::{HashMap, HashSet};

use crate::domain::entities::{OrderAssignment, OrderIndex, OrderedRecord, Removal};
use crate::domain::errors::StoreError;
use crate::domain::ordering::{moved_assignments, plan_compaction};
use crate::ports::outbound::RecordStore;

/// In-memory implementation of [`RecordStore`].
pub struct InMemoryRecordStore<P> {
    records: RwLock<HashMap<RecordId, OrderedRecord<P>>>,
}

impl<P> InMemoryRecordStore<P> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<P> Default for InMemoryRecordStore<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P> RecordStore<P> for InMemoryRecordStore<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn list_ordered(&self) -> Result<Vec<OrderedRecord<P>>, StoreError> {
        let mut records: Vec<OrderedRecord<P>> = self.records.read().values().cloned().collect();
        records.sort_by_key(|r| r.order_index);
        Ok(records)
    }

    async fn get(&self, id: RecordId) -> Result<Option<OrderedRecord<P>>, StoreError> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn max_order_index(&self) -> Result<Option<OrderIndex>, StoreError> {
        Ok(self.records.read().values().map(|r| r.order_index).max())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().len())
    }

    async fn insert(&self, record: &OrderedRecord<P>) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records
            .values()
            .any(|r| r.order_index == record.order_index)
        {
            return Err(StoreError::OrderIndexTaken {
                index: record.order_index,
            });
        }
        if records.contains_key(&record.id) {
            return Err(StoreError::Backend(format!(
                "duplicate record id {}",
                record.id
            )));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update_payload(
        &self,
        id: RecordId,
        payload: &P,
        updated_at: Timestamp,
    ) -> Result<OrderedRecord<P>, StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        record.payload = payload.clone();
        record.updated_at = updated_at;
        Ok(record.clone())
    }

    async fn delete_and_compact(&self, id: RecordId) -> Result<Option<Removal<P>>, StoreError> {
        let mut records = self.records.write();
        let Some(record) = records.remove(&id) else {
            return Ok(None);
        };

        let survivors: Vec<(RecordId, OrderIndex)> =
            records.values().map(|r| (r.id, r.order_index)).collect();
        let moved = moved_assignments(&survivors, plan_compaction(&survivors));
        for a in &moved {
            if let Some(survivor) = records.get_mut(&a.id) {
                survivor.order_index = a.order_index;
            }
        }

        Ok(Some(Removal {
            record,
            reindexed: moved.len(),
        }))
    }

    async fn apply_order(&self, assignments: &[OrderAssignment]) -> Result<(), StoreError> {
        let mut records = self.records.write();

        // Validate the whole batch before touching anything.
        for a in assignments {
            if !records.contains_key(&a.id) {
                return Err(StoreError::NotFound { id: a.id });
            }
        }
        let assigned: HashSet<RecordId> = assignments.iter().map(|a| a.id).collect();
        let mut taken: HashSet<OrderIndex> = records
            .values()
            .filter(|r| !assigned.contains(&r.id))
            .map(|r| r.order_index)
            .collect();
        for a in assignments {
            if !taken.insert(a.order_index) {
                return Err(StoreError::OrderIndexTaken {
                    index: a.order_index,
                });
            }
        }

        for a in assignments {
            if let Some(record) = records.get_mut(&a.id) {
                record.order_index = a.order_index;
            }
        }
        Ok(())
    }
}
