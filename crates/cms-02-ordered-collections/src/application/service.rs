//! Ordered Collection Service
//!
//! Main service implementing OrderedCollectionApi for every payload type.

use crate::config::CollectionConfig;
use crate::domain::entities::{OrderAssignment, OrderIndex, OrderedRecord};
use crate::domain::errors::{CollectionError, StoreError};
use crate::domain::ordering::{changed_count, moved_assignments, next_order_index, plan_reorder};
use crate::domain::payloads::{OrderedPayload, ProductListing};
use crate::ports::inbound::{OrderedCollectionApi, ProductCatalogApi};
use crate::ports::outbound::RecordStore;
use async_trait::async_trait;
use chrono::Utc;
use cms_01_media_storage::{MediaApi, ObjectKey};
use cms_telemetry::log_record_event;
use shared_types::{require_session, RecordId, Session};
use std::sync::Arc;
use tokio::sync::Mutex;

use tracing::{debug, info, warn};

/// Ordered Collection Service
///
/// Every mutation follows the same pipeline:
/// 1. Reject a missing session
/// 2. Normalize and validate input
/// 3. Take the collection's write gate
/// 4. Read current state and compute the new positions
/// 5. Write the result in one atomic store call
pub struct OrderedCollectionService<P: OrderedPayload> {
    config: CollectionConfig,
    store: Arc<dyn RecordStore<P>>,
    media: Arc<dyn MediaApi>,
    write_gate: Mutex<()>,
}

impl<P: OrderedPayload> OrderedCollectionService<P> {
    /// Create a new service with default config
    pub fn new(store: Arc<dyn RecordStore<P>>, media: Arc<dyn MediaApi>) -> Self {
        Self::with_config(CollectionConfig::default(), store, media)
    }

    /// Create a new service with custom config
    pub fn with_config(
        config: CollectionConfig,
        store: Arc<dyn RecordStore<P>>,
        media: Arc<dyn MediaApi>,
    ) -> Self {
        Self {
            config,
            store,
            media,
            write_gate: Mutex::new(()),
        }
    }

    fn authorize(session: Option<&Session>) -> Result<&Session, CollectionError> {
        require_session(session).map_err(|_| {
            warn!(collection = P::KIND.as_str(), "Rejected mutation without session");
            CollectionError::Unauthorized
        })
    }

    fn not_found(id: RecordId) -> CollectionError {
        CollectionError::NotFound {
            collection: P::KIND,
            id,
        }
    }

    fn map_store(id: RecordId, e: StoreError) -> CollectionError {
        match e {
            StoreError::NotFound { .. } => Self::not_found(id),
            other => CollectionError::Store(other),
        }
    }

    fn prepare(payload: P) -> Result<P, CollectionError> {
        let payload = payload.normalized();
        payload.validate()?;
        Ok(payload)
    }

    /// Write only the assignments that move a record, and count them.
    async fn write_order(
        &self,
        current: &[(RecordId, OrderIndex)],
        plan: Vec<OrderAssignment>,
    ) -> Result<usize, CollectionError> {
        let moved = moved_assignments(current, plan);

        if moved.is_empty() {
            return Ok(0);
        }

        self.store.apply_order(&moved).await?;
        cms_telemetry::RECORDS_REINDEXED
            .with_label_values(&[P::KIND.as_str()])
            .inc_by(moved.len() as f64);
        Ok(moved.len())
    }

    /// Replace a payload under the write gate, releasing objects it no
    /// longer references.
    async fn replace_payload(
        &self,
        id: RecordId,
        apply: impl FnOnce(P) -> Result<P, CollectionError> + Send,
    ) -> Result<OrderedRecord<P>, CollectionError> {
        let _gate = self.write_gate.lock().await;

        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        let old_keys = existing.payload.asset_keys();
        let payload = apply(existing.payload)?;

        let updated = self
            .store
            .update_payload(id, &payload, Utc::now())
            .await
            .map_err(|e| Self::map_store(id, e))?;

        let new_keys = updated.payload.asset_keys();
        let released: Vec<ObjectKey> = old_keys
            .into_iter()
            .filter(|k| !new_keys.contains(k))
            .collect();
        if !released.is_empty() {
            self.media.delete_best_effort(&released).await;
        }

        Ok(updated)
    }
}

#[async_trait]
impl<P: OrderedPayload> OrderedCollectionApi<P> for OrderedCollectionService<P> {
    async fn list(&self) -> Result<Vec<OrderedRecord<P>>, CollectionError> {
        let records: Vec<OrderedRecord<P>> = self
            .store
            .list_ordered()
            .await?
            .into_iter()
            .filter(|r| r.payload.is_public())
            .collect();
        debug!(collection = P::KIND.as_str(), count = records.len(), "Listed records");
        Ok(records)
    }

    async fn list_all(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<OrderedRecord<P>>, CollectionError> {
        Self::authorize(session)?;
        Ok(self.store.list_ordered().await?)
    }

    async fn get(&self, id: RecordId) -> Result<OrderedRecord<P>, CollectionError> {
        match self.store.get(id).await? {
            Some(record) if record.payload.is_public() => Ok(record),
            _ => Err(Self::not_found(id)),
        }
    }

    async fn create(
        &self,
        session: Option<&Session>,
        payload: P,
    ) -> Result<OrderedRecord<P>, CollectionError> {
        let session = Self::authorize(session)?;
        let payload = Self::prepare(payload)?;

        let _gate = self.write_gate.lock().await;

        if self.store.count().await? >= self.config.max_collection_size {
            return Err(CollectionError::CollectionFull {
                collection: P::KIND,
                max: self.config.max_collection_size,
            });
        }

        let attempts = self.config.max_append_retries + 1;
        for attempt in 1..=attempts {
            let index = next_order_index(self.store.max_order_index().await?);
            let record = OrderedRecord::new(RecordId::new(), index, payload.clone(), Utc::now());

            match self.store.insert(&record).await {
                Ok(()) => {
                    log_record_event!(
                        info,
                        P::KIND.as_str(),
                        "Record created",
                        record.id,
                        order_index = record.order_index,
                        user_id = %session.actor.user_id
                    );
                    return Ok(record);
                }
                Err(StoreError::OrderIndexTaken { index }) => {
                    cms_telemetry::APPEND_CONFLICTS
                        .with_label_values(&[P::KIND.as_str()])
                        .inc();
                    warn!(
                        collection = P::KIND.as_str(),
                        order_index = index,
                        attempt,
                        "Append lost order_index race, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CollectionError::AppendConflict {
            collection: P::KIND,
            attempts,
        })
    }

    async fn update(
        &self,
        session: Option<&Session>,
        id: RecordId,
        payload: P,
    ) -> Result<OrderedRecord<P>, CollectionError> {
        let session = Self::authorize(session)?;
        let payload = Self::prepare(payload)?;

        let updated = self
            .replace_payload(id, move |existing| Ok(payload.merge_content(&existing)))
            .await?;

        log_record_event!(
            info,
            P::KIND.as_str(),
            "Record updated",
            updated.id,
            user_id = %session.actor.user_id
        );
        Ok(updated)
    }

    async fn delete(&self, session: Option<&Session>, id: RecordId) -> Result<(), CollectionError> {
        let session = Self::authorize(session)?;

        let _gate = self.write_gate.lock().await;

        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        let keys = existing.payload.asset_keys();
        if !keys.is_empty() {
            let report = self.media.delete_best_effort(&keys).await;
            if !report.is_clean() {
                warn!(
                    collection = P::KIND.as_str(),
                    record_id = %id,
                    orphaned = report.orphaned.len(),
                    "Deleting record despite storage cleanup failures"
                );
            }
        }

        let removal = self
            .store
            .delete_and_compact(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        let reindexed = removal.reindexed;
        if reindexed > 0 {
            cms_telemetry::RECORDS_REINDEXED
                .with_label_values(&[P::KIND.as_str()])
                .inc_by(reindexed as f64);
        }

        log_record_event!(
            info,
            P::KIND.as_str(),
            "Record deleted",
            id,
            reindexed,
            user_id = %session.actor.user_id
        );
        Ok(())
    }

    async fn reorder(
        &self,
        session: Option<&Session>,
        ids: Vec<RecordId>,
    ) -> Result<(), CollectionError> {
        let session = Self::authorize(session)?;

        let _gate = self.write_gate.lock().await;

        let current: Vec<(RecordId, OrderIndex)> = self
            .store
            .list_ordered()
            .await?
            .into_iter()
            .map(|r| (r.id, r.order_index))
            .collect();
        let current_ids: Vec<RecordId> = current.iter().map(|(id, _)| *id).collect();

        let plan = plan_reorder(&current_ids, &ids).map_err(|reason| {
            CollectionError::InvalidReorder {
                collection: P::KIND,
                reason,
            }
        })?;
        debug!(
            collection = P::KIND.as_str(),
            changed = changed_count(&current, &plan),
            "Reorder planned"
        );

        let reindexed = self.write_order(&current, plan).await?;

        info!(
            collection = P::KIND.as_str(),
            records = ids.len(),
            reindexed,
            user_id = %session.actor.user_id,
            "Collection reordered"
        );
        Ok(())
    }
}

#[async_trait]
impl ProductCatalogApi for OrderedCollectionService<ProductListing> {
    async fn set_visibility(
        &self,
        session: Option<&Session>,
        id: RecordId,
        hidden: bool,
    ) -> Result<OrderedRecord<ProductListing>, CollectionError> {
        let session = Self::authorize(session)?;

        let updated = self
            .replace_payload(id, move |mut payload| {
                payload.is_hidden = hidden;
                Ok(payload)
            })
            .await?;

        log_record_event!(
            info,
            "product",
            "Product visibility changed",
            updated.id,
            hidden,
            user_id = %session.actor.user_id
        );
        Ok(updated)
    }
}
