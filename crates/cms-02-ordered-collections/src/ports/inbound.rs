//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::OrderedRecord;
use crate::domain::errors::CollectionError;
use crate::domain::payloads::{OrderedPayload, ProductListing};
use async_trait::async_trait;
use shared_types::{RecordId, Session};

/// Ordered collection API
///
/// Reads are public; every mutation takes the caller's session and rejects
/// a missing one before the store is touched.
#[async_trait]
pub trait OrderedCollectionApi<P: OrderedPayload>: Send + Sync {
    /// Records visible to anonymous visitors, by `order_index` ascending.
    async fn list(&self) -> Result<Vec<OrderedRecord<P>>, CollectionError>;

    /// Every record, including hidden ones. Staff only.
    async fn list_all(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<OrderedRecord<P>>, CollectionError>;

    /// One publicly visible record.
    async fn get(&self, id: RecordId) -> Result<OrderedRecord<P>, CollectionError>;

    /// Validate and append at the end of the collection.
    async fn create(
        &self,
        session: Option<&Session>,
        payload: P,
    ) -> Result<OrderedRecord<P>, CollectionError>;

    /// Replace the payload; the position is untouched.
    async fn update(
        &self,
        session: Option<&Session>,
        id: RecordId,
        payload: P,
    ) -> Result<OrderedRecord<P>, CollectionError>;

    /// Remove the record and close the gap it leaves.
    async fn delete(&self, session: Option<&Session>, id: RecordId) -> Result<(), CollectionError>;

    /// Apply a full permutation of the collection's ids.
    async fn reorder(
        &self,
        session: Option<&Session>,
        ids: Vec<RecordId>,
    ) -> Result<(), CollectionError>;
}

/// Product catalogue additions on top of the ordered collection API.
#[async_trait]
pub trait ProductCatalogApi: OrderedCollectionApi<ProductListing> {
    /// Hide or show a product on the public site.
    async fn set_visibility(
        &self,
        session: Option<&Session>,
        id: RecordId,
        hidden: bool,
    ) -> Result<OrderedRecord<ProductListing>, CollectionError>;
}
