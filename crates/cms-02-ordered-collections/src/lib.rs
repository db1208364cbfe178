//! # CMS-02: Ordered Collections Subsystem
//!
//! FAQs, team members and products share one pattern: records carry an
//! `order_index` that is contiguous from zero and defines display order.
//!
//! ## Architecture
//!
//! - **Domain**: `OrderedRecord<P>`, payloads, ordering arithmetic, invariants
//! - **Ports**: Inbound (`OrderedCollectionApi`, `ProductCatalogApi`) and Outbound (`RecordStore`)
//! - **Adapters**: in-memory store, SQLite store
//! - **Application**: `OrderedCollectionService<P>`
//!
//! ## Ordering Rules
//!
//! | Operation | Effect on order_index |
//! |-----------|-----------------------|
//! | create | `max + 1`, or 0 when empty |
//! | update | untouched |
//! | reorder | position in the submitted permutation |
//! | delete | survivors renumbered `0..N-1`, relative order kept |
//!
//! Mutations of one collection are serialised by an async write gate and
//! every renumbering is written with a single atomic `apply_order` or
//! `delete_and_compact` call.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryRecordStore, SqliteDatabase, SqliteRecordStore};
pub use application::service::OrderedCollectionService;
pub use config::{CollectionConfig, ConfigError as CollectionConfigError};
pub use domain::entities::*;
pub use domain::errors::{CollectionError, ReorderMismatch, StoreError};
pub use domain::payloads::*;
pub use ports::inbound::{OrderedCollectionApi, ProductCatalogApi};
pub use ports::outbound::RecordStore;
