//! # CMS-01: Media Storage Subsystem
//!
//! Object keys, presigned upload URLs and best-effort deletion of stored
//! objects. Browsers upload bytes directly to the bucket; the CMS only
//! signs the request and later records the returned key on a record.
//!
//! ## Architecture
//!
//! - **Domain**: `ObjectKey`, `MediaFolder`, `UploadRequest`, `PresignedUpload`, `CleanupReport`
//! - **Ports**: Inbound (`MediaApi`) and Outbound (`ObjectStorage`)
//! - **Adapters**: HMAC-SHA256 URL signer, in-memory bucket
//! - **Application**: `MediaService`
//!
//! ## Cleanup Semantics
//!
//! Deletion never fails the caller. A key that cannot be deleted is logged
//! at `warn`, counted in `cms_media_orphaned_objects_total` and returned in
//! the [`CleanupReport`] so a sweeper can remove it later.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{HmacUrlSigner, InMemoryObjectStorage};
pub use application::service::MediaService;
pub use config::{ConfigError as MediaConfigError, MediaConfig};
pub use domain::entities::*;
pub use domain::errors::{MediaError, SignatureError, StorageError};
pub use ports::inbound::MediaApi;
pub use ports::outbound::ObjectStorage;
