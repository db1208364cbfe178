//! Inbound Ports (Driving Ports / API)

use crate::domain::{CleanupReport, MediaError, ObjectKey, PresignedUpload, UploadRequest};
use async_trait::async_trait;
use shared_types::Session;

/// Media API used by the gateway and by subsystems that own stored objects.
#[async_trait]
pub trait MediaApi: Send + Sync {
    /// Issue a presigned PUT for one upload.
    ///
    /// Requires a staff session; the request is validated against the
    /// folder's content-type allowlist and the configured size limits.
    async fn request_upload(
        &self,
        session: Option<&Session>,
        request: UploadRequest,
    ) -> Result<PresignedUpload, MediaError>;

    /// Delete every key, tolerating failures.
    ///
    /// Failed deletions are logged and counted, never returned as errors.
    async fn delete_best_effort(&self, keys: &[ObjectKey]) -> CleanupReport;

    /// Public URL a stored object is served from.
    fn public_url(&self, key: &ObjectKey) -> String;
}
