//! Media Service
//!
//! Main service implementing MediaApi.

use crate::config::MediaConfig;
use crate::domain::entities::{
    classify_content_type, CleanupReport, MediaClass, ObjectKey, PresignedUpload, UploadRequest,
};
use crate::domain::errors::MediaError;
use crate::ports::inbound::MediaApi;
use crate::ports::outbound::ObjectStorage;
use async_trait::async_trait;
use chrono::Utc;
use shared_types::{require_session, Session, ValidationError};
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

/// Media Service
///
/// Validates upload requests, allocates object keys and asks the storage
/// backend for a presigned PUT. Also owns best-effort deletion for every
/// subsystem that stores object keys on its records.
#[derive(Clone)]
pub struct MediaService {
    config: MediaConfig,
    storage: Arc<dyn ObjectStorage>,
}

impl MediaService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self::with_config(MediaConfig::default(), storage)
    }

    pub fn with_config(config: MediaConfig, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { config, storage }
    }

    /// Validate content type, size and file name for the target folder
    fn validate_upload(&self, request: &UploadRequest) -> Result<(), MediaError> {
        let name = request.file_name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("fileName", "must not be empty").into());
        }
        if name.chars().count() > self.config.max_file_name_len {
            return Err(ValidationError::new(
                "fileName",
                format!(
                    "must be at most {} characters",
                    self.config.max_file_name_len
                ),
            )
            .into());
        }
        if request.size_bytes == 0 {
            return Err(ValidationError::new("sizeBytes", "must be greater than zero").into());
        }

        let unsupported = || MediaError::UnsupportedContentType {
            folder: request.folder.as_str(),
            content_type: request.content_type.clone(),
        };

        let max = match classify_content_type(&request.content_type) {
            Some(MediaClass::Image) => self.config.max_image_bytes,
            Some(MediaClass::Video) if request.folder.accepts_video() => {
                self.config.max_video_bytes
            }
            _ => return Err(unsupported()),
        };

        if request.size_bytes > max {
            return Err(MediaError::TooLarge {
                size: request.size_bytes,
                max,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MediaApi for MediaService {
    async fn request_upload(
        &self,
        session: Option<&Session>,
        request: UploadRequest,
    ) -> Result<PresignedUpload, MediaError> {
        let session = require_session(session).map_err(|_| MediaError::Unauthorized)?;
        self.validate_upload(&request)?;

        let key = ObjectKey::generate(request.folder, &request.file_name);
        let content_type = request.content_type.trim().to_ascii_lowercase();
        let ttl = chrono::Duration::from_std(self.config.upload_ttl)
            .unwrap_or_else(|_| chrono::Duration::minutes(15));
        let expires_at = Utc::now() + ttl;

        let url = self
            .storage
            .presign_put(&key, &content_type, expires_at)
            .await?;

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), content_type.clone());

        cms_telemetry::metric_inc!(cms_telemetry::UPLOADS_PRESIGNED, &[request.folder.as_str()]);
        info!(
            key = %key,
            content_type = %content_type,
            size_bytes = request.size_bytes,
            user_id = %session.actor.user_id,
            "Issued presigned upload"
        );

        Ok(PresignedUpload {
            public_url: self.storage.public_url(&key),
            key,
            url,
            method: "PUT".to_string(),
            headers,
            expires_at,
        })
    }

    async fn delete_best_effort(&self, keys: &[ObjectKey]) -> CleanupReport {
        let mut report = CleanupReport::default();

        for key in keys {
            match self.storage.delete_object(key).await {
                Ok(()) => {
                    debug!(key = %key, "Deleted stored object");
                    report.deleted.push(key.clone());
                }
                Err(e) => {
                    cms_telemetry::metric_inc!(cms_telemetry::ORPHANED_OBJECTS);
                    warn!(key = %key, error = %e, "Failed to delete stored object, left orphaned");
                    report.orphaned.push(key.clone());
                }
            }
        }

        report
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        self.storage.public_url(key)
    }
}
