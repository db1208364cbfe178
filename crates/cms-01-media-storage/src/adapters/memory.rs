//! In-memory object storage.
//!
//! Keeps uploaded keys in a set and signs upload URLs with [`HmacUrlSigner`].
//! `accept_upload` plays the role of the bucket endpoint: it verifies the
//! presigned parameters before recording the object.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::signing::HmacUrlSigner;
use crate::domain::{ObjectKey, SignatureError, StorageError};
use crate::ports::ObjectStorage;

/// Stored object metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// In-process bucket.
pub struct InMemoryObjectStorage {
    signer: HmacUrlSigner,
    public_base_url: String,
    objects: RwLock<HashMap<ObjectKey, StoredObject>>,
    fail_deletes: AtomicBool,
}

impl InMemoryObjectStorage {
    pub fn new(signer: HmacUrlSigner, public_base_url: impl Into<String>) -> Self {
        Self {
            signer,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Record an upload after checking its presigned parameters.
    pub fn accept_upload(
        &self,
        key: &ObjectKey,
        content_type: &str,
        size_bytes: u64,
        expires_unix: i64,
        signature_hex: &str,
    ) -> Result<(), SignatureError> {
        let now = Utc::now();
        self.signer
            .verify(key, content_type, expires_unix, signature_hex, now)?;
        self.objects.write().insert(
            key.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                size_bytes,
                uploaded_at: now,
            },
        );
        Ok(())
    }

    /// Record an object directly, bypassing signature checks.
    pub fn insert_object(&self, key: ObjectKey, content_type: &str, size_bytes: u64) {
        self.objects.write().insert(
            key,
            StoredObject {
                content_type: content_type.to_string(),
                size_bytes,
                uploaded_at: Utc::now(),
            },
        );
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.read().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Make every subsequent delete fail (simulates a storage outage).
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn presign_put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        self.signer.presigned_url(key, content_type, expires_at)
    }

    async fn delete_object(&self, key: &ObjectKey) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "delete rejected by storage backend".to_string(),
            ));
        }
        self.objects.write().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn storage() -> InMemoryObjectStorage {
        InMemoryObjectStorage::new(
            HmacUrlSigner::new(b"secret".to_vec(), "https://uploads.test"),
            "https://cdn.test/",
        )
    }

    fn parse_query(url: &str) -> (i64, String) {
        let query = url.split_once('?').unwrap().1;
        let mut expires = 0;
        let mut signature = String::new();
        for pair in query.split('&') {
            match pair.split_once('=').unwrap() {
                ("expires", v) => expires = v.parse().unwrap(),
                ("signature", v) => signature = v.to_string(),
                _ => {}
            }
        }
        (expires, signature)
    }

    #[tokio::test]
    async fn test_presign_then_accept_upload() {
        let storage = storage();
        let key = ObjectKey::parse("gallery/x-kiln.jpg").unwrap();
        let url = storage
            .presign_put(&key, "image/jpeg", Utc::now() + Duration::minutes(10))
            .await
            .unwrap();

        let (expires, signature) = parse_query(&url);
        storage
            .accept_upload(&key, "image/jpeg", 1024, expires, &signature)
            .unwrap();
        assert!(storage.contains(&key));
    }

    #[tokio::test]
    async fn test_accept_upload_rejects_tampered_key() {
        let storage = storage();
        let key = ObjectKey::parse("gallery/x-kiln.jpg").unwrap();
        let url = storage
            .presign_put(&key, "image/jpeg", Utc::now() + Duration::minutes(10))
            .await
            .unwrap();

        let (expires, signature) = parse_query(&url);
        let other = ObjectKey::parse("gallery/y-kiln.jpg").unwrap();
        assert_eq!(
            storage.accept_upload(&other, "image/jpeg", 1024, expires, &signature),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(storage.object_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = storage();
        let key = ObjectKey::parse("team/a.png").unwrap();
        storage.insert_object(key.clone(), "image/png", 10);
        storage.delete_object(&key).await.unwrap();
        storage.delete_object(&key).await.unwrap();
        assert!(!storage.contains(&key));
    }

    #[tokio::test]
    async fn test_fail_deletes_keeps_object() {
        let storage = storage();
        let key = ObjectKey::parse("team/a.png").unwrap();
        storage.insert_object(key.clone(), "image/png", 10);
        storage.set_fail_deletes(true);
        assert!(storage.delete_object(&key).await.is_err());
        assert!(storage.contains(&key));
    }

    #[test]
    fn test_public_url() {
        let key = ObjectKey::parse("news/a.webp").unwrap();
        assert_eq!(storage().public_url(&key), "https://cdn.test/news/a.webp");
    }
}
