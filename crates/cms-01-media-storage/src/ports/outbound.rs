//! Outbound Ports (Driven Ports / SPI)

use crate::domain::{ObjectKey, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Object storage backend (bucket).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Produce a URL the client can PUT `content_type` bytes to until `expires_at`.
    async fn presign_put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StorageError>;

    /// Delete one object. Deleting an absent object succeeds.
    async fn delete_object(&self, key: &ObjectKey) -> Result<(), StorageError>;

    /// Public URL of an object.
    fn public_url(&self, key: &ObjectKey) -> String;
}

/// Mock implementations for testing
#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;

    /// Storage that records deletions and fails those for listed keys.
    #[derive(Default)]
    pub struct MockObjectStorage {
        pub deleted: Mutex<Vec<ObjectKey>>,
        pub failing: Mutex<Vec<ObjectKey>>,
    }

    impl MockObjectStorage {
        pub fn failing_on(keys: Vec<ObjectKey>) -> Self {
            Self {
                deleted: Mutex::new(Vec::new()),
                failing: Mutex::new(keys),
            }
        }
    }

    #[async_trait]
    impl ObjectStorage for MockObjectStorage {
        async fn presign_put(
            &self,
            key: &ObjectKey,
            _content_type: &str,
            expires_at: DateTime<Utc>,
        ) -> Result<String, StorageError> {
            Ok(format!(
                "https://mock.invalid/{}?expires={}",
                key,
                expires_at.timestamp()
            ))
        }

        async fn delete_object(&self, key: &ObjectKey) -> Result<(), StorageError> {
            if self.failing.lock().contains(key) {
                return Err(StorageError::Unavailable("mock failure".into()));
            }
            self.deleted.lock().push(key.clone());
            Ok(())
        }

        fn public_url(&self, key: &ObjectKey) -> String {
            format!("https://cdn.mock.invalid/{}", key)
        }
    }
}
