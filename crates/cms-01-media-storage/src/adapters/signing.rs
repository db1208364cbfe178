//! HMAC-SHA256 presigned upload URLs.
//!
//! The signed message is
//!
//! ```text
//! PUT\n<key>\n<content-type>\n<expires-unix>
//! ```
//!
//! and the URL is `<base_url>/<key>?expires=<unix>&signature=<hex>`. The
//! receiving end recomputes the MAC and compares it in constant time.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::{ObjectKey, SignatureError, StorageError};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies presigned PUT URLs with a shared secret.
#[derive(Clone)]
pub struct HmacUrlSigner {
    secret: Vec<u8>,
    upload_base_url: String,
}

impl std::fmt::Debug for HmacUrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacUrlSigner")
            .field("upload_base_url", &self.upload_base_url)
            .finish_non_exhaustive()
    }
}

impl HmacUrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>, upload_base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            upload_base_url: upload_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn canonical_message(key: &ObjectKey, content_type: &str, expires_unix: i64) -> String {
        format!(
            "PUT\n{}\n{}\n{}",
            key,
            content_type.trim().to_ascii_lowercase(),
            expires_unix
        )
    }

    /// Hex HMAC over the canonical message.
    pub fn sign(
        &self,
        key: &ObjectKey,
        content_type: &str,
        expires_unix: i64,
    ) -> Result<String, StorageError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StorageError::Signing(e.to_string()))?;
        mac.update(Self::canonical_message(key, content_type, expires_unix).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Full presigned URL for a PUT of `key`.
    pub fn presigned_url(
        &self,
        key: &ObjectKey,
        content_type: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        let expires = expires_at.timestamp();
        let signature = self.sign(key, content_type, expires)?;
        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.upload_base_url, key, expires, signature
        ))
    }

    /// Check a signature presented with an upload.
    ///
    /// Expiry is checked before the MAC.
    pub fn verify(
        &self,
        key: &ObjectKey,
        content_type: &str,
        expires_unix: i64,
        signature_hex: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SignatureError> {
        if now.timestamp() > expires_unix {
            return Err(SignatureError::Expired);
        }

        let signature = hex::decode(signature_hex).map_err(|_| SignatureError::Malformed)?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| SignatureError::Malformed)?;
        mac.update(Self::canonical_message(key, content_type, expires_unix).as_bytes());

        // Constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| SignatureError::Mismatch)
    }
}
