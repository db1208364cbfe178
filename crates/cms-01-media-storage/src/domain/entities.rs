//! Core entities for media uploads
//!
//! Object keys, upload folders, presign requests and cleanup reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::errors::MediaError;

/// Longest sanitised file-name segment kept in a generated key.
const MAX_FILE_STEM_LEN: usize = 64;

/// Location of an object inside the bucket, e.g. `team/1f0c…-mona.webp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Parse a key supplied by a client or read back from a record.
    pub fn parse(raw: impl Into<String>) -> Result<Self, MediaError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(MediaError::InvalidKey {
                key: raw,
                reason: "empty",
            });
        }
        if raw.starts_with('/') {
            return Err(MediaError::InvalidKey {
                key: raw,
                reason: "leading slash",
            });
        }
        if raw.contains('\\') {
            return Err(MediaError::InvalidKey {
                key: raw,
                reason: "backslash",
            });
        }
        if raw.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(MediaError::InvalidKey {
                key: raw,
                reason: "empty or relative path segment",
            });
        }
        Ok(Self(raw))
    }

    /// Build a fresh key for an upload into `folder`.
    pub fn generate(folder: MediaFolder, file_name: &str) -> Self {
        let (stem, ext) = split_extension(file_name);
        let stem = sanitize_segment(stem);
        let stem = if stem.is_empty() { "file".to_string() } else { stem };
        let id = Uuid::new_v4().simple().to_string();

        let name = match ext {
            Some(ext) => format!("{}-{}.{}", id, stem, sanitize_segment(ext)),
            None => format!("{}-{}", id, stem),
        };
        Self(format!("{}/{}", folder.as_str(), name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder prefix of the key, if it is one the dashboard uploads into.
    pub fn folder(&self) -> Option<MediaFolder> {
        self.0.split('/').next().and_then(MediaFolder::from_prefix)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    // Only the final path component counts; browsers sometimes send full paths.
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
fn sanitize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
        if out.len() >= MAX_FILE_STEM_LEN {
            break;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Top-level bucket folders the dashboard uploads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFolder {
    Banners,
    Products,
    Team,
    News,
    Reels,
    Gallery,
}

impl MediaFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::Banners => "banners",
            MediaFolder::Products => "products",
            MediaFolder::Team => "team",
            MediaFolder::News => "news",
            MediaFolder::Reels => "reels",
            MediaFolder::Gallery => "gallery",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "banners" => Some(MediaFolder::Banners),
            "products" => Some(MediaFolder::Products),
            "team" => Some(MediaFolder::Team),
            "news" => Some(MediaFolder::News),
            "reels" => Some(MediaFolder::Reels),
            "gallery" => Some(MediaFolder::Gallery),
            _ => None,
        }
    }

    /// Whether video uploads are accepted in this folder.
    pub fn accepts_video(&self) -> bool {
        matches!(self, MediaFolder::Reels)
    }
}

/// Broad media class derived from the content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    Image,
    Video,
}

/// Content types accepted for upload.
pub const IMAGE_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/avif",
    "image/gif",
];

/// Video content types, only accepted for reels.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4", "video/webm"];

/// Classify a content type, or `None` if it is not accepted anywhere.
pub fn classify_content_type(content_type: &str) -> Option<MediaClass> {
    let normalized = content_type.trim().to_ascii_lowercase();
    if IMAGE_CONTENT_TYPES.contains(&normalized.as_str()) {
        Some(MediaClass::Image)
    } else if VIDEO_CONTENT_TYPES.contains(&normalized.as_str()) {
        Some(MediaClass::Video)
    } else {
        None
    }
}

/// Request for a presigned upload URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub folder: MediaFolder,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Presigned PUT the browser uses to upload bytes directly to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    /// Key to store on the record once the upload succeeds
    pub key: ObjectKey,
    /// Signed URL to PUT the bytes to
    pub url: String,
    /// HTTP method (always `PUT`)
    pub method: String,
    /// Headers the client must send with the upload
    pub headers: BTreeMap<String, String>,
    /// Instant after which the signature is rejected
    pub expires_at: DateTime<Utc>,
    /// Where the object will be publicly served from
    pub public_url: String,
}

/// Outcome of a best-effort multi-object delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub deleted: Vec<ObjectKey>,
    pub orphaned: Vec<ObjectKey>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty()
    }
}
