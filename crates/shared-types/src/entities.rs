//! # Core Domain Entities
//!
//! Types shared by every CMS subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `RecordId`, `Timestamp`
//! - **Content**: `Locale`, `BilingualText`, `TextBounds`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// UTC wall-clock timestamp used for `created_at` / `updated_at` columns.
pub type Timestamp = DateTime<Utc>;

/// Opaque, immutable identifier assigned by the store when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Allocate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used in generated slugs and log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

// =============================================================================
// CLUSTER B: CONTENT
// =============================================================================

/// Languages the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (left-to-right).
    En,
    /// Arabic (right-to-left).
    Ar,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }
}

/// Inclusive character-count bounds for one language of a bilingual field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub min: usize,
    pub max: usize,
}

impl TextBounds {
    /// Field must contain between `min` and `max` characters.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Field may be empty but not longer than `max`.
    pub const fn optional(max: usize) -> Self {
        Self { min: 0, max }
    }
}

/// A text value carried in both site languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub ar: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Text for the requested locale.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }

    /// Copy with surrounding whitespace removed from both languages.
    pub fn trimmed(&self) -> Self {
        Self {
            en: self.en.trim().to_string(),
            ar: self.ar.trim().to_string(),
        }
    }

    /// Check both languages against `bounds`, counting characters rather
    /// than bytes so Arabic text is measured the way editors see it.
    pub fn validate(&self, field: &str, bounds: TextBounds) -> Result<(), ValidationError> {
        for locale in [Locale::En, Locale::Ar] {
            let len = self.get(locale).trim().chars().count();
            if len < bounds.min {
                return Err(ValidationError::new(
                    format!("{}.{}", field, locale.as_str()),
                    if bounds.min == 1 {
                        "must not be empty".to_string()
                    } else {
                        format!("must be at least {} characters", bounds.min)
                    },
                ));
            }
            if len > bounds.max {
                return Err(ValidationError::new(
                    format!("{}.{}", field, locale.as_str()),
                    format!("must be at most {} characters", bounds.max),
                ));
            }
        }
        Ok(())
    }
}
