//! Entity payloads stored in ordered collections.
//!
//! The ordering logic never looks inside a payload; it only needs to know
//! which collection the payload belongs to, how to validate it, and which
//! stored objects it references.

use cms_01_media_storage::ObjectKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{BilingualText, TextBounds, ValidationError};

use super::entities::CollectionKind;

/// Behaviour every payload stored in an ordered collection provides.
pub trait OrderedPayload:
    Clone + std::fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Collection this payload lives in.
    const KIND: CollectionKind;

    /// Schema check run before any write.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Copy with surrounding whitespace removed from text fields.
    fn normalized(self) -> Self;

    /// Object keys owned by this payload, deleted with the record.
    fn asset_keys(&self) -> Vec<ObjectKey> {
        Vec::new()
    }

    /// Whether anonymous visitors may see the record.
    fn is_public(&self) -> bool {
        true
    }

    /// Combine an edited payload with the stored one. Fields that only a
    /// dedicated operation may change are carried over from `existing`.
    fn merge_content(self, _existing: &Self) -> Self {
        self
    }
}

// =============================================================================
// FAQ
// =============================================================================

const FAQ_QUESTION: TextBounds = TextBounds::new(1, 500);
const FAQ_ANSWER: TextBounds = TextBounds::new(1, 5000);

/// A question and answer shown on the FAQ page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: BilingualText,
    pub answer: BilingualText,
}

impl OrderedPayload for Faq {
    const KIND: CollectionKind = CollectionKind::Faq;

    fn validate(&self) -> Result<(), ValidationError> {
        self.question.validate("question", FAQ_QUESTION)?;
        self.answer.validate("answer", FAQ_ANSWER)
    }

    fn normalized(self) -> Self {
        Self {
            question: self.question.trimmed(),
            answer: self.answer.trimmed(),
        }
    }
}

// =============================================================================
// TEAM
// =============================================================================

const TEAM_NAME: TextBounds = TextBounds::new(1, 120);
const TEAM_POSITION: TextBounds = TextBounds::new(1, 120);

/// A member of the team page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: BilingualText,
    pub position: BilingualText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<ObjectKey>,
}

impl OrderedPayload for TeamMember {
    const KIND: CollectionKind = CollectionKind::Team;

    fn validate(&self) -> Result<(), ValidationError> {
        self.name.validate("name", TEAM_NAME)?;
        self.position.validate("position", TEAM_POSITION)
    }

    fn normalized(self) -> Self {
        Self {
            name: self.name.trimmed(),
            position: self.position.trimmed(),
            photo: self.photo,
        }
    }

    fn asset_keys(&self) -> Vec<ObjectKey> {
        self.photo.iter().cloned().collect()
    }
}

// =============================================================================
// PRODUCTS
// =============================================================================

const PRODUCT_NAME: TextBounds = TextBounds::new(1, 200);
const PRODUCT_DESCRIPTION: TextBounds = TextBounds::optional(5000);
const SPEC_LABEL: TextBounds = TextBounds::new(1, 100);
const SPEC_VALUE: TextBounds = TextBounds::new(1, 200);

/// Most specification rows a product may carry.
pub const MAX_PRODUCT_SPECS: usize = 30;
/// Most gallery images a product may carry.
pub const MAX_PRODUCT_IMAGES: usize = 12;

/// One row of a product's specification table (e.g. "Ash content" / "< 3%").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub label: BilingualText,
    pub value: BilingualText,
}

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub name: BilingualText,
    #[serde(default)]
    pub description: BilingualText,
    #[serde(default)]
    pub specifications: Vec<ProductSpec>,
    #[serde(default)]
    pub images: Vec<ObjectKey>,
    #[serde(default)]
    pub is_hidden: bool,
}

impl OrderedPayload for ProductListing {
    const KIND: CollectionKind = CollectionKind::Product;

    fn validate(&self) -> Result<(), ValidationError> {
        self.name.validate("name", PRODUCT_NAME)?;
        self.description
            .validate("description", PRODUCT_DESCRIPTION)?;

        if self.specifications.len() > MAX_PRODUCT_SPECS {
            return Err(ValidationError::new(
                "specifications",
                format!("must have at most {} entries", MAX_PRODUCT_SPECS),
            ));
        }
        for (i, spec) in self.specifications.iter().enumerate() {
            spec.label
                .validate(&format!("specifications[{}].label", i), SPEC_LABEL)?;
            spec.value
                .validate(&format!("specifications[{}].value", i), SPEC_VALUE)?;
        }

        if self.images.len() > MAX_PRODUCT_IMAGES {
            return Err(ValidationError::new(
                "images",
                format!("must have at most {} entries", MAX_PRODUCT_IMAGES),
            ));
        }

        Ok(())
    }

    fn normalized(self) -> Self {
        Self {
            name: self.name.trimmed(),
            description: self.description.trimmed(),
            specifications: self
                .specifications
                .into_iter()
                .map(|s| ProductSpec {
                    label: s.label.trimmed(),
                    value: s.value.trimmed(),
                })
                .collect(),
            images: self.images,
            is_hidden: self.is_hidden,
        }
    }

    fn asset_keys(&self) -> Vec<ObjectKey> {
        self.images.clone()
    }

    fn is_public(&self) -> bool {
        !self.is_hidden
    }

    fn merge_content(self, existing: &Self) -> Self {
        Self {
            is_hidden: existing.is_hidden,
            ..self
        }
    }
}
