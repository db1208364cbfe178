//! Core entities for news publishing

use cms_01_media_storage::ObjectKey;
use serde::{Deserialize, Serialize};
use shared_types::{BilingualText, RecordId, TextBounds, Timestamp, ValidationError};

use super::status::{PublicationState, PublishStatus};

pub(crate) const TITLE: TextBounds = TextBounds::new(1, 200);
pub(crate) const SUMMARY: TextBounds = TextBounds::optional(500);
pub(crate) const CONTENT: TextBounds = TextBounds::new(1, 100_000);
pub(crate) const TAG_NAME_MAX: usize = 50;

/// A stored news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: RecordId,
    pub slug: String,
    pub title: BilingualText,
    pub summary: BilingualText,
    /// Rich-text HTML produced by the dashboard editor
    pub content: BilingualText,
    pub cover_image: Option<ObjectKey>,
    pub tag_ids: Vec<RecordId>,
    #[serde(flatten)]
    pub publication: PublicationState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewsArticle {
    pub fn status(&self) -> PublishStatus {
        self.publication.status
    }
}

/// A topic label attached to articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
}

/// Editable article fields as sent by the dashboard.
///
/// Tags are given by name; unknown names are created on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: BilingualText,
    #[serde(default)]
    pub summary: BilingualText,
    pub content: BilingualText,
    #[serde(default)]
    pub cover_image: Option<ObjectKey>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ArticleInput {
    /// Copy with surrounding whitespace removed from text fields.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trimmed(),
            summary: self.summary.trimmed(),
            content: self.content.trimmed(),
            cover_image: self.cover_image,
            tags: self.tags.into_iter().map(|t| t.trim().to_string()).collect(),
        }
    }

    /// Schema check; `max_tags` bounds the number of distinct tag names.
    pub fn validate(&self, max_tags: usize) -> Result<(), ValidationError> {
        self.title.validate("title", TITLE)?;
        self.summary.validate("summary", SUMMARY)?;
        self.content.validate("content", CONTENT)?;

        for (i, name) in self.tags.iter().enumerate() {
            let len = name.chars().count();
            if len == 0 {
                return Err(ValidationError::new(
                    format!("tags[{}]", i),
                    "must not be empty",
                ));
            }
            if len > TAG_NAME_MAX {
                return Err(ValidationError::new(
                    format!("tags[{}]", i),
                    format!("must be at most {} characters", TAG_NAME_MAX),
                ));
            }
        }
        if self.tags.len() > max_tags {
            return Err(ValidationError::new(
                "tags",
                format!("must have at most {} entries", max_tags),
            ));
        }
        Ok(())
    }
}

/// Article with its tags resolved, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub tags: Vec<Tag>,
    pub cover_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ArticleInput {
        ArticleInput {
            title: BilingualText::new("New kiln", "فرن جديد"),
            summary: BilingualText::default(),
            content: BilingualText::new("<p>Body</p>", "<p>نص</p>"),
            cover_image: None,
            tags: vec!["Factory".into()],
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(input().validate(10).is_ok());
    }

    #[test]
    fn test_validate_empty_content() {
        let mut i = input();
        i.content.ar = "  ".into();
        assert_eq!(i.validate(10).unwrap_err().field, "content.ar");
    }

    #[test]
    fn test_validate_tags() {
        let mut i = input();
        i.tags = vec!["ok".into(), "".into()];
        assert_eq!(i.validate(10).unwrap_err().field, "tags[1]");

        i.tags = (0..3).map(|n| format!("t{}", n)).collect();
        assert_eq!(i.validate(2).unwrap_err().field, "tags");

        i.tags = vec!["x".repeat(51)];
        assert!(i.validate(10).is_err());
    }

    #[test]
    fn test_normalized_trims_tags() {
        let mut i = input();
        i.tags = vec!["  Export ".into()];
        assert_eq!(i.normalized().tags, vec!["Export".to_string()]);
    }

    #[test]
    fn test_article_serializes_flat_status() {
        let article = NewsArticle {
            id: RecordId::new(),
            slug: "new-kiln".into(),
            title: BilingualText::new("New kiln", "فرن جديد"),
            summary: BilingualText::default(),
            content: BilingualText::new("b", "b"),
            cover_image: None,
            tag_ids: vec![],
            publication: PublicationState::draft(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["status"], "draft");
        assert!(json["publishedAt"].is_null());
        assert_eq!(json["slug"], "new-kiln");
    }
}
