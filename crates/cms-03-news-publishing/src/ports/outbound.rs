//! Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::{NewsArticle, Tag};
use crate::domain::errors::NewsStoreError;
use crate::domain::status::PublishStatus;
use async_trait::async_trait;
use shared_types::RecordId;

/// Article persistence.
///
/// Slugs are unique; inserting or saving a taken slug fails with
/// [`NewsStoreError::SlugTaken`].
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn insert(&self, article: &NewsArticle) -> Result<(), NewsStoreError>;

    /// Overwrite every field of an existing article.
    async fn save(&self, article: &NewsArticle) -> Result<(), NewsStoreError>;

    async fn get(&self, id: RecordId) -> Result<Option<NewsArticle>, NewsStoreError>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsArticle>, NewsStoreError>;

    /// Whether an article other than `except` holds `slug`.
    async fn slug_exists(
        &self,
        slug: &str,
        except: Option<RecordId>,
    ) -> Result<bool, NewsStoreError>;

    /// Articles, optionally filtered by status, in no particular order.
    async fn list(&self, status: Option<PublishStatus>) -> Result<Vec<NewsArticle>, NewsStoreError>;

    async fn delete(&self, id: RecordId) -> Result<Option<NewsArticle>, NewsStoreError>;
}

/// Tag persistence. Tag slugs are unique.
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, NewsStoreError>;

    async fn insert(&self, tag: &Tag) -> Result<(), NewsStoreError>;

    /// Tags with the given ids; unknown ids are skipped.
    async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<Tag>, NewsStoreError>;

    async fn list(&self) -> Result<Vec<Tag>, NewsStoreError>;
}
