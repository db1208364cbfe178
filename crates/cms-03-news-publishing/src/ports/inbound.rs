//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{ArticleInput, ArticleView, Tag};
use crate::domain::errors::PublishingError;
use crate::domain::status::PublishStatus;
use async_trait::async_trait;
use shared_types::{RecordId, Session};

/// News publishing API
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// Published articles, newest `published_at` first.
    async fn list_published(&self) -> Result<Vec<ArticleView>, PublishingError>;

    /// One published article by slug. Other states read as not found.
    async fn get_by_slug(&self, slug: &str) -> Result<ArticleView, PublishingError>;

    /// Every article, optionally filtered by status, newest `updated_at` first.
    async fn list_all(
        &self,
        session: Option<&Session>,
        status: Option<PublishStatus>,
    ) -> Result<Vec<ArticleView>, PublishingError>;

    /// One article in any state.
    async fn get(
        &self,
        session: Option<&Session>,
        id: RecordId,
    ) -> Result<ArticleView, PublishingError>;

    /// Create a draft.
    async fn create(
        &self,
        session: Option<&Session>,
        input: ArticleInput,
    ) -> Result<ArticleView, PublishingError>;

    /// Replace content, cover and tags. Status is untouched.
    async fn update(
        &self,
        session: Option<&Session>,
        id: RecordId,
        input: ArticleInput,
    ) -> Result<ArticleView, PublishingError>;

    /// Move the article through the publication state machine.
    async fn set_status(
        &self,
        session: Option<&Session>,
        id: RecordId,
        status: PublishStatus,
    ) -> Result<ArticleView, PublishingError>;

    /// Remove the article and its cover image.
    async fn delete(&self, session: Option<&Session>, id: RecordId)
        -> Result<(), PublishingError>;

    /// Every tag, by name.
    async fn list_tags(&self, session: Option<&Session>) -> Result<Vec<Tag>, PublishingError>;
}
