//! News Service
//!
//! Main service implementing NewsApi.

use crate::config::PublishingConfig;
use crate::domain::entities::{ArticleInput, ArticleView, NewsArticle, Tag};
use crate::domain::errors::{NewsStoreError, PublishingError};
use crate::domain::slug::{fallback_slug, slug_candidates, slugify, tag_slug};
use crate::domain::status::{PublicationState, PublishStatus};
use crate::ports::inbound::NewsApi;
use crate::ports::outbound::{ArticleStore, TagStore};
use async_trait::async_trait;
use chrono::Utc;
use cms_01_media_storage::MediaApi;
use cms_telemetry::log_record_event;
use shared_types::{require_session, RecordId, Session};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use tracing::{debug, info, warn};

/// News Service
///
/// Owns slug allocation, tag auto-creation and the publication state
/// machine. Mutations are serialised by a write gate so slug and tag
/// uniqueness checks are not raced by another request in this process.
pub struct NewsService {
    config: PublishingConfig,
    articles: Arc<dyn ArticleStore>,
    tags: Arc<dyn TagStore>,
    media: Arc<dyn MediaApi>,
    write_gate: Mutex<()>,
}

impl NewsService {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        tags: Arc<dyn TagStore>,
        media: Arc<dyn MediaApi>,
    ) -> Self {
        Self::with_config(PublishingConfig::default(), articles, tags, media)
    }

    pub fn with_config(
        config: PublishingConfig,
        articles: Arc<dyn ArticleStore>,
        tags: Arc<dyn TagStore>,
        media: Arc<dyn MediaApi>,
    ) -> Self {
        Self {
            config,
            articles,
            tags,
            media,
            write_gate: Mutex::new(()),
        }
    }

    fn authorize(session: Option<&Session>) -> Result<&Session, PublishingError> {
        require_session(session).map_err(|_| {
            warn!("Rejected news request without session");
            PublishingError::Unauthorized
        })
    }

    fn prepare(&self, input: ArticleInput) -> Result<ArticleInput, PublishingError> {
        let input = input.normalized();
        input.validate(self.config.max_tags_per_article)?;
        Ok(input)
    }

    async fn load(&self, id: RecordId) -> Result<NewsArticle, PublishingError> {
        self.articles
            .get(id)
            .await?
            .ok_or_else(|| PublishingError::not_found(id))
    }

    /// Unique slug derived from the English title.
    async fn allocate_slug(
        &self,
        title_en: &str,
        id: RecordId,
    ) -> Result<String, PublishingError> {
        let base = slugify(title_en, self.config.max_slug_len);
        if base.is_empty() {
            return Ok(fallback_slug(id));
        }

        for candidate in slug_candidates(&base, self.config.max_slug_attempts) {
            if !self.articles.slug_exists(&candidate, Some(id)).await? {
                return Ok(candidate);
            }
        }

        debug!(base = %base, "Slug candidates exhausted, using id-based slug");
        Ok(fallback_slug(id))
    }

    /// Resolve tag names to ids, creating tags that do not exist yet.
    ///
    /// Names that map to the same slug collapse to one tag.
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<RecordId>, PublishingError> {
        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(names.len());

        for name in names {
            let slug = tag_slug(name);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }

            if let Some(tag) = self.tags.find_by_slug(&slug).await? {
                ids.push(tag.id);
                continue;
            }

            let tag = Tag {
                id: RecordId::new(),
                name: name.clone(),
                slug: slug.clone(),
                created_at: Utc::now(),
            };
            match self.tags.insert(&tag).await {
                Ok(()) => {
                    info!(tag = %tag.name, slug = %tag.slug, "Tag created");
                    ids.push(tag.id);
                }
                Err(NewsStoreError::SlugTaken(_)) => {
                    // Created concurrently by another process.
                    let existing = self.tags.find_by_slug(&slug).await?.ok_or_else(|| {
                        NewsStoreError::Backend(format!("tag {} vanished after conflict", slug))
                    })?;
                    ids.push(existing.id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(ids)
    }

    async fn view(&self, article: NewsArticle) -> Result<ArticleView, PublishingError> {
        let tags = self.tags.get_many(&article.tag_ids).await?;
        let cover_image_url = article
            .cover_image
            .as_ref()
            .map(|key| self.media.public_url(key));
        Ok(ArticleView {
            article,
            tags,
            cover_image_url,
        })
    }

    async fn views(&self, articles: Vec<NewsArticle>) -> Result<Vec<ArticleView>, PublishingError> {
        let mut views = Vec::with_capacity(articles.len());
        for article in articles {
            views.push(self.view(article).await?);
        }
        Ok(views)
    }
}

#[async_trait]
impl NewsApi for NewsService {
    async fn list_published(&self) -> Result<Vec<ArticleView>, PublishingError> {
        let mut articles = self.articles.list(Some(PublishStatus::Published)).await?;
        articles.sort_by_key(|a| Reverse((a.publication.published_at, a.created_at)));
        debug!(count = articles.len(), "Listed published articles");
        self.views(articles).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<ArticleView, PublishingError> {
        match self.articles.get_by_slug(slug).await? {
            Some(article) if article.publication.is_published() => self.view(article).await,
            _ => Err(PublishingError::ArticleNotFound(slug.to_string())),
        }
    }

    async fn list_all(
        &self,
        session: Option<&Session>,
        status: Option<PublishStatus>,
    ) -> Result<Vec<ArticleView>, PublishingError> {
        Self::authorize(session)?;
        let mut articles = self.articles.list(status).await?;
        articles.sort_by_key(|a| Reverse(a.updated_at));
        self.views(articles).await
    }

    async fn get(
        &self,
        session: Option<&Session>,
        id: RecordId,
    ) -> Result<ArticleView, PublishingError> {
        Self::authorize(session)?;
        let article = self.load(id).await?;
        self.view(article).await
    }

    async fn create(
        &self,
        session: Option<&Session>,
        input: ArticleInput,
    ) -> Result<ArticleView, PublishingError> {
        let session = Self::authorize(session)?;
        let input = self.prepare(input)?;

        let _gate = self.write_gate.lock().await;

        let id = RecordId::new();
        let slug = self.allocate_slug(&input.title.en, id).await?;
        let tag_ids = self.resolve_tags(&input.tags).await?;
        let now = Utc::now();

        let article = NewsArticle {
            id,
            slug,
            title: input.title,
            summary: input.summary,
            content: input.content,
            cover_image: input.cover_image,
            tag_ids,
            publication: PublicationState::draft(),
            created_at: now,
            updated_at: now,
        };
        self.articles.insert(&article).await?;

        info!(
            article_id = %article.id,
            slug = %article.slug,
            user_id = %session.actor.user_id,
            "Article created"
        );
        self.view(article).await
    }

    async fn update(
        &self,
        session: Option<&Session>,
        id: RecordId,
        input: ArticleInput,
    ) -> Result<ArticleView, PublishingError> {
        let session = Self::authorize(session)?;
        let input = self.prepare(input)?;

        let _gate = self.write_gate.lock().await;

        let existing = self.load(id).await?;

        // Slugs are frozen once an article has been published.
        let slug = if existing.status() == PublishStatus::Draft
            && existing.publication.published_at.is_none()
            && existing.title.en != input.title.en
        {
            self.allocate_slug(&input.title.en, id).await?
        } else {
            existing.slug.clone()
        };
        let tag_ids = self.resolve_tags(&input.tags).await?;

        let replaced_cover = match (&existing.cover_image, &input.cover_image) {
            (Some(old), new) if new.as_ref() != Some(old) => Some(old.clone()),
            _ => None,
        };

        let article = NewsArticle {
            slug,
            title: input.title,
            summary: input.summary,
            content: input.content,
            cover_image: input.cover_image,
            tag_ids,
            updated_at: Utc::now(),
            ..existing
        };
        self.articles.save(&article).await.map_err(|e| match e {
            NewsStoreError::NotFound { id } => PublishingError::not_found(id),
            other => other.into(),
        })?;

        if let Some(old) = replaced_cover {
            self.media.delete_best_effort(&[old]).await;
        }

        info!(
            article_id = %article.id,
            slug = %article.slug,
            user_id = %session.actor.user_id,
            "Article updated"
        );
        self.view(article).await
    }

    async fn set_status(
        &self,
        session: Option<&Session>,
        id: RecordId,
        status: PublishStatus,
    ) -> Result<ArticleView, PublishingError> {
        let session = Self::authorize(session)?;

        let _gate = self.write_gate.lock().await;

        let mut article = self.load(id).await?;
        let from = article.status();
        let next = article
            .publication
            .transition(status, &session.actor, Utc::now())
            .map_err(|e| {
                warn!(article_id = %id, from = %e.from, to = %e.to, "Rejected status change");
                e
            })?;

        if next == article.publication {
            debug!(article_id = %id, status = %status, "Status unchanged");
            return self.view(article).await;
        }

        article.publication = next;
        article.updated_at = Utc::now();
        self.articles.save(&article).await?;
        cms_telemetry::ARTICLE_STATUS_CHANGES
            .with_label_values(&[from.as_str(), status.as_str()])
            .inc();

        log_record_event!(
            info,
            "news",
            "Article status changed",
            id,
            from = %from,
            to = %status,
            user_id = %session.actor.user_id
        );
        self.view(article).await
    }

    async fn delete(
        &self,
        session: Option<&Session>,
        id: RecordId,
    ) -> Result<(), PublishingError> {
        let session = Self::authorize(session)?;

        let _gate = self.write_gate.lock().await;

        let article = self.load(id).await?;
        if let Some(cover) = &article.cover_image {
            self.media.delete_best_effort(std::slice::from_ref(cover)).await;
        }
        self.articles
            .delete(id)
            .await?
            .ok_or_else(|| PublishingError::not_found(id))?;

        info!(
            article_id = %id,
            slug = %article.slug,
            user_id = %session.actor.user_id,
            "Article deleted"
        );
        Ok(())
    }

    async fn list_tags(&self, session: Option<&Session>) -> Result<Vec<Tag>, PublishingError> {
        Self::authorize(session)?;
        Ok(self.tags.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryArticleStore, InMemoryTagStore};
    use cms_01_media_storage::{HmacUrlSigner, InMemoryObjectStorage, MediaService, ObjectKey};
    use shared_types::{Actor, BilingualText, ErrorKind};

    struct Fixture {
        service: NewsService,
        articles: Arc<InMemoryArticleStore>,
        bucket: Arc<InMemoryObjectStorage>,
    }

    fn fixture() -> Fixture {
        let articles = Arc::new(InMemoryArticleStore::new());
        let bucket = Arc::new(InMemoryObjectStorage::new(
            HmacUrlSigner::new(b"k".to_vec(), "https://up.test"),
            "https://cdn.test",
        ));
        let media = Arc::new(MediaService::new(bucket.clone()));
        Fixture {
            service: NewsService::new(articles.clone(), Arc::new(InMemoryTagStore::new()), media),
            articles,
            bucket,
        }
    }

    fn staff() -> Session {
        Session::new(Actor::new("staff-1", "Mona"))
    }

    fn input(title: &str, tags: &[&str]) -> ArticleInput {
        ArticleInput {
            title: BilingualText::new(title, "عنوان"),
            summary: BilingualText::default(),
            content: BilingualText::new("<p>Body</p>", "<p>نص</p>"),
            cover_image: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_as_draft_with_slug() {
        let f = fixture();
        let view = f
            .service
            .create(Some(&staff()), input("New Kiln Opens", &[]))
            .await
            .unwrap();
        assert_eq!(view.article.status(), PublishStatus::Draft);
        assert_eq!(view.article.slug, "new-kiln-opens");
        assert!(view.article.publication.published_at.is_none());
    }

    #[tokio::test]
    async fn test_slug_collisions_get_suffixes() {
        let f = fixture();
        let s = staff();
        let a = f.service.create(Some(&s), input("Launch", &[])).await.unwrap();
        let b = f.service.create(Some(&s), input("Launch", &[])).await.unwrap();
        let c = f.service.create(Some(&s), input("Launch!", &[])).await.unwrap();
        assert_eq!(a.article.slug, "launch");
        assert_eq!(b.article.slug, "launch-2");
        assert_eq!(c.article.slug, "launch-3");
    }

    #[tokio::test]
    async fn test_non_ascii_title_gets_fallback_slug() {
        let f = fixture();
        let view = f
            .service
            .create(Some(&staff()), input("فحم", &[]))
            .await
            .unwrap();
        assert_eq!(view.article.slug, format!("article-{}", view.article.id.short()));
    }

    #[tokio::test]
    async fn test_tags_auto_created_and_reused() {
        let f = fixture();
        let s = staff();
        let a = f
            .service
            .create(Some(&s), input("A", &["Export", "export", "Shisha Coal"]))
            .await
            .unwrap();
        assert_eq!(a.tags.len(), 2);

        let b = f
            .service
            .create(Some(&s), input("B", &["EXPORT"]))
            .await
            .unwrap();
        assert_eq!(b.tags.len(), 1);
        assert_eq!(b.tags[0].id, a.tags[0].id);

        let all = f.service.list_tags(Some(&s)).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_draft_to_unpublished_rejected() {
        let f = fixture();
        let s = staff();
        let view = f.service.create(Some(&s), input("A", &[])).await.unwrap();

        let err = f
            .service
            .set_status(Some(&s), view.article.id, PublishStatus::Unpublished)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let stored = f.articles.get(view.article.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), PublishStatus::Draft);
    }

    #[tokio::test]
    async fn test_publish_lifecycle() {
        let f = fixture();
        let s = staff();
        let id = f
            .service
            .create(Some(&s), input("A", &[]))
            .await
            .unwrap()
            .article
            .id;

        let published = f
            .service
            .set_status(Some(&s), id, PublishStatus::Published)
            .await
            .unwrap();
        let stamp = published.article.publication.published_at;
        assert!(stamp.is_some());
        assert_eq!(
            published.article.publication.published_by.as_deref(),
            Some("Mona")
        );

        let unpublished = f
            .service
            .set_status(Some(&s), id, PublishStatus::Unpublished)
            .await
            .unwrap();
        assert_eq!(unpublished.article.publication.published_at, stamp);

        let republished = f
            .service
            .set_status(Some(&s), id, PublishStatus::Published)
            .await
            .unwrap();
        assert_eq!(republished.article.publication.published_at, stamp);

        let draft = f
            .service
            .set_status(Some(&s), id, PublishStatus::Draft)
            .await
            .unwrap();
        assert!(draft.article.publication.published_at.is_none());
    }

    #[tokio::test]
    async fn test_status_changes_are_counted() {
        let f = fixture();
        let s = staff();
        let id = f
            .service
            .create(Some(&s), input("Counted", &[]))
            .await
            .unwrap()
            .article
            .id;

        let counter = || {
            cms_telemetry::ARTICLE_STATUS_CHANGES
                .with_label_values(&["draft", "published"])
                .get()
        };
        let before = counter();
        f.service
            .set_status(Some(&s), id, PublishStatus::Published)
            .await
            .unwrap();
        assert!(counter() >= before + 1.0);

        let before = cms_telemetry::ARTICLE_STATUS_CHANGES
            .with_label_values(&["published", "published"])
            .get();
        f.service
            .set_status(Some(&s), id, PublishStatus::Published)
            .await
            .unwrap();
        assert_eq!(
            cms_telemetry::ARTICLE_STATUS_CHANGES
                .with_label_values(&["published", "published"])
                .get(),
            before
        );
    }

    #[tokio::test]
    async fn test_same_state_is_noop() {
        let f = fixture();
        let s = staff();
        let view = f.service.create(Some(&s), input("A", &[])).await.unwrap();
        let again = f
            .service
            .set_status(Some(&s), view.article.id, PublishStatus::Draft)
            .await
            .unwrap();
        assert_eq!(again.article.updated_at, view.article.updated_at);
    }

    #[tokio::test]
    async fn test_public_reads_only_see_published() {
        let f = fixture();
        let s = staff();
        let a = f.service.create(Some(&s), input("Alpha", &[])).await.unwrap();
        let b = f.service.create(Some(&s), input("Beta", &[])).await.unwrap();

        assert_eq!(
            f.service.get_by_slug("alpha").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );

        f.service
            .set_status(Some(&s), a.article.id, PublishStatus::Published)
            .await
            .unwrap();
        f.service
            .set_status(Some(&s), b.article.id, PublishStatus::Published)
            .await
            .unwrap();
        f.service
            .set_status(Some(&s), a.article.id, PublishStatus::Unpublished)
            .await
            .unwrap();

        let public = f.service.list_published().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].article.id, b.article.id);
        assert!(f.service.get_by_slug("beta").await.is_ok());
        assert!(f.service.get_by_slug("alpha").await.is_err());

        let drafts = f
            .service
            .list_all(Some(&s), Some(PublishStatus::Unpublished))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(f.service.list_all(Some(&s), None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_published_list_newest_first() {
        let f = fixture();
        let s = staff();
        let mut ids = Vec::new();
        for title in ["One", "Two", "Three"] {
            let id = f
                .service
                .create(Some(&s), input(title, &[]))
                .await
                .unwrap()
                .article
                .id;
            f.service
                .set_status(Some(&s), id, PublishStatus::Published)
                .await
                .unwrap();
            ids.push(id);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let listed: Vec<RecordId> = f
            .service
            .list_published()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.article.id)
            .collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_update_replaces_cover_and_freezes_published_slug() {
        let f = fixture();
        let s = staff();
        let old_cover = ObjectKey::parse("news/old.webp").unwrap();
        f.bucket.insert_object(old_cover.clone(), "image/webp", 10);

        let mut first = input("Original", &[]);
        first.cover_image = Some(old_cover.clone());
        let view = f.service.create(Some(&s), first).await.unwrap();
        let id = view.article.id;
        assert_eq!(
            view.cover_image_url.as_deref(),
            Some("https://cdn.test/news/old.webp")
        );

        // Draft: slug follows the title.
        let renamed = f
            .service
            .update(Some(&s), id, input("Renamed", &[]))
            .await
            .unwrap();
        assert_eq!(renamed.article.slug, "renamed");
        assert!(!f.bucket.contains(&old_cover));

        f.service
            .set_status(Some(&s), id, PublishStatus::Published)
            .await
            .unwrap();
        let after = f
            .service
            .update(Some(&s), id, input("Another Title", &["News"]))
            .await
            .unwrap();
        assert_eq!(after.article.slug, "renamed");
        assert_eq!(after.article.status(), PublishStatus::Published);
        assert_eq!(after.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_cover() {
        let f = fixture();
        let s = staff();
        let cover = ObjectKey::parse("news/c.webp").unwrap();
        f.bucket.insert_object(cover.clone(), "image/webp", 10);

        let mut i = input("A", &[]);
        i.cover_image = Some(cover.clone());
        let id = f.service.create(Some(&s), i).await.unwrap().article.id;

        f.bucket.set_fail_deletes(true);
        f.service.delete(Some(&s), id).await.unwrap();
        assert!(f.bucket.contains(&cover));
        assert_eq!(
            f.service.get(Some(&s), id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_staff_operations_require_session() {
        let f = fixture();
        let id = f
            .service
            .create(Some(&staff()), input("A", &[]))
            .await
            .unwrap()
            .article
            .id;

        let errors = vec![
            f.service.create(None, input("B", &[])).await.unwrap_err(),
            f.service.update(None, id, input("C", &[])).await.unwrap_err(),
            f.service
                .set_status(None, id, PublishStatus::Published)
                .await
                .unwrap_err(),
            f.service.delete(None, id).await.unwrap_err(),
            f.service.get(None, id).await.unwrap_err(),
            f.service.list_all(None, None).await.unwrap_err(),
            f.service.list_tags(None).await.unwrap_err(),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(f.articles.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let f = fixture();
        let mut bad = input("A", &[]);
        bad.content.en = String::new();
        let err = f.service.create(Some(&staff()), bad).await.unwrap_err();
        assert!(matches!(err, PublishingError::Validation(ref v) if v.field == "content.en"));

        let too_many: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"];
        let err = f
            .service
            .create(Some(&staff()), input("A", &too_many))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
