//! In-memory article and tag stores.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::RecordId;
use std::collections::HashMap;

use crate::domain::entities::{NewsArticle, Tag};
use crate::domain::errors::NewsStoreError;
use crate::domain::status::PublishStatus;
use crate::ports::outbound::{ArticleStore, TagStore};

/// In-memory implementation of [`ArticleStore`].
#[derive(Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<HashMap<RecordId, NewsArticle>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_held_by_other(
    articles: &HashMap<RecordId, NewsArticle>,
    slug: &str,
    except: Option<RecordId>,
) -> bool {
    articles
        .values()
        .any(|a| a.slug == slug && Some(a.id) != except)
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn insert(&self, article: &NewsArticle) -> Result<(), NewsStoreError> {
        let mut articles = self.articles.write();
        if slug_held_by_other(&articles, &article.slug, None) {
            return Err(NewsStoreError::SlugTaken(article.slug.clone()));
        }
        articles.insert(article.id, article.clone());
        Ok(())
    }

    async fn save(&self, article: &NewsArticle) -> Result<(), NewsStoreError> {
        let mut articles = self.articles.write();
        if !articles.contains_key(&article.id) {
            return Err(NewsStoreError::NotFound { id: article.id });
        }
        if slug_held_by_other(&articles, &article.slug, Some(article.id)) {
            return Err(NewsStoreError::SlugTaken(article.slug.clone()));
        }
        articles.insert(article.id, article.clone());
        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<NewsArticle>, NewsStoreError> {
        Ok(self.articles.read().get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsArticle>, NewsStoreError> {
        Ok(self
            .articles
            .read()
            .values()
            .find(|a| a.slug == slug)
            .cloned())
    }

    async fn slug_exists(
        &self,
        slug: &str,
        except: Option<RecordId>,
    ) -> Result<bool, NewsStoreError> {
        Ok(slug_held_by_other(&self.articles.read(), slug, except))
    }

    async fn list(&self, status: Option<PublishStatus>) -> Result<Vec<NewsArticle>, NewsStoreError> {
        Ok(self
            .articles
            .read()
            .values()
            .filter(|a| status.map(|s| a.status() == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: RecordId) -> Result<Option<NewsArticle>, NewsStoreError> {
        Ok(self.articles.write().remove(&id))
    }
}

/// In-memory implementation of [`TagStore`].
#[derive(Default)]
pub struct InMemoryTagStore {
    tags: RwLock<HashMap<RecordId, Tag>>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, NewsStoreError> {
        Ok(self.tags.read().values().find(|t| t.slug == slug).cloned())
    }

    async fn insert(&self, tag: &Tag) -> Result<(), NewsStoreError> {
        let mut tags = self.tags.write();
        if tags.values().any(|t| t.slug == tag.slug) {
            return Err(NewsStoreError::SlugTaken(tag.slug.clone()));
        }
        tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<Tag>, NewsStoreError> {
        let tags = self.tags.read();
        Ok(ids.iter().filter_map(|id| tags.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Tag>, NewsStoreError> {
        let mut tags: Vec<Tag> = self.tags.read().values().cloned().collect();
        tags.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(tags)
    }
}
