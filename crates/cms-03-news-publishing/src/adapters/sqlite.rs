//! SQLite article and tag stores.
//!
//! Articles are stored as a JSON document next to the columns that are
//! queried or constrained (`slug UNIQUE`, `status`). Both stores share the
//! process-wide connection opened by the runtime.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use shared_types::RecordId;
use std::sync::Arc;

use crate::domain::entities::{NewsArticle, Tag};
use crate::domain::errors::NewsStoreError;
use crate::domain::status::PublishStatus;
use crate::ports::outbound::{ArticleStore, TagStore};

fn backend(e: rusqlite::Error) -> NewsStoreError {
    NewsStoreError::Backend(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error, column: &str) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, msg) => {
            err.code == ErrorCode::ConstraintViolation
                && msg.as_deref().map(|m| m.contains(column)).unwrap_or(false)
        }
        _ => false,
    }
}

fn decode_article(document: String) -> Result<NewsArticle, NewsStoreError> {
    serde_json::from_str(&document).map_err(|e| NewsStoreError::Serialization(e.to_string()))
}

fn encode_article(article: &NewsArticle) -> Result<String, NewsStoreError> {
    serde_json::to_string(article).map_err(|e| NewsStoreError::Serialization(e.to_string()))
}

/// SQLite-backed [`ArticleStore`].
#[derive(Clone)]
pub struct SqliteArticleStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteArticleStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Result<Self, NewsStoreError> {
        conn.lock()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS news_articles (
                    id TEXT PRIMARY KEY,
                    slug TEXT NOT NULL UNIQUE,
                    status TEXT NOT NULL,
                    document TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_news_articles_status
                    ON news_articles(status);",
            )
            .map_err(backend)?;
        Ok(Self { conn })
    }

    /// Create a store on a private in-memory database (for testing)
    pub fn in_memory() -> Result<Self, NewsStoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::new(Arc::new(Mutex::new(conn)))
    }

    fn map_write_error(article: &NewsArticle, e: rusqlite::Error) -> NewsStoreError {
        if is_unique_violation(&e, "slug") {
            NewsStoreError::SlugTaken(article.slug.clone())
        } else {
            backend(e)
        }
    }
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn insert(&self, article: &NewsArticle) -> Result<(), NewsStoreError> {
        let document = encode_article(article)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO news_articles (id, slug, status, document, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                article.id.to_string(),
                article.slug,
                article.status().as_str(),
                document,
                article.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| Self::map_write_error(article, e))?;
        Ok(())
    }

    async fn save(&self, article: &NewsArticle) -> Result<(), NewsStoreError> {
        let document = encode_article(article)?;
        let conn = self.conn.lock();
        let changed = conn
            .execute(
                "UPDATE news_articles
                 SET slug = ?2, status = ?3, document = ?4, updated_at = ?5
                 WHERE id = ?1",
                params![
                    article.id.to_string(),
                    article.slug,
                    article.status().as_str(),
                    document,
                    article.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| Self::map_write_error(article, e))?;
        if changed == 0 {
            return Err(NewsStoreError::NotFound { id: article.id });
        }
        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<NewsArticle>, NewsStoreError> {
        let conn = self.conn.lock();
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM news_articles WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        document.map(decode_article).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsArticle>, NewsStoreError> {
        let conn = self.conn.lock();
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM news_articles WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        document.map(decode_article).transpose()
    }

    async fn slug_exists(
        &self,
        slug: &str,
        except: Option<RecordId>,
    ) -> Result<bool, NewsStoreError> {
        let conn = self.conn.lock();
        let except = except.map(|id| id.to_string()).unwrap_or_default();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM news_articles WHERE slug = ?1 AND id != ?2",
                params![slug, except],
                |row| row.get(0),
            )
            .map_err(backend)?;
        Ok(count > 0)
    }

    async fn list(&self, status: Option<PublishStatus>) -> Result<Vec<NewsArticle>, NewsStoreError> {
        let conn = self.conn.lock();
        let documents = match status {
            Some(status) => {
                let mut stmt = conn
                    .prepare("SELECT document FROM news_articles WHERE status = ?1")
                    .map_err(backend)?;
                let rows = stmt
                    .query_map(params![status.as_str()], |row| row.get::<_, String>(0))
                    .map_err(backend)?
                    .collect::<rusqlite::Result<Vec<String>>>()
                    .map_err(backend)?;
                rows
            }
            None => {
                let mut stmt = conn
                    .prepare("SELECT document FROM news_articles")
                    .map_err(backend)?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(backend)?
                    .collect::<rusqlite::Result<Vec<String>>>()
                    .map_err(backend)?;
                rows
            }
        };
        documents.into_iter().map(decode_article).collect()
    }

    async fn delete(&self, id: RecordId) -> Result<Option<NewsArticle>, NewsStoreError> {
        let conn = self.conn.lock();
        let document: Option<String> = conn
            .query_row(
                "DELETE FROM news_articles WHERE id = ?1 RETURNING document",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        document.map(decode_article).transpose()
    }
}

/// SQLite-backed [`TagStore`].
#[derive(Clone)]
pub struct SqliteTagStore {
    conn: Arc<Mutex<Connection>>,
}

type TagRow = (String, String, String, String);

fn decode_tag(row: TagRow) -> Result<Tag, NewsStoreError> {
    let (id, name, slug, created_at) = row;
    Ok(Tag {
        id: id
            .parse()
            .map_err(|e| NewsStoreError::Serialization(format!("bad id {}: {}", id, e)))?,
        name,
        slug,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| NewsStoreError::Serialization(e.to_string()))?,
    })
}

fn read_tag(row: &rusqlite::Row<'_>) -> rusqlite::Result<TagRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

impl SqliteTagStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Result<Self, NewsStoreError> {
        conn.lock()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS news_tags (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    slug TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL
                );",
            )
            .map_err(backend)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl TagStore for SqliteTagStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, NewsStoreError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT id, name, slug, created_at FROM news_tags WHERE slug = ?1",
                params![slug],
                read_tag,
            )
            .optional()
            .map_err(backend)?;
        row.map(decode_tag).transpose()
    }

    async fn insert(&self, tag: &Tag) -> Result<(), NewsStoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO news_tags (id, name, slug, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                tag.id.to_string(),
                tag.name,
                tag.slug,
                tag.created_at.to_rfc3339()
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e, "slug") {
                NewsStoreError::SlugTaken(tag.slug.clone())
            } else {
                backend(e)
            }
        })?;
        Ok(())
    }

    async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<Tag>, NewsStoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, slug, created_at FROM news_tags WHERE id = ?1")
            .map_err(backend)?;
        let mut tags = Vec::with_capacity(ids.len());
        for id in ids {
            let row = stmt
                .query_row(params![id.to_string()], read_tag)
                .optional()
                .map_err(backend)?;
            if let Some(row) = row {
                tags.push(decode_tag(row)?);
            }
        }
        Ok(tags)
    }

    async fn list(&self) -> Result<Vec<Tag>, NewsStoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, slug, created_at FROM news_tags ORDER BY name COLLATE NOCASE")
            .map_err(backend)?;
        let rows = stmt
            .query_map([], read_tag)
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<TagRow>>>()
            .map_err(backend)?;
        rows.into_iter().map(decode_tag).collect()
    }
}
