//! # CMS-03: News Publishing Subsystem
//!
//! Bilingual news articles with tags and a three-state publication
//! lifecycle (`draft`, `published`, `unpublished`).
//!
//! ## Architecture
//!
//! - **Domain**: `NewsArticle`, `Tag`, `PublicationState`, slugs
//! - **Ports**: Inbound (`NewsApi`) and Outbound (`ArticleStore`, `TagStore`)
//! - **Adapters**: in-memory and SQLite stores
//! - **Application**: `NewsService`
//!
//! ## Visibility
//!
//! Anonymous callers only ever see `published` articles; every other state
//! reads as not found. Staff see all states.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryArticleStore, InMemoryTagStore, SqliteArticleStore, SqliteTagStore};
pub use application::service::NewsService;
pub use config::{ConfigError as PublishingConfigError, PublishingConfig};
pub use domain::entities::*;
pub use domain::errors::{NewsStoreError, PublishingError};
pub use domain::status::{PublicationState, PublishStatus, TransitionError};
pub use ports::inbound::NewsApi;
pub use ports::outbound::{ArticleStore, TagStore};
