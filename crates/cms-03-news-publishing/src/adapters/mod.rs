//! Article and tag store adapters

pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryArticleStore, InMemoryTagStore};
pub use sqlite::{SqliteArticleStore, SqliteTagStore};
