//! Record store adapters
//!
//! - `memory`: `RwLock<HashMap>` store for tests and database-less runs
//! - `sqlite`: one table per collection with a `UNIQUE` order_index

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::{SqliteDatabase, SqliteRecordStore};
