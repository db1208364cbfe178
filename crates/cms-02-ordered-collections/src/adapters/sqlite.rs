//! SQLite record store.
//!
//! One table per collection:
//!
//! ```sql
//! id TEXT PRIMARY KEY,
//! order_index INTEGER NOT NULL UNIQUE,
//! payload TEXT NOT NULL,      -- JSON
//! created_at TEXT NOT NULL,   -- RFC 3339
//! updated_at TEXT NOT NULL
//! ```
//!
//! `apply_order` and `delete_and_compact` each run in a single
//! transaction. Renumbering first moves every assigned row to a negative
//! index and then to its target, so the unique index never sees two rows
//! on one position mid-update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};
use shared_types::{RecordId, Timestamp};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::{
    CollectionKind, OrderAssignment, OrderIndex, OrderedRecord, Removal,
};
use crate::domain::errors::StoreError;
use crate::domain::ordering::{moved_assignments, plan_compaction};
use crate::domain::payloads::OrderedPayload;
use crate::ports::outbound::RecordStore;

/// Shared SQLite connection for every store in the process.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(backend)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(backend)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// The underlying connection, for adapters of other subsystems.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// Store for one payload type, creating its table if needed.
    pub fn record_store<P: OrderedPayload>(&self) -> Result<SqliteRecordStore<P>, StoreError> {
        let store = SqliteRecordStore {
            conn: Arc::clone(&self.conn),
            kind: P::KIND,
            _payload: PhantomData,
        };
        store.init_schema()?;
        Ok(store)
    }
}

/// SQLite-backed [`RecordStore`].
pub struct SqliteRecordStore<P> {
    conn: Arc<Mutex<Connection>>,
    kind: CollectionKind,
    _payload: PhantomData<fn() -> P>,
}

impl<P> SqliteRecordStore<P> {
    fn table(&self) -> &'static str {
        self.kind.table_name()
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                order_index INTEGER NOT NULL UNIQUE,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
            table = self.table()
        ))
        .map_err(backend)
    }
}

/// Raw column values before decoding.
type RawRow = (String, i64, String, String, String);

fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn decode<P: OrderedPayload>(raw: RawRow) -> Result<OrderedRecord<P>, StoreError> {
    let (id, order_index, payload, created_at, updated_at) = raw;
    Ok(OrderedRecord {
        id: id
            .parse()
            .map_err(|e| StoreError::Serialization(format!("bad id {}: {}", id, e)))?,
        order_index: OrderIndex::try_from(order_index)
            .map_err(|_| StoreError::Serialization(format!("bad order_index {}", order_index)))?,
        payload: serde_json::from_str(&payload)
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<Timestamp, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("bad timestamp {}: {}", raw, e)))
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn is_order_index_conflict(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, msg) => {
            err.code == ErrorCode::ConstraintViolation
                && msg
                    .as_deref()
                    .map(|m| m.contains("order_index"))
                    .unwrap_or(false)
        }
        _ => false,
    }
}

#[async_trait]
impl<P: OrderedPayload> RecordStore<P> for SqliteRecordStore<P> {
    async fn list_ordered(&self) -> Result<Vec<OrderedRecord<P>>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, order_index, payload, created_at, updated_at
                 FROM {} ORDER BY order_index ASC",
                self.table()
            ))
            .map_err(backend)?;
        let rows = stmt
            .query_map([], read_raw)
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<RawRow>>>()
            .map_err(backend)?;
        rows.into_iter().map(decode).collect()
    }

    async fn get(&self, id: RecordId) -> Result<Option<OrderedRecord<P>>, StoreError> {
        let conn = self.conn.lock();
        let raw = conn
            .query_row(
                &format!(
                    "SELECT id, order_index, payload, created_at, updated_at
                     FROM {} WHERE id = ?1",
                    self.table()
                ),
                params![id.to_string()],
                read_raw,
            )
            .optional()
            .map_err(backend)?;
        raw.map(decode).transpose()
    }

    async fn max_order_index(&self) -> Result<Option<OrderIndex>, StoreError> {
        let conn = self.conn.lock();
        let max: Option<i64> = conn
            .query_row(
                &format!("SELECT MAX(order_index) FROM {}", self.table()),
                [],
                |row| row.get(0),
            )
            .map_err(backend)?;
        max.map(|m| {
            OrderIndex::try_from(m)
                .map_err(|_| StoreError::Serialization(format!("bad order_index {}", m)))
        })
        .transpose()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table()), [], |row| {
                row.get(0)
            })
            .map_err(backend)?;
        Ok(count as usize)
    }

    async fn insert(&self, record: &OrderedRecord<P>) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&record.payload)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO {} (id, order_index, payload, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                self.table()
            ),
            params![
                record.id.to_string(),
                record.order_index as i64,
                payload,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| {
            if is_order_index_conflict(&e) {
                StoreError::OrderIndexTaken {
                    index: record.order_index,
                }
            } else {
                backend(e)
            }
        })?;
        Ok(())
    }

    async fn update_payload(
        &self,
        id: RecordId,
        payload: &P,
        updated_at: Timestamp,
    ) -> Result<OrderedRecord<P>, StoreError> {
        let encoded =
            serde_json::to_string(payload).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let conn = self.conn.lock();
        let changed = conn
            .execute(
                &format!(
                    "UPDATE {} SET payload = ?1, updated_at = ?2 WHERE id = ?3",
                    self.table()
                ),
                params![encoded, updated_at.to_rfc3339(), id.to_string()],
            )
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound { id });
        }

        let raw = conn
            .query_row(
                &format!(
                    "SELECT id, order_index, payload, created_at, updated_at
                     FROM {} WHERE id = ?1",
                    self.table()
                ),
                params![id.to_string()],
                read_raw,
            )
            .map_err(backend)?;
        decode(raw)
    }

    async fn delete_and_compact(&self, id: RecordId) -> Result<Option<Removal<P>>, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(backend)?;

        let raw = tx
            .query_row(
                &format!(
                    "DELETE FROM {} WHERE id = ?1
                     RETURNING id, order_index, payload, created_at, updated_at",
                    self.table()
                ),
                params![id.to_string()],
                read_raw,
            )
            .optional()
            .map_err(backend)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let record = decode(raw)?;

        let survivors = {
            let mut stmt = tx
                .prepare(&format!(
                    "SELECT id, order_index FROM {} ORDER BY order_index ASC",
                    self.table()
                ))
                .map_err(backend)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
                .map_err(backend)?
                .collect::<rusqlite::Result<Vec<(String, i64)>>>()
                .map_err(backend)?;
            rows.into_iter()
                .map(|(id, index)| decode_position(&id, index))
                .collect::<Result<Vec<(RecordId, OrderIndex)>, StoreError>>()?
        };

        let moved = moved_assignments(&survivors, plan_compaction(&survivors));
        write_assignments(&tx, self.table(), &moved)?;
        tx.commit().map_err(backend)?;

        Ok(Some(Removal {
            record,
            reindexed: moved.len(),
        }))
    }

    async fn apply_order(&self, assignments: &[OrderAssignment]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(backend)?;
        write_assignments(&tx, self.table(), assignments)?;
        tx.commit().map_err(backend)
    }
}

fn decode_position(id: &str, index: i64) -> Result<(RecordId, OrderIndex), StoreError> {
    let id = id
        .parse()
        .map_err(|e| StoreError::Serialization(format!("bad id {}: {}", id, e)))?;
    let index = OrderIndex::try_from(index)
        .map_err(|_| StoreError::Serialization(format!("bad order_index {}", index)))?;
    Ok((id, index))
}

/// Park every assigned row on a negative index, then move it to its target.
/// The caller owns the transaction and decides whether to commit.
fn write_assignments(
    tx: &Transaction<'_>,
    table: &str,
    assignments: &[OrderAssignment],
) -> Result<(), StoreError> {
    let mut park = tx
        .prepare(&format!("UPDATE {} SET order_index = ?1 WHERE id = ?2", table))
        .map_err(backend)?;

    for (i, a) in assignments.iter().enumerate() {
        let changed = park
            .execute(params![-(i as i64) - 1, a.id.to_string()])
            .map_err(backend)?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: a.id });
        }
    }

    for a in assignments {
        park.execute(params![a.order_index as i64, a.id.to_string()])
            .map_err(|e| {
                if is_order_index_conflict(&e) {
                    StoreError::OrderIndexTaken {
                        index: a.order_index,
                    }
                } else {
                    backend(e)
                }
            })?;
    }
    Ok(())
}
