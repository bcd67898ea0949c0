//! Todo cache contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist opaque `TodoItem::encode` blobs keyed by todo id.
//! - Rehydrate blobs with `TodoItem::decode`.
//!
//! # Invariants
//! - The store never inspects blob contents beyond decoding them on read.
//! - A blob whose decoded id differs from its key is reported, not masked.

use crate::codec::{DecodeError, EncodeError};
use crate::db::DbError;
use crate::model::todo::{now_epoch_ms, TodoId, TodoItem};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CacheResult<T> = Result<T, CacheError>;

/// Error for cache reads and writes.
#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
    Encode(EncodeError),
    /// Stored blob for `id` could not be decoded.
    Decode { id: String, source: DecodeError },
    InvalidData(String),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::Decode { id, source } => write!(f, "cached todo `{id}` is corrupt: {source}"),
            Self::InvalidData(message) => write!(f, "invalid cached todo data: {message}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<EncodeError> for CacheError {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}

/// Key-value cache of todo items.
pub trait TodoCache {
    /// Inserts or replaces the blob for `item.id()`.
    fn put(&self, item: &TodoItem) -> CacheResult<()>;
    fn get(&self, id: &TodoId) -> CacheResult<Option<TodoItem>>;
    /// Returns whether a row was removed.
    fn remove(&self, id: &TodoId) -> CacheResult<bool>;
    /// Cached ids, most recently written first.
    fn ids(&self) -> CacheResult<Vec<TodoId>>;
}

/// SQLite-backed todo cache over a migrated connection.
pub struct SqliteTodoCache<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoCache<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoCache for SqliteTodoCache<'_> {
    fn put(&self, item: &TodoItem) -> CacheResult<()> {
        let blob = item.encode()?;
        self.conn.execute(
            "INSERT INTO todo_cache (id, blob, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                blob = excluded.blob,
                updated_at = excluded.updated_at;",
            params![item.id().as_str(), blob, now_epoch_ms()],
        )?;

        debug!(
            "event=cache_put module=store status=ok id={} bytes={}",
            item.id(),
            blob.len()
        );
        Ok(())
    }

    fn get(&self, id: &TodoId) -> CacheResult<Option<TodoItem>> {
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT blob FROM todo_cache WHERE id = ?1;",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(blob) = blob else {
            return Ok(None);
        };

        let item = TodoItem::decode(&blob).map_err(|source| {
            error!(
                "event=cache_get module=store status=error id={} error_code=decode_failed error={}",
                id, source
            );
            CacheError::Decode {
                id: id.to_string(),
                source,
            }
        })?;

        if item.id() != id {
            return Err(CacheError::InvalidData(format!(
                "blob stored under `{id}` decodes to id `{}`",
                item.id()
            )));
        }

        Ok(Some(item))
    }

    fn remove(&self, id: &TodoId) -> CacheResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_cache WHERE id = ?1;", [id.as_str()])?;
        Ok(changed > 0)
    }

    fn ids(&self) -> CacheResult<Vec<TodoId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM todo_cache ORDER BY updated_at DESC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();

        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            let id = TodoId::new(value.as_str()).map_err(|err| {
                CacheError::InvalidData(format!("invalid id `{value}` in todo_cache.id: {err}"))
            })?;
            ids.push(id);
        }

        Ok(ids)
    }
}
