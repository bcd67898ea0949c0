//! SQLite bootstrap for the local todo cache.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteTodoCache`.
//! - Apply cache schema migrations before handing out a connection.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Cache reads/writes never happen before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, MEMORY_LOCATION};

pub type DbResult<T> = Result<T, DbError>;

/// Error for cache database bootstrap and queries.
#[derive(Debug)]
pub enum DbError {
    /// The cache database at `location` could not be opened or created.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// The cache file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable code used in `db_open` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "cache_open_failed",
            Self::UnsupportedSchemaVersion { .. } => "cache_schema_too_new",
            Self::Sqlite(_) => "cache_sqlite_error",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open todo cache at `{location}`: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "todo cache schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "todo cache query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
