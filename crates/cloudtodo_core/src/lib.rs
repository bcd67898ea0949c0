//! Core todo model for cloudtodo.
//!
//! One `TodoItem` record with three projections: in-memory state, a versioned
//! local cache blob, and the attribute set of a cloud record.

pub mod cloud;
pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod store;

pub use cloud::{
    CloudSchema, CloudValueConverter, KeyMapping, PassthroughConverter, RemoteRecord,
    RemoteRecordError,
};
pub use codec::{DecodeError, DecodeResult, EncodeError, CURRENT_VERSION};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::field::{FieldMap, FieldValue, TodoField};
pub use model::todo::{
    EpochMillis, FieldValueError, ResetFieldError, TodoId, TodoItem, TodoPriority,
    TodoValidationError,
};
pub use store::todo_cache::{CacheError, CacheResult, SqliteTodoCache, TodoCache};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
