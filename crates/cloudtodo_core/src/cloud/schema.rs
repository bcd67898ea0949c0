//! Cloud schema configuration: record type, key mapping and value conversion.
//!
//! # Responsibility
//! - Translate local field keys to remote attribute keys and back.
//! - Provide the value-conversion extension point for remote attributes.
//!
//! # Invariants
//! - Every `TodoField` maps to exactly one remote key.
//! - No two fields share a remote key.

use crate::model::field::{FieldValue, TodoField};
use log::warn;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Record type used for todo records.
pub const TODO_RECORD_TYPE: &str = "todo";

/// Local-key to remote-key table.
///
/// Fields without an override map to their local key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMapping {
    overrides: BTreeMap<TodoField, String>,
}

impl KeyMapping {
    /// Identity mapping for every field.
    pub fn base() -> Self {
        Self::default()
    }

    /// Stock todo mapping: `creationDate -> created`.
    pub fn todo() -> Self {
        Self::base().with_override(TodoField::CreationDate, "created")
    }

    /// Maps `field` to `remote_key`, replacing any earlier override.
    ///
    /// An override that collides with another field's remote key is ignored
    /// so the table stays invertible.
    pub fn with_override(mut self, field: TodoField, remote_key: impl Into<String>) -> Self {
        let remote_key = remote_key.into();
        let collides = TodoField::ALL
            .into_iter()
            .any(|other| other != field && self.remote_key(other) == remote_key);
        if collides {
            warn!(
                "event=key_mapping_override module=cloud status=ignored field={} remote_key={}",
                field,
                remote_key
            );
            return self;
        }
        self.overrides.insert(field, remote_key);
        self
    }

    pub fn remote_key(&self, field: TodoField) -> &str {
        self.overrides
            .get(&field)
            .map_or(field.local_key(), String::as_str)
    }

    pub fn field_for_remote_key(&self, remote_key: &str) -> Option<TodoField> {
        TodoField::ALL
            .into_iter()
            .find(|field| self.remote_key(*field) == remote_key)
    }
}

/// Extension point for per-field value conversion between local and remote form.
///
/// Default methods pass values through unchanged.
pub trait CloudValueConverter: Send + Sync {
    /// Converts a local value into its remote attribute value.
    fn to_cloud(&self, _field: TodoField, value: FieldValue) -> FieldValue {
        value
    }

    /// Converts a remote attribute value into a local value.
    fn from_cloud(&self, _field: TodoField, value: FieldValue) -> FieldValue {
        value
    }
}

/// Identity converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughConverter;

impl CloudValueConverter for PassthroughConverter {}

/// Everything needed to map a `TodoItem` to and from a remote record.
#[derive(Clone)]
pub struct CloudSchema {
    pub record_type: String,
    pub mapping: KeyMapping,
    pub converter: Arc<dyn CloudValueConverter>,
}

impl CloudSchema {
    pub fn new(record_type: impl Into<String>, mapping: KeyMapping) -> Self {
        Self {
            record_type: record_type.into(),
            mapping,
            converter: Arc::new(PassthroughConverter),
        }
    }

    /// Stock schema for `todo` records.
    pub fn todo() -> Self {
        Self::new(TODO_RECORD_TYPE, KeyMapping::todo())
    }

    pub fn with_converter(mut self, converter: Arc<dyn CloudValueConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Remote keys for every field except `id`, in field order.
    pub fn cloud_keys(&self) -> Vec<&str> {
        TodoField::ALL
            .into_iter()
            .filter(|field| *field != TodoField::Id)
            .map(|field| self.mapping.remote_key(field))
            .collect()
    }
}

impl Default for CloudSchema {
    fn default() -> Self {
        Self::todo()
    }
}

impl Debug for CloudSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudSchema")
            .field("record_type", &self.record_type)
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}
