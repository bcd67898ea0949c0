//! Cloud record conversion for todo items.
//!
//! # Responsibility
//! - Hydrate todo items from remote records and build records for upload.
//! - Route every attribute through the schema's key mapping and converter.
//!
//! # Invariants
//! - Records whose type differs from the schema's are never hydrated.
//! - The record name is the todo id; `id` is never read from attributes.
//! - Unrecognized remote keys are ignored during hydration.
//!
//! The sync transport and conflict resolution live outside this crate.

pub mod record;
pub mod schema;

use crate::model::field::{FieldMap, FieldValue, TodoField};
use crate::model::todo::{FieldValueError, TodoId, TodoItem, TodoValidationError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use record::RemoteRecord;
pub use schema::{CloudSchema, CloudValueConverter, KeyMapping, PassthroughConverter};

/// Error for remote record conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRecordError {
    UnexpectedRecordType { expected: String, found: String },
    InvalidRecordName(TodoValidationError),
    UnknownKey(String),
    /// `id` comes from the record name and cannot be set as an attribute.
    ReadOnlyKey(String),
    Field { key: String, source: FieldValueError },
}

impl Display for RemoteRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedRecordType { expected, found } => {
                write!(f, "expected `{expected}` record, got `{found}`")
            }
            Self::InvalidRecordName(err) => write!(f, "invalid record name: {err}"),
            Self::UnknownKey(key) => write!(f, "unknown cloud key `{key}`"),
            Self::ReadOnlyKey(key) => write!(f, "cloud key `{key}` is read-only"),
            Self::Field { key, source } => write!(f, "cloud key `{key}`: {source}"),
        }
    }
}

impl Error for RemoteRecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecordName(err) => Some(err),
            Self::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl TodoItem {
    /// Hydrates a todo from a remote record.
    ///
    /// Returns `None` for a record of another type, a blank record name, or an
    /// attribute holding a wrong-typed or out-of-range value. Absent and null
    /// attributes never cause `None`.
    /// Debug builds assert on a record type mismatch, which is caller misuse.
    pub fn from_remote_record(record: &RemoteRecord, schema: &CloudSchema) -> Option<Self> {
        debug_assert!(
            record.record_type == schema.record_type,
            "attempting to create todo from non-{} record",
            schema.record_type
        );

        match Self::try_from_remote_record(record, schema) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(
                    "event=todo_from_record module=cloud status=error record_type={} error={}",
                    record.record_type, err
                );
                None
            }
        }
    }

    /// Hydrates a todo from a remote record, reporting why it failed.
    ///
    /// # Errors
    /// - `UnexpectedRecordType` when the record type differs from the schema's.
    /// - `InvalidRecordName` when the record name is blank.
    /// - `Field` when an attribute has the wrong type or an invalid value.
    ///
    /// A null attribute is skipped like an absent one, except for fields that
    /// define a cleared state (`title`, `priority`, `isDone`).
    pub fn try_from_remote_record(
        record: &RemoteRecord,
        schema: &CloudSchema,
    ) -> Result<Self, RemoteRecordError> {
        if record.record_type != schema.record_type {
            return Err(RemoteRecordError::UnexpectedRecordType {
                expected: schema.record_type.clone(),
                found: record.record_type.clone(),
            });
        }

        let id = TodoId::new(record.record_name.as_str())
            .map_err(RemoteRecordError::InvalidRecordName)?;
        let mut item = Self::with_id(id);
        item.original_cloud_values = Some(FieldMap::new());

        for key in schema.cloud_keys() {
            let Some(value) = record.get(key) else {
                continue;
            };
            let clears = schema
                .mapping
                .field_for_remote_key(key)
                .is_some_and(has_cleared_state);
            if value.is_null() && !clears {
                continue;
            }
            item.set_from_cloud_value(value.clone(), key, schema)?;
        }

        debug!(
            "event=todo_from_record module=cloud status=ok id={} attributes={}",
            item.id(),
            item.original_cloud_values.as_ref().map_or(0, FieldMap::len)
        );
        Ok(item)
    }

    /// Builds a record for upload with every attribute under its remote key.
    pub fn to_remote_record(&self, schema: &CloudSchema) -> RemoteRecord {
        let mut record = RemoteRecord::new(schema.record_type.as_str(), self.id().as_str());
        for key in schema.cloud_keys() {
            if let Some(value) = self.cloud_value_for_key(key, schema) {
                record.set(key, value);
            }
        }
        record
    }

    /// Returns the remote attribute value for `key`, or `None` for unknown keys.
    pub fn cloud_value_for_key(&self, key: &str, schema: &CloudSchema) -> Option<FieldValue> {
        let field = schema.mapping.field_for_remote_key(key)?;
        Some(schema.converter.to_cloud(field, self.local_value(field)))
    }

    /// Writes a remote attribute value into the mapped local field.
    ///
    /// For items hydrated from the cloud, the value also becomes the new
    /// original for `key`, so it is not reported by `changed_cloud_keys`.
    pub fn set_from_cloud_value(
        &mut self,
        value: FieldValue,
        key: &str,
        schema: &CloudSchema,
    ) -> Result<(), RemoteRecordError> {
        let field = schema
            .mapping
            .field_for_remote_key(key)
            .ok_or_else(|| RemoteRecordError::UnknownKey(key.to_string()))?;
        if field == TodoField::Id {
            return Err(RemoteRecordError::ReadOnlyKey(key.to_string()));
        }

        let local = schema.converter.from_cloud(field, value.clone());
        self.apply_local_value(field, local)
            .map_err(|source| RemoteRecordError::Field {
                key: key.to_string(),
                source,
            })?;

        if let Some(originals) = self.original_cloud_values.as_mut() {
            originals.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Remote attribute values this item was hydrated from.
    ///
    /// `None` for items that did not come from the cloud.
    pub fn original_cloud_values(&self) -> Option<&FieldMap> {
        self.original_cloud_values.as_ref()
    }

    /// Remote keys whose current value differs from the hydrated original.
    ///
    /// Every cloud key counts as changed for items without originals.
    pub fn changed_cloud_keys(&self, schema: &CloudSchema) -> Vec<String> {
        schema
            .cloud_keys()
            .into_iter()
            .filter(|key| {
                let current = self.cloud_value_for_key(key, schema);
                match &self.original_cloud_values {
                    Some(originals) => originals.get(*key) != current.as_ref(),
                    None => true,
                }
            })
            .map(str::to_string)
            .collect()
    }
}

/// Fields where a null cloud value is a meaningful clear rather than a gap.
fn has_cleared_state(field: TodoField) -> bool {
    matches!(
        field,
        TodoField::Title | TodoField::Priority | TodoField::IsDone
    )
}
