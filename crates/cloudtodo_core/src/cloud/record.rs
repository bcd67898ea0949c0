//! Remote record shape exchanged with the cloud sync service.

use crate::model::field::{FieldMap, FieldValue};

/// One typed record from the cloud record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Record type, e.g. `todo`.
    pub record_type: String,
    /// Unique record name; doubles as the todo id.
    pub record_name: String,
    /// Attribute set keyed by remote key.
    pub fields: FieldMap,
}

impl RemoteRecord {
    pub fn new(record_type: impl Into<String>, record_name: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            record_name: record_name.into(),
            fields: FieldMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }
}
