//! Field catalogue and tagged field values.
//!
//! # Responsibility
//! - Name every `TodoItem` field by its stable local key.
//! - Provide the tagged value shape shared by the local codec and the cloud
//!   attribute set.
//!
//! # Invariants
//! - Local keys are part of the persisted blob layout and must never change.
//! - `FieldValue` carries its own type tag so decoders can reject mismatches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Generic tagged-field container keyed by local or remote key.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One field of a `TodoItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TodoField {
    Id,
    Title,
    Priority,
    IsDone,
    CreationDate,
    LastModified,
}

impl TodoField {
    /// Every field in declaration order.
    pub const ALL: [TodoField; 6] = [
        TodoField::Id,
        TodoField::Title,
        TodoField::Priority,
        TodoField::IsDone,
        TodoField::CreationDate,
        TodoField::LastModified,
    ];

    /// Stable local key used in the cache blob and as the identity cloud key.
    pub fn local_key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::IsDone => "isDone",
            Self::CreationDate => "creationDate",
            Self::LastModified => "lastModified",
        }
    }

    pub fn from_local_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.local_key() == key)
    }
}

impl Display for TodoField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.local_key())
    }
}

/// Tagged scalar value.
///
/// Serialized as `{"type": "...", "value": ...}` so the stored type survives
/// a round trip through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    /// Unix epoch milliseconds.
    Timestamp(i64),
    Null,
}

impl FieldValue {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Bool(_) => "bool",
            Self::Timestamp(_) => "timestamp",
            Self::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
