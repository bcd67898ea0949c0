//! Todo item domain model.
//!
//! # Responsibility
//! - Define the canonical todo record shared by the local cache and cloud sync.
//! - Provide generic field access with explicit default-value recovery.
//!
//! # Invariants
//! - `id` is never empty and never reassigned after construction.
//! - `priority` is always one of the three declared values.
//! - `last_modified` is refreshed by callers (`touch`), not by field writes.
//!
//! A `TodoItem` has no internal locking; mutation goes through `&mut self`.

use crate::model::field::{FieldMap, FieldValue, TodoField};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Unix epoch milliseconds.
pub type EpochMillis = i64;

/// Defaults applied when a field is cleared through the generic setter.
const RESET_DEFAULTS: &[(TodoField, FieldValue)] = &[
    (TodoField::Priority, FieldValue::Integer(0)),
    (TodoField::IsDone, FieldValue::Bool(false)),
];

/// Stable todo identifier, used as cache key and cloud record name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps a caller-provided identifier.
    ///
    /// # Errors
    /// - Returns `TodoValidationError::EmptyId` for empty or blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, TodoValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    /// Generates a fresh globally unique identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Todo priority with stable persisted ordinals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TodoPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl TodoPriority {
    /// Persisted ordinal: `Low = -1`, `Normal = 0`, `High = 1`.
    pub fn ordinal(self) -> i64 {
        match self {
            Self::Low => -1,
            Self::Normal => 0,
            Self::High => 1,
        }
    }

    pub fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            -1 => Some(Self::Low),
            0 => Some(Self::Normal),
            1 => Some(Self::High),
            _ => None,
        }
    }
}

/// Identity validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyId,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "todo id must not be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// Returned when a field has no declared default to recover to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetFieldError {
    pub field: TodoField,
}

impl Display for ResetFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "field `{}` cannot be reset to a default value", self.field)
    }
}

impl Error for ResetFieldError {}

/// Error for generic field writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValueError {
    /// `id` is fixed at construction.
    ImmutableField(TodoField),
    WrongType {
        field: TodoField,
        expected: &'static str,
        found: &'static str,
    },
    InvalidPriority(i64),
    Reset(ResetFieldError),
}

impl Display for FieldValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImmutableField(field) => write!(f, "field `{field}` is immutable"),
            Self::WrongType {
                field,
                expected,
                found,
            } => write!(f, "field `{field}` expects {expected}, got {found}"),
            Self::InvalidPriority(value) => write!(f, "invalid priority ordinal {value}"),
            Self::Reset(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FieldValueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResetFieldError> for FieldValueError {
    fn from(value: ResetFieldError) -> Self {
        Self::Reset(value)
    }
}

/// Canonical todo record.
///
/// `Clone` is the copy operation: all fields are value-copied and the id is
/// kept, so a clone names the same todo.
#[derive(Debug, Clone)]
pub struct TodoItem {
    id: TodoId,
    pub title: Option<String>,
    pub priority: TodoPriority,
    pub is_done: bool,
    pub creation_date: EpochMillis,
    pub last_modified: EpochMillis,
    /// Remote attribute values this item was hydrated from, keyed by remote key.
    pub(crate) original_cloud_values: Option<FieldMap>,
}

// Equality covers data fields only; original cloud values are sync bookkeeping.
impl PartialEq for TodoItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.priority == other.priority
            && self.is_done == other.is_done
            && self.creation_date == other.creation_date
            && self.last_modified == other.last_modified
    }
}

impl Eq for TodoItem {}

impl TodoItem {
    /// Creates a todo with the given id, or a freshly generated one.
    ///
    /// # Invariants
    /// - `creation_date == last_modified == now`.
    /// - `priority` starts as `Normal`, `is_done` as `false`, `title` as `None`.
    pub fn create(id: Option<TodoId>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.unwrap_or_else(TodoId::generate),
            title: None,
            priority: TodoPriority::Normal,
            is_done: false,
            creation_date: now,
            last_modified: now,
            original_cloud_values: None,
        }
    }

    /// Creates a todo with a generated id.
    pub fn new() -> Self {
        Self::create(None)
    }

    /// Creates a todo with a caller-provided id.
    ///
    /// Used by import/sync paths where identity already exists externally.
    pub fn with_id(id: TodoId) -> Self {
        Self::create(Some(id))
    }

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    /// Refreshes `last_modified` to the current time.
    pub fn touch(&mut self) {
        self.last_modified = now_epoch_ms();
    }

    /// Debug description: `Todo: <title or '<No Title>'>(UUID: <id>)`.
    pub fn describe(&self) -> String {
        format!(
            "Todo: {}(UUID: {})",
            self.title.as_deref().unwrap_or("<No Title>"),
            self.id
        )
    }

    /// Returns the current value of one field.
    pub fn local_value(&self, field: TodoField) -> FieldValue {
        match field {
            TodoField::Id => FieldValue::Text(self.id.as_str().to_string()),
            TodoField::Title => self
                .title
                .clone()
                .map_or(FieldValue::Null, FieldValue::Text),
            TodoField::Priority => FieldValue::Integer(self.priority.ordinal()),
            TodoField::IsDone => FieldValue::Bool(self.is_done),
            TodoField::CreationDate => FieldValue::Timestamp(self.creation_date),
            TodoField::LastModified => FieldValue::Timestamp(self.last_modified),
        }
    }

    /// Writes one field through the generic setter.
    ///
    /// `FieldValue::Null` clears the field: `title` becomes `None`, fields with
    /// a declared default are reset, anything else is rejected.
    ///
    /// # Errors
    /// - `ImmutableField` for `id`.
    /// - `WrongType` when the value tag does not match the field.
    /// - `InvalidPriority` for an unknown priority ordinal.
    /// - `Reset` when clearing a field without a default.
    pub fn apply_local_value(
        &mut self,
        field: TodoField,
        value: FieldValue,
    ) -> Result<(), FieldValueError> {
        if field == TodoField::Id {
            return Err(FieldValueError::ImmutableField(field));
        }

        match (field, value) {
            (TodoField::Title, FieldValue::Text(title)) => self.title = Some(title),
            (TodoField::Title, FieldValue::Null) => self.title = None,
            (_, FieldValue::Null) => self.reset_field(field)?,
            (TodoField::Priority, FieldValue::Integer(ordinal)) => {
                self.priority = TodoPriority::from_ordinal(ordinal)
                    .ok_or(FieldValueError::InvalidPriority(ordinal))?;
            }
            (TodoField::IsDone, FieldValue::Bool(done)) => self.is_done = done,
            (TodoField::CreationDate, FieldValue::Timestamp(ms)) => self.creation_date = ms,
            (TodoField::LastModified, FieldValue::Timestamp(ms)) => self.last_modified = ms,
            (field, other) => {
                return Err(FieldValueError::WrongType {
                    field,
                    expected: expected_type(field),
                    found: other.type_name(),
                });
            }
        }

        Ok(())
    }

    /// Resets a field to its declared default.
    ///
    /// Only `priority` (-> `Normal`) and `is_done` (-> `false`) have defaults.
    pub fn reset_field(&mut self, field: TodoField) -> Result<(), ResetFieldError> {
        let Some((_, default)) = RESET_DEFAULTS.iter().find(|(known, _)| *known == field) else {
            return Err(ResetFieldError { field });
        };

        self.apply_local_value(field, default.clone())
            .map_err(|_| ResetFieldError { field })
    }
}

impl Default for TodoItem {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TodoItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Type name a field accepts through the generic setter.
fn expected_type(field: TodoField) -> &'static str {
    match field {
        TodoField::Id | TodoField::Title => "text",
        TodoField::Priority => "integer",
        TodoField::IsDone => "bool",
        TodoField::CreationDate | TodoField::LastModified => "timestamp",
    }
}

/// Current wall-clock time in epoch milliseconds; `0` if the clock is before 1970.
pub fn now_epoch_ms() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as EpochMillis)
}
