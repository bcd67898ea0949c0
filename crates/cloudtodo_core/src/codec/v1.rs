//! Version 1 blob layout.
//!
//! Keys: `id`, `title`, `priority`, `isDone`, `creationDate`, `lastModified`.
//! Only `id` is required. Missing values recover to: `title = None`,
//! `priority = Normal`, `isDone = false`, `creationDate = now`,
//! `lastModified = creationDate`.

use super::{DecodeError, DecodeResult};
use crate::model::field::{FieldMap, FieldValue, TodoField};
use crate::model::todo::{now_epoch_ms, TodoId, TodoItem, TodoPriority};

pub(super) fn decode_fields(fields: &FieldMap) -> DecodeResult<TodoItem> {
    let id = match lookup(fields, TodoField::Id) {
        Some(FieldValue::Text(value)) => {
            TodoId::new(value.as_str()).map_err(DecodeError::InvalidId)?
        }
        Some(other) => return Err(wrong_type(TodoField::Id, "text", other)),
        None => return Err(DecodeError::MissingField(TodoField::Id.local_key())),
    };

    let title = match lookup(fields, TodoField::Title) {
        Some(FieldValue::Text(value)) => Some(value.clone()),
        Some(other) => return Err(wrong_type(TodoField::Title, "text", other)),
        None => None,
    };

    let priority = match lookup(fields, TodoField::Priority) {
        Some(FieldValue::Integer(ordinal)) => {
            TodoPriority::from_ordinal(*ordinal).ok_or(DecodeError::InvalidPriority(*ordinal))?
        }
        Some(other) => return Err(wrong_type(TodoField::Priority, "integer", other)),
        None => TodoPriority::Normal,
    };

    let is_done = match lookup(fields, TodoField::IsDone) {
        Some(FieldValue::Bool(value)) => *value,
        Some(other) => return Err(wrong_type(TodoField::IsDone, "bool", other)),
        None => false,
    };

    let creation_date = timestamp(fields, TodoField::CreationDate)?.unwrap_or_else(now_epoch_ms);
    let last_modified = timestamp(fields, TodoField::LastModified)?.unwrap_or(creation_date);

    let mut item = TodoItem::with_id(id);
    item.title = title;
    item.priority = priority;
    item.is_done = is_done;
    item.creation_date = creation_date;
    item.last_modified = last_modified;
    Ok(item)
}

/// Returns the stored value, treating explicit `Null` as absent.
fn lookup(fields: &FieldMap, field: TodoField) -> Option<&FieldValue> {
    fields
        .get(field.local_key())
        .filter(|value| !value.is_null())
}

fn timestamp(fields: &FieldMap, field: TodoField) -> DecodeResult<Option<i64>> {
    match lookup(fields, field) {
        Some(FieldValue::Timestamp(ms)) => Ok(Some(*ms)),
        Some(other) => Err(wrong_type(field, "timestamp", other)),
        None => Ok(None),
    }
}

fn wrong_type(field: TodoField, expected: &'static str, found: &FieldValue) -> DecodeError {
    DecodeError::WrongType {
        key: field.local_key(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_fields;
    use crate::codec::DecodeError;
    use crate::model::field::{FieldMap, FieldValue};

    #[test]
    fn explicit_null_title_is_treated_as_absent() {
        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), FieldValue::Text("a".to_string()));
        fields.insert("title".to_string(), FieldValue::Null);
        fields.insert("creationDate".to_string(), FieldValue::Timestamp(10));

        let item = decode_fields(&fields).unwrap();
        assert_eq!(item.title, None);
        assert_eq!(item.creation_date, 10);
        assert_eq!(item.last_modified, 10);
    }

    #[test]
    fn blank_id_is_rejected() {
        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), FieldValue::Text("  ".to_string()));

        let err = decode_fields(&fields).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidId(_)));
    }
}
