use cloudtodo_core::{
    CloudSchema, CloudValueConverter, FieldValue, KeyMapping, RemoteRecord, RemoteRecordError,
    TodoField, TodoId, TodoItem, TodoPriority,
};
use std::sync::Arc;

fn buy_milk_record() -> RemoteRecord {
    RemoteRecord::new("todo", "rec-1")
        .with_field("created", FieldValue::Timestamp(1_700_000_000_000))
        .with_field("title", FieldValue::Text("Buy milk".to_string()))
        .with_field("priority", FieldValue::Integer(1))
        .with_field("isDone", FieldValue::Bool(false))
}

#[test]
fn hydrates_fields_through_key_mapping() {
    let item = TodoItem::from_remote_record(&buy_milk_record(), &CloudSchema::todo())
        .expect("todo record should hydrate");

    assert_eq!(item.id().as_str(), "rec-1");
    assert_eq!(item.creation_date, 1_700_000_000_000);
    assert_eq!(item.title.as_deref(), Some("Buy milk"));
    assert_eq!(item.priority, TodoPriority::High);
    assert!(!item.is_done);
}

#[test]
fn unrecognized_remote_keys_are_ignored() {
    let record = buy_milk_record()
        .with_field("creationDate", FieldValue::Timestamp(1))
        .with_field("color", FieldValue::Text("red".to_string()));

    let item = TodoItem::try_from_remote_record(&record, &CloudSchema::todo()).unwrap();
    assert_eq!(item.creation_date, 1_700_000_000_000);
}

#[test]
fn wrong_record_type_is_rejected() {
    let record = RemoteRecord::new("note", "rec-2");
    let err = TodoItem::try_from_remote_record(&record, &CloudSchema::todo()).unwrap_err();
    assert_eq!(
        err,
        RemoteRecordError::UnexpectedRecordType {
            expected: "todo".to_string(),
            found: "note".to_string(),
        }
    );
}

#[cfg(not(debug_assertions))]
#[test]
fn wrong_record_type_returns_none_in_release() {
    let record = RemoteRecord::new("note", "rec-2");
    assert!(TodoItem::from_remote_record(&record, &CloudSchema::todo()).is_none());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "non-todo record")]
fn wrong_record_type_asserts_in_debug() {
    let record = RemoteRecord::new("note", "rec-2");
    let _ = TodoItem::from_remote_record(&record, &CloudSchema::todo());
}

#[test]
fn bad_attribute_value_fails_hydration() {
    let record = buy_milk_record().with_field("priority", FieldValue::Integer(9));
    assert!(TodoItem::from_remote_record(&record, &CloudSchema::todo()).is_none());

    let err = TodoItem::try_from_remote_record(&record, &CloudSchema::todo()).unwrap_err();
    assert!(matches!(err, RemoteRecordError::Field { ref key, .. } if key == "priority"));
}

#[test]
fn null_priority_from_cloud_recovers_normal() {
    let record = buy_milk_record().with_field("priority", FieldValue::Null);
    let item = TodoItem::try_from_remote_record(&record, &CloudSchema::todo()).unwrap();
    assert_eq!(item.priority, TodoPriority::Normal);
}

#[test]
fn outbound_record_uses_remote_keys() {
    let mut item = TodoItem::with_id(TodoId::new("abc").unwrap());
    item.title = Some("Buy milk".to_string());
    item.creation_date = 10;
    item.last_modified = 20;

    let record = item.to_remote_record(&CloudSchema::todo());
    assert_eq!(record.record_type, "todo");
    assert_eq!(record.record_name, "abc");
    assert_eq!(record.get("created"), Some(&FieldValue::Timestamp(10)));
    assert_eq!(record.get("lastModified"), Some(&FieldValue::Timestamp(20)));
    assert_eq!(record.get("creationDate"), None);
    assert_eq!(record.get("id"), None);

    let hydrated = TodoItem::try_from_remote_record(&record, &CloudSchema::todo()).unwrap();
    assert_eq!(hydrated, item);
}

#[test]
fn cloud_value_for_key_passes_values_through() {
    let schema = CloudSchema::todo();
    let mut item = TodoItem::new();
    item.is_done = true;

    assert_eq!(
        item.cloud_value_for_key("isDone", &schema),
        Some(FieldValue::Bool(true))
    );
    assert_eq!(item.cloud_value_for_key("unknown", &schema), None);

    item.set_from_cloud_value(FieldValue::Text("Walk dog".to_string()), "title", &schema)
        .unwrap();
    assert_eq!(item.title.as_deref(), Some("Walk dog"));

    let err = item
        .set_from_cloud_value(FieldValue::Bool(true), "unknown", &schema)
        .unwrap_err();
    assert_eq!(err, RemoteRecordError::UnknownKey("unknown".to_string()));
}

struct UppercaseTitles;

impl CloudValueConverter for UppercaseTitles {
    fn to_cloud(&self, field: TodoField, value: FieldValue) -> FieldValue {
        match (field, value) {
            (TodoField::Title, FieldValue::Text(title)) => FieldValue::Text(title.to_uppercase()),
            (_, value) => value,
        }
    }

    fn from_cloud(&self, field: TodoField, value: FieldValue) -> FieldValue {
        match (field, value) {
            (TodoField::Title, FieldValue::Text(title)) => FieldValue::Text(title.to_lowercase()),
            (_, value) => value,
        }
    }
}

#[test]
fn custom_converter_intercepts_specific_fields() {
    let schema = CloudSchema::todo().with_converter(Arc::new(UppercaseTitles));
    let mut item = TodoItem::new();
    item.title = Some("Buy Milk".to_string());

    assert_eq!(
        item.cloud_value_for_key("title", &schema),
        Some(FieldValue::Text("BUY MILK".to_string()))
    );

    let hydrated = TodoItem::try_from_remote_record(&buy_milk_record(), &schema).unwrap();
    assert_eq!(hydrated.title.as_deref(), Some("buy milk"));
    assert_eq!(hydrated.priority, TodoPriority::High);
}

#[test]
fn custom_mapping_is_used_in_both_directions() {
    let schema = CloudSchema::new(
        "todo",
        KeyMapping::todo().with_override(TodoField::IsDone, "done"),
    );
    let record = buy_milk_record().with_field("done", FieldValue::Bool(true));

    let item = TodoItem::try_from_remote_record(&record, &schema).unwrap();
    assert!(item.is_done);
    assert_eq!(
        item.to_remote_record(&schema).get("done"),
        Some(&FieldValue::Bool(true))
    );
}

#[test]
fn changed_cloud_keys_tracks_local_edits_since_hydration() {
    let schema = CloudSchema::todo();
    let mut item = TodoItem::try_from_remote_record(&buy_milk_record(), &schema).unwrap();

    let originals = item.original_cloud_values().expect("hydrated item keeps originals");
    assert_eq!(originals.len(), 4);
    // `lastModified` was absent remotely, so it already differs.
    assert_eq!(
        item.changed_cloud_keys(&schema),
        vec!["lastModified".to_string()]
    );

    item.title = Some("Buy oat milk".to_string());
    item.is_done = true;
    assert_eq!(
        item.changed_cloud_keys(&schema),
        vec![
            "title".to_string(),
            "isDone".to_string(),
            "lastModified".to_string()
        ]
    );

    let fresh = TodoItem::new();
    assert_eq!(fresh.changed_cloud_keys(&schema).len(), 5);
}

#[test]
fn null_timestamps_are_skipped_like_absent_attributes() {
    let record = RemoteRecord::new("todo", "rec-3")
        .with_field("title", FieldValue::Text("Buy milk".to_string()))
        .with_field("created", FieldValue::Null)
        .with_field("lastModified", FieldValue::Null);

    let item = TodoItem::from_remote_record(&record, &CloudSchema::todo())
        .expect("null timestamps should not drop the record");
    assert_eq!(item.title.as_deref(), Some("Buy milk"));
    assert_eq!(item.creation_date, item.last_modified);
    assert!(item.creation_date > 0);

    let originals = item.original_cloud_values().unwrap();
    assert!(!originals.contains_key("created"));
    assert!(!originals.contains_key("lastModified"));
}

#[test]
fn null_title_from_cloud_clears_it() {
    let record = buy_milk_record().with_field("title", FieldValue::Null);
    let item = TodoItem::try_from_remote_record(&record, &CloudSchema::todo()).unwrap();
    assert_eq!(item.title, None);
    assert_eq!(item.priority, TodoPriority::High);
}

#[test]
fn cloud_applied_updates_are_not_local_changes() {
    let schema = CloudSchema::todo();
    let record = RemoteRecord::new("todo", "rec-4")
        .with_field("title", FieldValue::Text("a".to_string()))
        .with_field("lastModified", FieldValue::Timestamp(5));
    let mut item = TodoItem::try_from_remote_record(&record, &schema).unwrap();

    let before = item.changed_cloud_keys(&schema);
    assert_eq!(before, vec!["priority", "isDone", "created"]);

    item.set_from_cloud_value(FieldValue::Text("b".to_string()), "title", &schema)
        .unwrap();
    assert_eq!(item.title.as_deref(), Some("b"));
    assert_eq!(item.changed_cloud_keys(&schema), before);

    item.title = Some("c".to_string());
    assert_eq!(
        item.changed_cloud_keys(&schema),
        vec!["title", "priority", "isDone", "created"]
    );
}

#[test]
fn rejected_cloud_value_leaves_originals_untouched() {
    let schema = CloudSchema::todo();
    let mut item = TodoItem::try_from_remote_record(&buy_milk_record(), &schema).unwrap();

    item.set_from_cloud_value(FieldValue::Integer(9), "priority", &schema)
        .unwrap_err();
    assert_eq!(item.priority, TodoPriority::High);
    assert_eq!(
        item.original_cloud_values().unwrap().get("priority"),
        Some(&FieldValue::Integer(1))
    );
}

#[test]
fn cloud_writes_on_fresh_items_do_not_create_originals() {
    let schema = CloudSchema::todo();
    let mut item = TodoItem::new();
    item.set_from_cloud_value(FieldValue::Bool(true), "isDone", &schema)
        .unwrap();
    assert!(item.original_cloud_values().is_none());
    assert_eq!(item.changed_cloud_keys(&schema).len(), 5);
}
