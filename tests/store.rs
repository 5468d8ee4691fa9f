//! Tests for the JSON wire codec, the file-backed schema store, and draft
//! snapshots.
mod common;
use common::*;
use careflow::prelude::*;
use std::fs;

#[test]
fn test_schema_json_round_trip() {
    let schema = flow_schema();
    let json = schema.to_json_string().expect("Serialization failed");
    let back = WorkflowSchema::from_json_str(&json).expect("Deserialization failed");
    assert_eq!(back, schema);
}

#[test]
fn test_wire_format_uses_camel_case_keys() {
    let schema = flow_schema();
    let json = schema.to_json_string().unwrap();

    assert!(json.contains("\"syncPatient\""));
    assert!(json.contains("\"renderType\""));
    assert!(json.contains("\"formId\""));
    assert!(json.contains("\"stepId\""));
    assert_eq!(
        serde_json::to_string(&RenderType::FormWorkspace).unwrap(),
        "\"form-workspace\""
    );
}

#[test]
fn test_wire_format_accepts_minimal_steps() {
    // Older builders omit visibility, weight, and formId freely.
    let json = r#"{
        "name": "Minimal",
        "steps": [
            {"id": "step-0", "renderType": "conditions", "skippable": false},
            {"id": "step-1", "renderType": "form-workspace", "skippable": true}
        ]
    }"#;
    let schema = WorkflowSchema::from_json_str(json).expect("Deserialization failed");
    assert!(!schema.sync_patient);
    assert_eq!(schema.steps[1].render_type, RenderType::FormWorkspace);
    assert!(schema.steps[0].visibility.is_empty());
    schema.validate().expect("Minimal schema must validate");
}

#[test]
fn test_file_store_save_and_load() {
    let root = temp_path("file-store");
    let mut store = FileSchemaStore::open(&root).expect("Failed to open store");

    let schema = flow_schema();
    let reference = store.save("wf-1", &schema).expect("Save failed");
    let loaded = store.load(&reference).expect("Load failed");
    assert_eq!(loaded, schema);

    let metadata = store.metadata("wf-1").expect("Metadata missing");
    assert_eq!(metadata.name, "Flow");
    assert_eq!(metadata.resource_value_reference, Some(reference));
    assert!(!metadata.published);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_metadata_update_is_partial() {
    let root = temp_path("meta-update");
    let mut store = FileSchemaStore::open(&root).expect("Failed to open store");
    store.save("wf-2", &flow_schema()).expect("Save failed");

    let criteria = add_criterion(&[], "PATIENT_DEMOGRAPHICS", "age", ">=", "18");
    let updated = store
        .update_metadata(
            "wf-2",
            MetadataUpdate {
                published: Some(true),
                criteria: Some(criteria.clone()),
                ..MetadataUpdate::default()
            },
        )
        .expect("Update failed");

    assert!(updated.published);
    assert_eq!(updated.criteria, criteria);
    // Untouched fields survive.
    assert_eq!(updated.name, "Flow");
    assert!(updated.resource_value_reference.is_some());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_metadata_update_for_unknown_uuid_errors() {
    let root = temp_path("meta-unknown");
    let mut store = FileSchemaStore::open(&root).expect("Failed to open store");
    let err = store
        .update_metadata("no-such-uuid", MetadataUpdate::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownUuid(_)));
    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_draft_snapshot_byte_round_trip() {
    let snapshot = DraftSnapshot {
        schema: flow_schema(),
        next_step_ordinal: 7,
    };
    let bytes = snapshot.to_bytes().expect("Encoding failed");
    let back = DraftSnapshot::from_bytes(&bytes).expect("Decoding failed");
    assert_eq!(back, snapshot);
}

#[test]
fn test_draft_round_trip_covers_every_optional_field_shape() {
    // The JSON wire format omits absent optionals; the draft format must
    // round-trip steps regardless of which optionals are present.
    let mut schema = flow_schema();
    schema.steps[0].weight = Some(10);
    schema.steps[1].visibility.conditions.push(StepCondition::patient(
        "age",
        ConditionOperator::GreaterThan,
        "17",
    ));
    schema = schema
        .with_step_appended(Step {
            // No form id, no weight, no conditions at all.
            id: "s2".to_string(),
            render_type: RenderType::Appointments,
            form_id: None,
            skippable: false,
            weight: None,
            visibility: Visibility::default(),
        })
        .expect("Failed to append step");

    let snapshot = DraftSnapshot {
        schema,
        next_step_ordinal: 3,
    };
    let bytes = snapshot.to_bytes().expect("Encoding failed");
    let back = DraftSnapshot::from_bytes(&bytes).expect("Decoding failed");
    assert_eq!(back, snapshot);
    assert_eq!(back.schema.steps[0].weight, Some(10));
    assert_eq!(back.schema.steps[1].visibility.conditions.len(), 2);
    assert!(back.schema.steps[2].visibility.is_empty());
}

#[test]
fn test_memory_draft_store() {
    let mut store = MemoryDraftStore::new();
    assert!(store.load().unwrap().is_none());

    let snapshot = DraftSnapshot {
        schema: flow_schema(),
        next_step_ordinal: 2,
    };
    store.save(&snapshot).expect("Save failed");
    assert_eq!(store.load().unwrap(), Some(snapshot));

    store.clear().expect("Clear failed");
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_file_draft_store() {
    let path = temp_path("draft.bin");
    let mut store = FileDraftStore::new(&path);
    assert!(store.load().unwrap().is_none());

    let snapshot = DraftSnapshot {
        schema: flow_schema(),
        next_step_ordinal: 3,
    };
    store.save(&snapshot).expect("Save failed");
    assert_eq!(store.load().unwrap(), Some(snapshot));

    store.clear().expect("Clear failed");
    assert!(!path.exists());
}
