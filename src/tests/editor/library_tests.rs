use serde_json::json;

use super::{Setup, field, notification_messages, stored_destination};
use crate::{
    domain::{DestinationMapping, MappingField},
    editor::{EditorError, EditorParams, PanelKey, SubmitOutcome},
};

#[tokio::test]
async fn table_name_reaches_an_untouched_connection_panel() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness
        .editor
        .edit_field(PanelKey::Config, "_formData.tableName", json!("pageviews"))
        .expect("table name");
    harness.editor.touch_panel(PanelKey::Config, Some(false));
    assert!(!harness.editor.panel(PanelKey::Config).expect("config").touched);

    let mapping = DestinationMapping::new(vec![MappingField::moved("/a", "/b")], false);
    harness
        .editor
        .apply_library(mapping.clone(), Some("events".into()))
        .expect("apply");

    let config = harness.editor.panel(PanelKey::Config).expect("config");
    let mappings = harness.editor.panel(PanelKey::Mappings).expect("mappings");
    assert!(config.touched);
    assert!(mappings.touched);
    assert_eq!(
        field(&harness, PanelKey::Config, "_formData.tableName"),
        Some(json!("events"))
    );
    assert_eq!(
        field(&harness, PanelKey::Mappings, "_mappings._mappings"),
        Some(json!([{"_srcField": "/a", "_dstField": "/b", "_action": "move"}]))
    );
    assert_eq!(
        field(&harness, PanelKey::Mappings, "_mappings._keepUnmappedFields"),
        Some(json!(false))
    );
    assert_eq!(harness.editor.draft().mappings, mapping);
    assert_eq!(harness.editor.draft().table_name(), Some("events"));
    assert_eq!(
        notification_messages(&harness.drain()),
        vec!["Mappings library has been successfully set".to_string()]
    );
}

#[tokio::test]
async fn without_table_name_only_the_mappings_panel_changes() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness
        .editor
        .apply_library(DestinationMapping::new(Vec::new(), true), None)
        .expect("apply");
    assert!(harness.editor.panel(PanelKey::Mappings).expect("mappings").touched);
    assert!(!harness.editor.panel(PanelKey::Config).expect("config").touched);
}

#[tokio::test]
async fn applied_preset_is_what_gets_saved() {
    let mut harness = Setup {
        destinations: vec![stored_destination("pg", "k1")],
        ..Setup::default()
    }
    .open(EditorParams::edit("pg"));
    harness.editor.apply_preset("segment").expect("preset");

    assert!(matches!(
        harness.editor.submit().await,
        SubmitOutcome::Saved { .. }
    ));
    let saved = harness.destinations.snapshot();
    assert_eq!(saved[0].mappings.mappings.len(), 8);
    assert_eq!(saved[0].mappings.keep_unmapped_fields, Some(false));
    assert_eq!(saved[0].table_name(), Some("events"));
}

#[tokio::test]
async fn unknown_preset_is_rejected() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    let err = harness.editor.apply_preset("nope").expect_err("unknown");
    assert!(matches!(err, EditorError::UnknownPreset(id) if id == "nope"));
    assert!(harness.drain().is_empty());
}
