use serde_json::json;

use super::Setup;
use crate::{
    editor::{EditorEvent, EditorParams, NotificationLevel, PanelKey, TestConnectionOutcome},
    services::ConnectionTestResult,
};

#[tokio::test]
async fn invalid_properties_open_the_popover_without_probing() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    let outcome = harness.editor.test_connection().await;
    assert_eq!(outcome, TestConnectionOutcome::InvalidProperties { errors: 3 });
    assert!(harness.editor.test_popover_visible());
    assert!(!harness.editor.session().test_connecting);
    assert!(harness.drain().is_empty());

    harness.fill_connection();
    assert_eq!(
        harness.editor.test_connection().await,
        TestConnectionOutcome::Connected
    );
    assert!(!harness.editor.test_popover_visible());
}

#[tokio::test]
async fn probe_writes_connection_slice_only() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness.fill_connection();
    harness
        .editor
        .edit_field(PanelKey::Config, "_comment", json!("not yet merged"))
        .expect("comment");

    harness.editor.test_connection().await;
    let draft = harness.editor.draft();
    assert_eq!(draft.form_data.get("pghost"), Some(&json!("db.internal")));
    assert_eq!(draft.form_data.get("tableName"), Some(&json!("events")));
    assert!(draft.comment.is_none());
    assert!(!draft.connection_test_ok);

    let events = harness.drain();
    let [EditorEvent::Notify(notification)] = events.as_slice() else {
        panic!("expected one notification, got {events:?}");
    };
    assert_eq!(notification.level, NotificationLevel::Success);
    assert_eq!(notification.message, "Successfully connected!");
}

#[tokio::test]
async fn failed_probe_is_reported_not_recorded() {
    let mut harness = Setup {
        check: ConnectionTestResult::failed("Connection to db.internal:5432 failed"),
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    harness.fill_connection();

    let outcome = harness.editor.test_connection().await;
    assert_eq!(
        outcome,
        TestConnectionOutcome::Failed {
            message: "Connection to db.internal:5432 failed".into()
        }
    );
    assert!(harness.editor.draft().connection_error_message.is_none());
    let events = harness.drain();
    let [EditorEvent::Notify(notification)] = events.as_slice() else {
        panic!("expected one notification, got {events:?}");
    };
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(
        notification.message,
        "Unable to test connection with filled data: Connection to db.internal:5432 failed"
    );
}
