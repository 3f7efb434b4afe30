use serde_json::json;

use super::{PROJECT, Setup, notification_messages, stored_destination};
use crate::{
    domain::SourceData,
    editor::{
        EditorEvent, EditorMode, EditorParams, NotificationLevel, PanelKey, Route, SubmitOutcome,
        SubmitPhase,
    },
    services::{ConnectionTestResult, MemoryStorage},
};

#[tokio::test]
async fn new_destination_is_saved_despite_failing_connectivity() {
    let mut harness = Setup {
        check: ConnectionTestResult::failed("Connection refused"),
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    assert_eq!(harness.editor.draft().id, "postgres");
    assert_eq!(harness.editor.mode(), EditorMode::Add);

    harness.fill_connection();
    let outcome = harness.editor.submit().await;
    assert_eq!(outcome, SubmitOutcome::Saved { connection_ok: false });

    let saved = harness.destinations.snapshot();
    assert_eq!(saved.len(), 1);
    assert!(!saved[0].connection_test_ok);
    assert_eq!(
        saved[0].connection_error_message.as_deref(),
        Some("Connection refused")
    );
    assert_eq!(saved[0].form_data.get("pghost"), Some(&json!("db.internal")));
    assert_eq!(saved[0].mappings.keep_unmapped_fields, Some(true));

    let events = harness.drain();
    let EditorEvent::Notify(warning) = &events[0] else {
        panic!("expected a notification first, got {events:?}");
    };
    assert_eq!(warning.level, NotificationLevel::Warning);
    assert!(warning.closeable);
    assert_eq!(
        warning.message,
        "Destination has been saved, but test has failed with 'connection refused'. Data will not be piped to this destination"
    );
    assert_eq!(events[1], EditorEvent::Navigate(Route::DestinationsRoot));

    let document = harness
        .storage
        .document("destinations", PROJECT)
        .expect("persisted");
    assert_eq!(document["destinations"][0]["_id"], json!("postgres"));
    assert_eq!(harness.editor.submit_phase(), SubmitPhase::Saved);
    assert_eq!(
        harness.editor.session().submit_trail,
        vec![
            SubmitPhase::Validating,
            SubmitPhase::Merging,
            SubmitPhase::LinkingSources,
            SubmitPhase::ConnectivityChecking,
            SubmitPhase::ConnectivityFailed,
            SubmitPhase::Persisting,
            SubmitPhase::Reconciling,
            SubmitPhase::Saved,
        ]
    );
    assert_eq!(harness.editor.mode(), EditorMode::Edit);
    assert!(!harness.editor.session().destination_saving);
}

#[tokio::test]
async fn taken_identifier_gets_a_suffix() {
    let harness = Setup {
        destinations: vec![stored_destination("postgres", "k0")],
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    assert_eq!(harness.editor.draft().id, "postgres_0");
}

#[tokio::test]
async fn invalid_panel_blocks_save_before_merge() {
    let mut stored = stored_destination("pg", "k1");
    stored.form_data.clear();
    let mut harness = Setup {
        destinations: vec![stored.clone()],
        ..Setup::default()
    }
    .open(EditorParams::edit("pg"));
    assert_eq!(harness.editor.mode(), EditorMode::Edit);

    harness
        .editor
        .edit_field(PanelKey::Config, "_comment", json!("primary"))
        .expect("comment");
    let outcome = harness.editor.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::ValidationFailed {
            panels: vec![(PanelKey::Config, 3)]
        }
    );

    assert_eq!(&*harness.destinations.snapshot(), &[stored]);
    assert_eq!(harness.storage.save_count(), 0);
    assert!(harness.editor.draft().comment.is_none());
    assert!(harness.editor.save_popover_visible());
    assert!(harness.drain().is_empty());
    assert!(harness.editor.has_unsaved_changes());
    assert_eq!(harness.editor.submit_phase(), SubmitPhase::ValidationFailed);
    assert!(!harness.editor.session().destination_saving);
}

#[tokio::test]
async fn every_invalid_panel_reports_its_error_count() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness
        .editor
        .edit_field(
            PanelKey::Mappings,
            "_mappings._mappings",
            json!([{"_srcField": "/a", "_action": "move"}]),
        )
        .expect("mappings");

    let SubmitOutcome::ValidationFailed { panels } = harness.editor.submit().await else {
        panic!("expected a validation failure");
    };
    assert_eq!(panels, vec![(PanelKey::Config, 3), (PanelKey::Mappings, 1)]);
    let summary = harness.editor.error_summary();
    let keys: Vec<_> = summary.iter().map(|errors| errors.key).collect();
    // the advisory sources panel is listed but never blocks
    assert_eq!(
        keys,
        vec![PanelKey::Config, PanelKey::Mappings, PanelKey::Sources]
    );
}

#[tokio::test]
async fn edit_replaces_only_the_matching_record() {
    let before = vec![
        stored_destination("pg_a", "k0"),
        stored_destination("pg_b", "k1"),
        stored_destination("pg_c", "k2"),
    ];
    let mut harness = Setup {
        destinations: before.clone(),
        ..Setup::default()
    }
    .open(EditorParams::edit("pg_b"));

    harness
        .editor
        .edit_field(PanelKey::Config, "_comment", json!("replica"))
        .expect("comment");
    let outcome = harness.editor.submit().await;
    assert_eq!(outcome, SubmitOutcome::Saved { connection_ok: true });

    let after = harness.destinations.snapshot();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].uid, "k1");
    assert_eq!(after[1].id, "pg_b");
    assert_eq!(after[1].comment.as_deref(), Some("replica"));

    let messages = notification_messages(&harness.drain());
    assert_eq!(messages, vec!["Destination has been updated!".to_string()]);
}

#[tokio::test]
async fn successful_save_resets_touched_and_the_leave_prompt() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness.fill_connection();
    harness
        .editor
        .edit_field(PanelKey::Sources, "_onlyKeys", json!(["js.key"]))
        .expect("api keys");
    assert!(harness.editor.leave_prompt().is_some());

    assert!(matches!(
        harness.editor.submit().await,
        SubmitOutcome::Saved { connection_ok: true }
    ));
    assert!(harness.editor.panels().iter().all(|panel| !panel.touched));
    assert_eq!(harness.editor.leave_prompt(), None);
    assert!(
        !harness
            .editor
            .session()
            .submit_trail
            .contains(&SubmitPhase::ConnectivityFailed)
    );
    assert_eq!(
        notification_messages(&harness.drain()),
        vec!["New destination has been added!".to_string()]
    );
}

#[tokio::test]
async fn advisory_errors_are_cleared_after_a_save() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness.fill_connection();

    assert!(matches!(
        harness.editor.submit().await,
        SubmitOutcome::Saved { .. }
    ));
    assert!(harness.editor.error_summary().is_empty());
    let sources = harness.editor.panel(PanelKey::Sources).expect("sources panel");
    assert_eq!(sources.errors_count, None);
    assert!(!harness.editor.save_popover_visible());
}

#[tokio::test]
async fn link_to_a_deleted_source_does_not_block_the_save() {
    let mut stored = stored_destination("pg", "k1");
    stored.sources = vec!["deleted_source".to_string()];
    let mut harness = Setup {
        destinations: vec![stored],
        sources: vec![SourceData::new("github", "singer")],
        ..Setup::default()
    }
    .open(EditorParams::edit("pg"));

    let outcome = harness.editor.submit().await;
    assert_eq!(outcome, SubmitOutcome::Saved { connection_ok: true });
    assert_eq!(
        harness.destinations.snapshot()[0].sources,
        vec!["deleted_source".to_string()]
    );
    assert!(harness.sources.snapshot()[0].destinations.is_empty());
}

#[tokio::test]
async fn persistence_failure_keeps_edits_for_a_retry() {
    let mut harness = Setup {
        storage: MemoryStorage::new().failing_on("destinations"),
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    harness.fill_connection();

    let outcome = harness.editor.submit().await;
    let SubmitOutcome::Failed { phase, message } = outcome else {
        panic!("expected a persistence failure");
    };
    assert_eq!(phase, SubmitPhase::PersistFailed);
    assert!(message.contains("destinations"));
    assert!(harness.destinations.is_empty());
    assert!(harness.drain().is_empty());
    assert!(harness.editor.save_popover_visible());
    assert!(harness.editor.has_unsaved_changes());
    assert_eq!(harness.editor.mode(), EditorMode::Add);
    assert!(!harness.editor.session().destination_saving);

    harness.storage.set_failing("destinations", false);
    let retry = harness.editor.submit().await;
    assert_eq!(retry, SubmitOutcome::Saved { connection_ok: true });
    assert_eq!(harness.destinations.len(), 1);
    assert!(harness.editor.session().save_error.is_none());
}

#[tokio::test]
async fn linked_sources_are_updated_alongside_the_save() {
    let mut harness = Setup {
        sources: vec![
            SourceData::new("github", "singer"),
            SourceData::new("stripe", "singer"),
        ],
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    harness.fill_connection();
    harness
        .editor
        .edit_field(PanelKey::Sources, "_sources", json!(["github"]))
        .expect("sources");

    assert!(matches!(
        harness.editor.submit().await,
        SubmitOutcome::Saved { .. }
    ));
    let uid = harness.editor.draft().uid.clone();
    let sources = harness.sources.snapshot();
    assert_eq!(sources[0].destinations, vec![uid]);
    assert!(sources[1].destinations.is_empty());
    assert!(harness.storage.document("sources", PROJECT).is_some());
}

#[tokio::test]
async fn sources_update_failure_never_blocks_the_save() {
    let mut harness = Setup {
        sources: vec![SourceData::new("github", "singer")],
        storage: MemoryStorage::new().failing_on("sources"),
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    harness.fill_connection();
    harness
        .editor
        .edit_field(PanelKey::Sources, "_sources", json!(["github"]))
        .expect("sources");

    assert!(matches!(
        harness.editor.submit().await,
        SubmitOutcome::Saved { .. }
    ));
    assert!(harness.sources.snapshot()[0].destinations.is_empty());
    assert_eq!(harness.destinations.len(), 1);
}

#[tokio::test]
async fn teardown_discards_local_updates_but_keeps_the_save() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness.fill_connection();
    let revision = harness.editor.revision();

    harness.editor.teardown_handle().teardown();
    let outcome = harness.editor.submit().await;
    assert_eq!(outcome, SubmitOutcome::Saved { connection_ok: true });

    assert_eq!(harness.destinations.len(), 1);
    assert!(harness.drain().is_empty());
    assert_eq!(harness.editor.revision(), revision);
    assert!(!harness.editor.session().submitted_once);
    assert_eq!(harness.editor.submit_phase(), SubmitPhase::Idle);
}
