use serde_json::json;

use super::{Setup, stored_destination};
use crate::editor::{
    DEFAULT_LEAVE_PROMPT, EditorError, EditorEvent, EditorMode, EditorOptions, EditorParams,
    PanelKey, Route,
};

#[test]
fn requested_tab_is_opened_unless_disabled() {
    let mut harness =
        Setup::default().open(EditorParams::create("postgres").with_tab("mappings"));
    assert_eq!(harness.editor.session().active_tab, PanelKey::Mappings);

    assert!(!harness.editor.set_active_tab(PanelKey::Statistics));
    assert_eq!(harness.editor.session().active_tab, PanelKey::Mappings);
    assert!(harness.editor.set_active_tab(PanelKey::Settings));

    let fallback = Setup::default().open(EditorParams::create("postgres").with_tab("statistics"));
    assert_eq!(fallback.editor.session().active_tab, PanelKey::Config);
}

#[test]
fn leave_prompt_follows_touched_panels() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    assert_eq!(harness.editor.leave_prompt(), None);

    harness
        .editor
        .edit_field(PanelKey::Mappings, "_mappings._keepUnmappedFields", json!(false))
        .expect("edit");
    assert_eq!(harness.editor.leave_prompt(), Some(DEFAULT_LEAVE_PROMPT));

    harness.editor.touch_panel(PanelKey::Mappings, Some(false));
    assert_eq!(harness.editor.leave_prompt(), None);

    let mut quiet = Setup {
        options: EditorOptions::default().with_confirm_leave(false),
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    quiet.editor.touch_panel(PanelKey::Config, None);
    assert!(quiet.editor.has_unsaved_changes());
    assert_eq!(quiet.editor.leave_prompt(), None);
}

#[tokio::test]
async fn edits_revalidate_only_after_a_submit_attempt() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness
        .editor
        .edit_field(PanelKey::Config, "_formData.pghost", json!("db.internal"))
        .expect("host");
    assert_eq!(
        harness.editor.panel(PanelKey::Config).expect("config").errors_count,
        None
    );

    harness.editor.submit().await;
    assert_eq!(
        harness.editor.panel(PanelKey::Config).expect("config").errors_count,
        Some(2)
    );
    harness
        .editor
        .edit_field(PanelKey::Config, "_formData.pgdb", json!("analytics"))
        .expect("db");
    assert_eq!(
        harness.editor.panel(PanelKey::Config).expect("config").errors_count,
        Some(1)
    );
}

#[test]
fn revalidation_can_be_switched_off() {
    let mut harness = Setup {
        options: EditorOptions::default().with_revalidate_after_submit(false),
        ..Setup::default()
    }
    .open(EditorParams::create("postgres"));
    harness.editor.touch_panel(PanelKey::Config, None);
    assert_eq!(
        harness.editor.panel(PanelKey::Config).expect("config").errors_count,
        None
    );
}

#[test]
fn edit_mode_resolution() {
    let harness = Setup {
        destinations: vec![stored_destination("pg", "k1")],
        ..Setup::default()
    }
    .open(EditorParams::edit("pg"));
    assert_eq!(harness.editor.mode(), EditorMode::Edit);
    assert_eq!(harness.editor.draft().uid, "k1");
    assert_eq!(harness.editor.reference().id, "postgres");
    assert!(harness.editor.needs_linking_hint());
    assert_eq!(
        harness.editor.field_value(PanelKey::Config, "_formData.pghost"),
        Some(&json!("pg.internal"))
    );
}

#[test]
fn unknown_fields_and_panels_are_errors() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    assert!(matches!(
        harness.editor.edit_field(PanelKey::Config, "_formData.nope", json!(1)),
        Err(EditorError::UnknownField(_))
    ));
    assert!(matches!(
        harness.editor.edit_field(PanelKey::Settings, "_comment", json!("x")),
        Err(EditorError::NoForm(PanelKey::Settings))
    ));
    assert_eq!(
        harness.editor.edit_field_by_name("_onlyKeys", json!(["k"])).expect("routed"),
        PanelKey::Sources
    );
}

#[test]
fn cancel_navigates_back() {
    let mut harness = Setup::default().open(EditorParams::create("postgres"));
    harness.editor.cancel();
    assert_eq!(
        harness.drain(),
        vec![EditorEvent::Navigate(Route::DestinationsRoot)]
    );
}
