use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde_json::{Map, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    collection::SharedCollection,
    domain::{DestinationCatalog, DestinationData, DestinationReference, SourceData},
    form::{FormCommand, ValidationErrors},
    services::Services,
};

use super::{
    error::EditorError,
    events::{EditorEvent, Notification, Route},
    options::EditorOptions,
    prompt,
    session::{SessionState, SubmitPhase},
    tabs::{Panel, PanelErrors, PanelKey, build_panels},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit,
}

/// Route parameters the editor was opened with.
#[derive(Debug, Clone, Default)]
pub struct EditorParams {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub tab_name: Option<String>,
}

impl EditorParams {
    pub fn create(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_tab(mut self, tab_name: impl Into<String>) -> Self {
        self.tab_name = Some(tab_name.into());
        self
    }
}

/// State lifted above the editor plus the services it talks to.
#[derive(Debug, Clone)]
pub struct EditorContext {
    pub destinations: SharedCollection<DestinationData>,
    pub sources: SharedCollection<SourceData>,
    pub sources_error: Option<String>,
    pub services: Services,
    pub catalog: Arc<DestinationCatalog>,
}

impl EditorContext {
    pub fn new(services: Services, catalog: Arc<DestinationCatalog>) -> Self {
        Self {
            destinations: SharedCollection::default(),
            sources: SharedCollection::default(),
            sources_error: None,
            services,
            catalog,
        }
    }

    pub fn with_destinations(mut self, destinations: SharedCollection<DestinationData>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn with_sources(mut self, sources: SharedCollection<SourceData>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_sources_error(mut self, error: Option<String>) -> Self {
        self.sources_error = error;
        self
    }
}

/// Marks the editor as gone. Once torn down, every local state write and
/// event the editor would emit becomes a no-op.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    mounted: Arc<AtomicBool>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

/// Coordinates one editing session of a destination across its panels.
///
/// The draft is owned here and only the editor's workflows write to it;
/// panels hand back validated field sets that the editor folds in.
pub struct DestinationEditor {
    pub(super) draft: DestinationData,
    pub(super) reference: DestinationReference,
    pub(super) mode: EditorMode,
    pub(super) panels: Vec<Panel>,
    pub(super) session: SessionState,
    pub(super) options: EditorOptions,
    pub(super) context: EditorContext,
    events_tx: UnboundedSender<EditorEvent>,
    events_rx: Option<UnboundedReceiver<EditorEvent>>,
    teardown: TeardownHandle,
}

impl DestinationEditor {
    pub fn new(
        context: EditorContext,
        params: EditorParams,
        options: EditorOptions,
    ) -> Result<Self, EditorError> {
        let destinations = context.destinations.snapshot();
        let existing = params
            .id
            .as_deref()
            .and_then(|id| destinations.iter().find(|dst| dst.id == id));
        let (mode, draft) = match (existing, params.kind.as_deref(), params.id.as_deref()) {
            (Some(found), _, _) => (EditorMode::Edit, found.clone()),
            (None, Some(kind), _) => (
                EditorMode::Add,
                DestinationData::create(kind, destinations.iter().map(|dst| dst.id.as_str())),
            ),
            (None, None, Some(id)) => return Err(EditorError::NotFound(id.to_string())),
            (None, None, None) => return Err(EditorError::MissingType),
        };

        let kind = params.kind.clone().unwrap_or_else(|| draft.kind.clone());
        let reference = context
            .catalog
            .get(&kind)
            .cloned()
            .ok_or_else(|| EditorError::UnknownType(kind.clone()))?;

        let panels = build_panels(
            &reference,
            &draft.to_value()?,
            context.sources_error.clone(),
        )?;

        let active_tab = params
            .tab_name
            .as_deref()
            .and_then(|name| name.parse::<PanelKey>().ok())
            .unwrap_or(options.initial_tab);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut editor = Self {
            draft,
            reference,
            mode,
            panels,
            session: SessionState::default(),
            options,
            context,
            events_tx,
            events_rx: Some(events_rx),
            teardown: TeardownHandle {
                mounted: Arc::new(AtomicBool::new(true)),
            },
        };
        editor.set_active_tab(active_tab);
        tracing::debug!(id = %editor.draft.id, uid = %editor.draft.uid, mode = ?editor.mode, "destination editor opened");
        Ok(editor)
    }

    /// Receiver for navigation and notification events. Available once.
    pub fn events(&mut self) -> Option<UnboundedReceiver<EditorEvent>> {
        self.events_rx.take()
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.teardown.clone()
    }

    pub fn unmount(&self) {
        self.teardown.teardown();
    }

    pub fn is_mounted(&self) -> bool {
        self.teardown.is_mounted()
    }

    pub fn draft(&self) -> &DestinationData {
        &self.draft
    }

    pub fn reference(&self) -> &DestinationReference {
        &self.reference
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, key: PanelKey) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.key == key)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn submit_phase(&self) -> SubmitPhase {
        self.session.submit_phase
    }

    pub fn revision(&self) -> u64 {
        self.session.revision
    }

    pub fn sources_error(&self) -> Option<&str> {
        self.context.sources_error.as_deref()
    }

    pub fn set_active_tab(&mut self, key: PanelKey) -> bool {
        if self.panel(key).is_none_or(|panel| panel.disabled) {
            return false;
        }
        self.update_session(|session| session.active_tab = key);
        true
    }

    /// Edit mode with neither sources nor API keys linked.
    pub fn needs_linking_hint(&self) -> bool {
        self.mode == EditorMode::Edit && !self.draft.is_linked()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        prompt::has_unsaved_changes(&self.panels)
    }

    /// Message for the navigation guard; `None` lets navigation through.
    pub fn leave_prompt(&self) -> Option<&str> {
        if !self.options.confirm_leave {
            return None;
        }
        prompt::prompt_message(&self.panels, &self.options.leave_prompt)
    }

    pub fn error_summary(&self) -> Vec<PanelErrors> {
        self.panels
            .iter()
            .filter(|panel| panel.has_errors())
            .map(PanelErrors::from)
            .collect()
    }

    pub fn save_popover_visible(&self) -> bool {
        self.session.save_popover
            && (self.panels.iter().any(Panel::has_errors) || self.session.save_error.is_some())
    }

    pub fn test_popover_visible(&self) -> bool {
        self.session.test_connecting_popover
            && self.panel(PanelKey::Config).is_some_and(Panel::has_errors)
    }

    pub fn close_save_popover(&mut self) {
        self.update_session(|session| session.save_popover = false);
    }

    pub fn close_test_popover(&mut self) {
        self.update_session(|session| session.test_connecting_popover = false);
    }

    pub fn cancel(&self) {
        self.emit(EditorEvent::Navigate(Route::DestinationsRoot));
    }

    /// Field-change callback of a panel. `value` defaults to touched; pass
    /// `Some(false)` to mark the panel clean. Once a submit was attempted the
    /// panel is revalidated right away so its error badge stays current.
    pub fn touch_panel(&mut self, key: PanelKey, value: Option<bool>) {
        if !self.is_mounted() {
            return;
        }
        let revalidate = self.session.submitted_once && self.options.revalidate_after_submit;
        let Some(panel) = self.panel_mut(key) else {
            return;
        };
        panel.touched = value.unwrap_or(true);
        if revalidate
            && panel.has_form()
            && let Err(errors) = panel.validate()
        {
            tracing::debug!(panel = %key, errors = errors.count(), "panel revalidated with errors");
        }
        self.bump_revision();
    }

    /// Writes one field through the panel's own update primitive, then runs
    /// the touch workflow.
    pub fn edit_field(&mut self, key: PanelKey, name: &str, value: Value) -> Result<(), EditorError> {
        let panel = self.panel_mut(key).ok_or(EditorError::NoForm(key))?;
        let form = panel.form.as_mut().ok_or(EditorError::NoForm(key))?;
        let applied = form.dispatch(FormCommand::FieldEdited {
            name: name.to_string(),
            value,
        });
        if applied == 0 {
            return Err(EditorError::UnknownField(name.to_string()));
        }
        self.touch_panel(key, None);
        Ok(())
    }

    /// Like [`DestinationEditor::edit_field`], routed to whichever panel
    /// declares `name`.
    pub fn edit_field_by_name(&mut self, name: &str, value: Value) -> Result<PanelKey, EditorError> {
        let key = self
            .panels
            .iter()
            .find(|panel| panel.form.as_ref().is_some_and(|form| form.declares(name)))
            .map(|panel| panel.key)
            .ok_or_else(|| EditorError::UnknownField(name.to_string()))?;
        self.edit_field(key, name, value)?;
        Ok(key)
    }

    pub fn field_value(&self, key: PanelKey, name: &str) -> Option<&Value> {
        self.panel(key)
            .and_then(|panel| panel.form.as_ref())
            .and_then(|form| form.field_value(name))
    }

    pub(super) fn panel_mut(&mut self, key: PanelKey) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|panel| panel.key == key)
    }

    pub(super) fn validate_panel(
        &mut self,
        key: PanelKey,
    ) -> Result<Map<String, Value>, ValidationErrors> {
        match self.panel_mut(key) {
            Some(panel) => panel.validate(),
            None => Ok(Map::new()),
        }
    }

    /// Delivers `command` to a panel's form inbox. Returns the number of
    /// fields it changed.
    pub(super) fn send_to_panel(&mut self, key: PanelKey, command: FormCommand) -> usize {
        self.panel_mut(key)
            .and_then(|panel| panel.form.as_mut())
            .map(|form| form.dispatch(command))
            .unwrap_or(0)
    }

    pub(super) fn update_session(&mut self, update: impl FnOnce(&mut SessionState)) {
        if self.is_mounted() {
            update(&mut self.session);
        }
    }

    pub(super) fn set_phase(&mut self, phase: SubmitPhase) {
        tracing::debug!(id = %self.draft.id, ?phase, "submit phase");
        self.update_session(|session| {
            if phase == SubmitPhase::Validating {
                session.submit_trail.clear();
            }
            session.submit_phase = phase;
            session.submit_trail.push(phase);
        });
    }

    pub(super) fn bump_revision(&mut self) {
        self.update_session(|session| session.revision = session.revision.wrapping_add(1));
    }

    pub(super) fn emit(&self, event: EditorEvent) {
        if self.is_mounted() {
            let _ = self.events_tx.send(event);
        }
    }

    pub(super) fn notify(&self, notification: Notification) {
        self.emit(EditorEvent::Notify(notification));
    }
}

impl std::fmt::Debug for DestinationEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationEditor")
            .field("draft", &self.draft)
            .field("mode", &self.mode)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
