use super::tabs::PanelKey;

/// Where the last submit is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    ValidationFailed,
    Merging,
    LinkingSources,
    ConnectivityChecking,
    /// The strict check failed; the save carries on with the failure recorded.
    ConnectivityFailed,
    Persisting,
    PersistFailed,
    Reconciling,
    Saved,
}

impl SubmitPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmitPhase::Idle
                | SubmitPhase::ValidationFailed
                | SubmitPhase::PersistFailed
                | SubmitPhase::Saved
        )
    }
}

/// Ephemeral editor state. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active_tab: PanelKey,
    /// Once set, touching a field revalidates its panel immediately.
    pub submitted_once: bool,
    pub test_connecting: bool,
    pub destination_saving: bool,
    pub test_connecting_popover: bool,
    pub save_popover: bool,
    pub submit_phase: SubmitPhase,
    /// Phases the last submit went through, in order.
    pub submit_trail: Vec<SubmitPhase>,
    pub save_error: Option<String>,
    pub revision: u64,
}
