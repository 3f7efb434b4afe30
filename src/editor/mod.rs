//! The destination editor: one coordinator owning the draft, the panel list
//! and the workflows that move data between them.

mod connection;
mod coordinator;
mod error;
mod events;
mod library;
mod options;
mod prompt;
mod session;
mod submit;
mod tabs;

pub use connection::TestConnectionOutcome;
pub use coordinator::{
    DestinationEditor, EditorContext, EditorMode, EditorParams, TeardownHandle,
};
pub use error::EditorError;
pub use events::{EditorEvent, Notification, NotificationLevel, Route};
pub use options::EditorOptions;
pub use prompt::{DEFAULT_LEAVE_PROMPT, has_unsaved_changes, prompt_message};
pub use session::{SessionState, SubmitPhase};
pub use submit::SubmitOutcome;
pub use tabs::{ErrorsLevel, Panel, PanelContent, PanelErrors, PanelKey};
