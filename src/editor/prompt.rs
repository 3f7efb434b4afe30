use super::tabs::Panel;

pub const DEFAULT_LEAVE_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to leave the page?";

pub fn has_unsaved_changes(panels: &[Panel]) -> bool {
    panels.iter().any(|panel| panel.touched)
}

/// The message a navigation guard shows, or `None` when leaving is safe.
pub fn prompt_message<'a>(panels: &[Panel], message: &'a str) -> Option<&'a str> {
    has_unsaved_changes(panels).then_some(message)
}
