use std::borrow::Cow;

use super::{prompt::DEFAULT_LEAVE_PROMPT, tabs::PanelKey};

#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub revalidate_after_submit: bool,
    pub confirm_leave: bool,
    pub leave_prompt: Cow<'static, str>,
    pub initial_tab: PanelKey,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            revalidate_after_submit: true,
            confirm_leave: true,
            leave_prompt: Cow::Borrowed(DEFAULT_LEAVE_PROMPT),
            initial_tab: PanelKey::Config,
        }
    }
}

impl EditorOptions {
    pub fn with_revalidate_after_submit(mut self, enabled: bool) -> Self {
        self.revalidate_after_submit = enabled;
        self
    }

    pub fn with_confirm_leave(mut self, confirm: bool) -> Self {
        self.confirm_leave = confirm;
        self
    }

    pub fn with_leave_prompt(mut self, prompt: impl Into<Cow<'static, str>>) -> Self {
        self.leave_prompt = prompt.into();
        self
    }

    pub fn with_initial_tab(mut self, tab: PanelKey) -> Self {
        self.initial_tab = tab;
        self
    }
}
