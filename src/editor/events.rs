#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    DestinationsRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Stays on screen until dismissed.
    pub closeable: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            closeable: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            closeable: false,
        }
    }

    pub fn closeable_warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
            closeable: true,
        }
    }
}

/// Effects the editor asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Navigate(Route),
    Notify(Notification),
}
