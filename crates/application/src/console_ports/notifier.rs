/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation completed.
    Success,
    /// Operation failed or was blocked.
    Error,
}

/// Toast-style message surfaced to the admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Resource the message belongs to.
    pub resource: &'static str,
    /// Human-readable text, carried verbatim from the API when available.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(resource: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            resource,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(resource: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            resource,
            message: message.into(),
        }
    }
}

/// Port rendering notifications.
pub trait Notifier: Send + Sync {
    /// Shows one notification.
    fn notify(&self, notification: Notification);
}
