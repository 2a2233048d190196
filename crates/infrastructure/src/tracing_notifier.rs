//! Notifier that writes notifications to tracing output.

use curator_application::{Notification, NotificationLevel, Notifier};
use tracing::{info, warn};

/// Notifier for headless runs. Success is logged at info, failure at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!(
                    resource = notification.resource,
                    message = notification.message.as_str(),
                    "admin notification"
                );
            }
            NotificationLevel::Error => {
                warn!(
                    resource = notification.resource,
                    message = notification.message.as_str(),
                    "admin notification"
                );
            }
        }
    }
}
