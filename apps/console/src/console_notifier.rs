use curator_application::{Notification, NotificationLevel, Notifier};
use curator_infrastructure::TracingNotifier;

/// Prints notifications under the table and mirrors them to the log.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    log: TracingNotifier,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            log: TracingNotifier::new(),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        println!("{}", format_notification(&notification));
        self.log.notify(notification);
    }
}

fn format_notification(notification: &Notification) -> String {
    let label = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{label}] {}: {}", notification.resource, notification.message)
}

#[cfg(test)]
mod tests {
    use curator_application::Notification;

    use super::format_notification;

    #[test]
    fn labels_follow_level() {
        assert_eq!(
            format_notification(&Notification::success("badge", "Badge created")),
            "[ok] badge: Badge created"
        );
        assert_eq!(
            format_notification(&Notification::error("badge", "please re-authenticate")),
            "[error] badge: please re-authenticate"
        );
    }
}
