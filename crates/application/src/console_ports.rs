mod notifier;
mod resource_api;
mod session_storage;

pub use notifier::{Notification, NotificationLevel, Notifier};
pub use resource_api::{ListPage, MutationReceipt, ResourceApi};
pub use session_storage::SessionStorage;
