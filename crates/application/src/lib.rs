//! Controllers and ports for admin data-table pages.

#![forbid(unsafe_code)]

mod confirmation_controller;
mod console_ports;
mod list_controller;
mod mount;
mod mutation_controller;
mod resource_page;
mod session_accessor;

#[cfg(test)]
mod test_support;

pub use confirmation_controller::{ConfirmOutcome, ConfirmationController};
pub use console_ports::{
    ListPage, MutationReceipt, Notification, NotificationLevel, Notifier, ResourceApi,
    SessionStorage,
};
pub use list_controller::{ListController, ListSnapshot, REAUTHENTICATE_MESSAGE, ReloadOutcome};
pub use mount::MountHandle;
pub use mutation_controller::{MutationController, SubmitOutcome};
pub use resource_page::{ResourcePage, TOGGLE_BUSY_MESSAGE, TableView};
pub use session_accessor::{SESSION_BLOB_KEY, SESSION_TOKEN_KEY, SessionAccessor};
