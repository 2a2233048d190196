use std::sync::Arc;

use curator_core::AppResult;
use curator_domain::{
    ConfirmationGate, ListQueryPatch, ResourceBinding, ResourceRecord, required_scope,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ListController;
use crate::console_ports::{MutationReceipt, Notification, Notifier, ResourceApi};

/// Result of one [`ConfirmationController::confirm`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// The gate was closed; nothing was deleted.
    NothingPending,
    /// The pending record was deleted.
    Deleted(MutationReceipt),
    /// The page unmounted before the delete resolved.
    Detached,
}

/// Binds a [`ConfirmationGate`] to the delete endpoint of a resource.
///
/// Row actions only ever call [`ConfirmationController::request`]; the delete
/// runs from [`ConfirmationController::confirm`] alone.
pub struct ConfirmationController<B: ResourceBinding> {
    api: Arc<dyn ResourceApi<B::Record>>,
    notifier: Arc<dyn Notifier>,
    list: Arc<ListController<B>>,
    gate: Mutex<ConfirmationGate<B::Record>>,
}

impl<B: ResourceBinding> ConfirmationController<B> {
    /// Creates a closed gate paired with a list.
    #[must_use]
    pub fn new(
        api: Arc<dyn ResourceApi<B::Record>>,
        notifier: Arc<dyn Notifier>,
        list: Arc<ListController<B>>,
    ) -> Self {
        Self {
            api,
            notifier,
            list,
            gate: Mutex::new(ConfirmationGate::Closed),
        }
    }

    /// Opens the gate for `record`.
    pub async fn request(&self, record: B::Record) {
        let mut gate = self.gate.lock().await;
        debug!(
            resource = B::NAME,
            record_id = %record.record_id(),
            replaced = gate.is_open(),
            "delete awaiting confirmation"
        );
        gate.request(record);
    }

    /// Closes the gate without deleting anything.
    pub async fn cancel(&self) -> Option<B::Record> {
        self.gate.lock().await.cancel()
    }

    /// Returns the record awaiting confirmation.
    pub async fn pending(&self) -> Option<B::Record> {
        self.gate.lock().await.target().cloned()
    }

    /// Deletes the pending record.
    ///
    /// The gate closes whatever the outcome. A failed delete notifies the
    /// admin; a successful one refreshes the list, clamping the page when the
    /// deleted row emptied the last one.
    pub async fn confirm(&self) -> AppResult<ConfirmOutcome> {
        let Some(target) = self.gate.lock().await.confirm() else {
            return Ok(ConfirmOutcome::NothingPending);
        };

        if !self.list.mount().is_mounted() {
            return Ok(ConfirmOutcome::Detached);
        }

        let token = self.list.token();
        if token.trim().is_empty() {
            return Err(self.list.unauthenticated());
        }

        let scope = self.list.query().await.scope().map(str::to_owned);
        if B::requires_scope()
            && let Err(error) = required_scope(B::NAME, scope.as_deref())
        {
            self.notifier
                .notify(Notification::error(B::NAME, error.message()));
            return Err(error);
        }

        let record_id = target.record_id();
        let response = self.api.delete(token, scope.as_deref(), record_id).await;

        if !self.list.mount().is_mounted() {
            debug!(resource = B::NAME, "dropping delete response after unmount");
            return Ok(ConfirmOutcome::Detached);
        }

        let receipt = match response {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(
                    resource = B::NAME,
                    record_id = %record_id,
                    error = %error,
                    "delete failed"
                );
                self.notifier
                    .notify(Notification::error(B::NAME, error.message()));
                return Err(error);
            }
        };

        if let Err(error) = self.list.reload_settled(ListQueryPatch::default()).await {
            debug!(resource = B::NAME, error = %error, "list refresh after delete failed");
        }

        let message = receipt
            .message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map_or_else(|| format!("{} deleted", B::NAME), str::to_owned);
        info!(resource = B::NAME, record_id = %record_id, "record deleted");
        self.notifier
            .notify(Notification::success(B::NAME, message));

        Ok(ConfirmOutcome::Deleted(receipt))
    }
}
