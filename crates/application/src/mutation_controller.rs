use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use curator_core::{AppError, AppResult};
use curator_domain::{ListQueryPatch, MutationDraft, Payload, ResourceBinding, required_scope};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ListController;
use crate::console_ports::{MutationReceipt, Notification, Notifier, ResourceApi};

/// Result of one [`MutationController::submit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The draft created a record.
    Created(MutationReceipt),
    /// The draft updated an existing record.
    Updated(MutationReceipt),
    /// Another submit was still in flight; nothing was sent.
    Ignored,
    /// The page unmounted before the mutation resolved.
    Detached,
}

/// Owns one form draft and submits it through the resource API.
///
/// Every create or edit form on a page gets its own controller, so drafts are
/// never shared.
pub struct MutationController<B: ResourceBinding> {
    api: Arc<dyn ResourceApi<B::Record>>,
    notifier: Arc<dyn Notifier>,
    list: Arc<ListController<B>>,
    draft: Mutex<MutationDraft>,
    submitting: AtomicBool,
}

impl<B: ResourceBinding> MutationController<B> {
    /// Creates an add-mode controller paired with a list.
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
            draft: Mutex::new(MutationDraft::new()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Loads the editable fields of `record` and switches to edit mode.
    pub async fn start_edit(&self, record: &B::Record) {
        *self.draft.lock().await = B::draft_from_record(record);
    }

    /// Writes one text field.
    pub async fn set_text(&self, field: &str, value: &str) {
        self.draft.lock().await.set_text(field, value);
    }

    /// Writes one flag field.
    pub async fn set_flag(&self, field: &str, value: bool) {
        self.draft.lock().await.set_flag(field, value);
    }

    /// Returns a copy of the current draft.
    pub async fn draft(&self) -> MutationDraft {
        self.draft.lock().await.clone()
    }

    /// Discards the draft and returns to add mode.
    pub async fn cancel(&self) {
        *self.draft.lock().await = MutationDraft::new();
    }

    /// Returns whether a submit is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validates, normalizes and submits the draft.
    ///
    /// A call made while another submit is in flight returns
    /// [`SubmitOutcome::Ignored`] without touching the network. Failures keep
    /// the draft intact, notify the admin and are returned to the caller.
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        if !self.list.mount().is_mounted() {
            return Ok(SubmitOutcome::Detached);
        }

        let Some(_guard) = SubmitGuard::acquire(&self.submitting) else {
            debug!(resource = B::NAME, "submit ignored while another is in flight");
            return Ok(SubmitOutcome::Ignored);
        };

        let token = self.list.token();
        if token.trim().is_empty() {
            return Err(self.list.unauthenticated());
        }

        let draft = self.draft.lock().await.clone();
        let (scope, payload) = match self.prepare(&draft).await {
            Ok(prepared) => prepared,
            Err(error) => {
                debug!(resource = B::NAME, error = %error, "draft rejected before submit");
                return Err(self.report(error));
            }
        };

        let response = match draft.record_id() {
            Some(record_id) => {
                self.api
                    .update(token, scope.as_deref(), record_id, payload)
                    .await
            }
            None => self.api.create(token, scope.as_deref(), payload).await,
        };

        if !self.list.mount().is_mounted() {
            debug!(resource = B::NAME, "dropping mutation response after unmount");
            return Ok(SubmitOutcome::Detached);
        }

        let receipt = match response {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(resource = B::NAME, error = %error, "mutation failed");
                return Err(self.report(error));
            }
        };

        *self.draft.lock().await = MutationDraft::new();

        let patch = if draft.is_edit() {
            ListQueryPatch::default()
        } else {
            ListQueryPatch::page(1)
        };
        if let Err(error) = self.list.reload_settled(patch).await {
            debug!(resource = B::NAME, error = %error, "list refresh after mutation failed");
        }

        let fallback = if draft.is_edit() { "updated" } else { "created" };
        let message = receipt
            .message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map_or_else(|| format!("{} {fallback}", B::NAME), str::to_owned);
        info!(resource = B::NAME, record_id = ?draft.record_id(), "mutation applied");
        self.notifier
            .notify(Notification::success(B::NAME, message));

        Ok(if draft.is_edit() {
            SubmitOutcome::Updated(receipt)
        } else {
            SubmitOutcome::Created(receipt)
        })
    }

    async fn prepare(&self, draft: &MutationDraft) -> AppResult<(Option<String>, Payload)> {
        let scope = self.list.query().await.scope().map(str::to_owned);
        if B::requires_scope() {
            required_scope(B::NAME, scope.as_deref())?;
        }

        B::validate(draft)?;
        let payload = B::normalize(draft)?;
        Ok((scope, payload))
    }

    fn report(&self, error: AppError) -> AppError {
        self.notifier
            .notify(Notification::error(B::NAME, error.message()));
        error
    }
}

struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
