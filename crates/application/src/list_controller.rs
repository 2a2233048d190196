use std::marker::PhantomData;
use std::sync::Arc;

use curator_core::{AppError, AppResult};
use curator_domain::{
    FilterKey, ListQuery, ListQueryPatch, ListResult, RecordId, ResourceBinding, ResourceRecord,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::MountHandle;
use crate::console_ports::{Notification, Notifier, ResourceApi};

/// Message shown when an operation starts without a session token.
pub const REAUTHENTICATE_MESSAGE: &str = "please re-authenticate";

/// Effect of one reload on the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The response replaced the displayed result.
    Applied,
    /// The response was applied but the served page lay beyond the last one;
    /// the query now points at `to` and should be fetched again.
    Clamped {
        /// Page the server served.
        from: u32,
        /// Last valid page.
        to: u32,
    },
    /// Required context (the parent identifier) is missing; nothing was sent.
    Skipped,
    /// A newer request was issued while this one was in flight.
    Superseded,
    /// The page unmounted before the response arrived.
    Detached,
}

/// Point-in-time copy of list state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<R> {
    /// Current query.
    pub query: ListQuery,
    /// Last accepted result.
    pub result: ListResult<R>,
    /// Whether the latest request is still in flight.
    pub is_loading: bool,
}

struct ListState<R> {
    query: ListQuery,
    result: ListResult<R>,
    is_loading: bool,
    issued: u64,
}

/// Owns the query, result and loading flag of one paginated resource table.
///
/// Every request is tagged with a sequence number; only the response to the
/// most recently issued request may touch state.
pub struct ListController<B: ResourceBinding> {
    api: Arc<dyn ResourceApi<B::Record>>,
    notifier: Arc<dyn Notifier>,
    token: String,
    mount: MountHandle,
    state: Mutex<ListState<B::Record>>,
    _binding: PhantomData<fn() -> B>,
}

impl<B: ResourceBinding> ListController<B> {
    /// Creates a controller for a page mounted with `token`.
    #[must_use]
    pub fn new(
        api: Arc<dyn ResourceApi<B::Record>>,
        notifier: Arc<dyn Notifier>,
        token: impl Into<String>,
        mount: MountHandle,
        query: ListQuery,
    ) -> Self {
        let result = ListResult::empty(query.page_size());
        Self {
            api,
            notifier,
            token: token.into(),
            mount,
            state: Mutex::new(ListState {
                query,
                result,
                is_loading: false,
                issued: 0,
            }),
            _binding: PhantomData,
        }
    }

    /// Merges `patch` into the query and fetches the resulting page.
    ///
    /// Failures are reported through the notifier and leave the previous
    /// result visible; the error is also returned to the caller.
    pub async fn reload(&self, patch: ListQueryPatch) -> AppResult<ReloadOutcome> {
        if !self.mount.is_mounted() {
            return Ok(ReloadOutcome::Detached);
        }

        let (sequence, query) = {
            let mut state = self.state.lock().await;
            state.query.apply(patch);

            if B::requires_scope() && state.query.scope().is_none() {
                debug!(resource = B::NAME, "list reload skipped until a parent id is set");
                return Ok(ReloadOutcome::Skipped);
            }

            if self.token.trim().is_empty() {
                drop(state);
                return Err(self.unauthenticated());
            }

            state.issued += 1;
            state.is_loading = true;
            (state.issued, state.query.clone())
        };

        debug!(
            resource = B::NAME,
            sequence,
            page = query.page(),
            page_size = query.page_size(),
            "fetching list page"
        );
        let response = self.api.list(self.token.as_str(), &query).await;

        if !self.mount.is_mounted() {
            debug!(resource = B::NAME, sequence, "dropping list response after unmount");
            return Ok(ReloadOutcome::Detached);
        }

        let mut state = self.state.lock().await;
        let is_latest = sequence == state.issued;
        if is_latest {
            state.is_loading = false;
        }

        match response {
            Ok(page) if is_latest => {
                let (served_page, result) = page.into_result(&query);
                state.query.reconcile(result.page(), result.page_size());
                let shown_page = result.page();
                state.result = result;

                if shown_page == served_page {
                    Ok(ReloadOutcome::Applied)
                } else {
                    debug!(
                        resource = B::NAME,
                        from = served_page,
                        to = shown_page,
                        "clamped page beyond the last one"
                    );
                    Ok(ReloadOutcome::Clamped {
                        from: served_page,
                        to: shown_page,
                    })
                }
            }
            Ok(_) => {
                debug!(
                    resource = B::NAME,
                    sequence,
                    latest = state.issued,
                    "discarding superseded list response"
                );
                Ok(ReloadOutcome::Superseded)
            }
            Err(error) => {
                drop(state);
                warn!(resource = B::NAME, sequence, error = %error, "list reload failed");
                self.notifier
                    .notify(Notification::error(B::NAME, error.message()));
                Err(error)
            }
        }
    }

    /// Reloads and, when the served page turned out to be past the end,
    /// fetches the clamped page once more.
    pub async fn reload_settled(&self, patch: ListQueryPatch) -> AppResult<ReloadOutcome> {
        match self.reload(patch).await? {
            ReloadOutcome::Clamped { .. } => self.reload(ListQueryPatch::default()).await,
            outcome => Ok(outcome),
        }
    }

    /// Writes one query field without fetching.
    ///
    /// Every key other than the page resets the page to 1. A request still in
    /// flight was built from the old query, so its response is discarded.
    pub async fn set_filter(&self, key: FilterKey, value: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.query.set_filter(key, value)?;
        if state.is_loading {
            debug!(
                resource = B::NAME,
                superseded = state.issued,
                "query changed while a list request was in flight"
            );
        }
        state.issued += 1;
        state.is_loading = false;
        Ok(())
    }

    /// Returns the current query.
    pub async fn query(&self) -> ListQuery {
        self.state.lock().await.query.clone()
    }

    /// Returns the last accepted result.
    pub async fn result(&self) -> ListResult<B::Record> {
        self.state.lock().await.result.clone()
    }

    /// Returns whether the latest request is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading
    }

    /// Returns a copy of the full list state.
    pub async fn snapshot(&self) -> ListSnapshot<B::Record> {
        let state = self.state.lock().await;
        ListSnapshot {
            query: state.query.clone(),
            result: state.result.clone(),
            is_loading: state.is_loading,
        }
    }

    /// Finds a record on the current page.
    pub async fn find(&self, record_id: &RecordId) -> Option<B::Record> {
        self.state
            .lock()
            .await
            .result
            .items()
            .iter()
            .find(|record| record.record_id() == record_id)
            .cloned()
    }

    /// Returns the token the page was mounted with.
    pub(crate) fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Returns the mount handle shared with sibling controllers.
    pub(crate) fn mount(&self) -> &MountHandle {
        &self.mount
    }

    /// Reports a missing session and returns the matching error.
    pub(crate) fn unauthenticated(&self) -> AppError {
        warn!(resource = B::NAME, "operation blocked without a session token");
        self.notifier
            .notify(Notification::error(B::NAME, REAUTHENTICATE_MESSAGE));
        AppError::Unauthorized(REAUTHENTICATE_MESSAGE.to_owned())
    }
}

#[cfg(test)]
mod tests;
