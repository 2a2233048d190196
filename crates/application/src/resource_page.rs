use std::sync::Arc;

use curator_core::{AppError, AppResult};
use curator_domain::{FilterKey, ListQuery, ListQueryPatch, RecordId, ResourceBinding};
use tracing::{debug, info};

use crate::console_ports::{Notification, Notifier, ResourceApi};
use crate::{
    ConfirmOutcome, ConfirmationController, ListController, MountHandle, MutationController,
    ReloadOutcome, SessionAccessor, SubmitOutcome,
};

/// Message shown when a status toggle arrives while another is saving.
pub const TOGGLE_BUSY_MESSAGE: &str = "another status change is still saving, try again";

/// What the table area of a page should render.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView<R> {
    /// A request is in flight.
    Loading,
    /// The last accepted result has no rows.
    Empty,
    /// Rows to render.
    Rows(Vec<R>),
}

/// Controllers of one admin resource page, wired together.
///
/// The session token is resolved exactly once, at mount time, and handed to
/// every controller. All controllers share one [`MountHandle`].
pub struct ResourcePage<B: ResourceBinding> {
    notifier: Arc<dyn Notifier>,
    mount: MountHandle,
    list: Arc<ListController<B>>,
    create: MutationController<B>,
    edit: MutationController<B>,
    toggle: MutationController<B>,
    delete: ConfirmationController<B>,
}

impl<B: ResourceBinding> ResourcePage<B> {
    /// Builds the page controllers.
    #[must_use]
    pub fn mount(
        session: &SessionAccessor,
        api: Arc<dyn ResourceApi<B::Record>>,
        notifier: Arc<dyn Notifier>,
        page_size: u32,
    ) -> Self {
        let token = session.get_token();
        info!(
            resource = B::NAME,
            authenticated = !token.is_empty(),
            page_size,
            "mounting resource page"
        );

        let mount = MountHandle::new();
        let list = Arc::new(ListController::new(
            api.clone(),
            notifier.clone(),
            token,
            mount.clone(),
            ListQuery::new(page_size),
        ));

        Self {
            create: MutationController::new(api.clone(), notifier.clone(), list.clone()),
            edit: MutationController::new(api.clone(), notifier.clone(), list.clone()),
            toggle: MutationController::new(api.clone(), notifier.clone(), list.clone()),
            delete: ConfirmationController::new(api, notifier.clone(), list.clone()),
            notifier,
            mount,
            list,
        }
    }

    /// Runs the initial load.
    pub async fn open(&self) -> AppResult<ReloadOutcome> {
        self.list.reload_settled(ListQueryPatch::default()).await
    }

    /// Writes one filter and reloads once.
    pub async fn apply_filter(&self, key: FilterKey, value: &str) -> AppResult<ReloadOutcome> {
        if let Err(error) = self.list.set_filter(key, value).await {
            self.notifier
                .notify(Notification::error(B::NAME, error.message()));
            return Err(error);
        }

        self.list.reload_settled(ListQueryPatch::default()).await
    }

    /// Moves to another page.
    pub async fn go_to_page(&self, page: u32) -> AppResult<ReloadOutcome> {
        self.list.reload_settled(ListQueryPatch::page(page)).await
    }

    /// Loads a row of the current page into the edit form.
    pub async fn begin_edit(&self, record_id: &RecordId) -> AppResult<()> {
        let record = self.row(record_id).await?;
        self.edit.start_edit(&record).await;
        Ok(())
    }

    /// Flips the binding's status flag on one row and saves it.
    pub async fn toggle_status(&self, record_id: &RecordId) -> AppResult<SubmitOutcome> {
        let Some(field) = B::toggle_field() else {
            let error = AppError::Validation(format!("{} has no status toggle", B::NAME));
            self.notifier
                .notify(Notification::error(B::NAME, error.message()));
            return Err(error);
        };

        if self.toggle.is_submitting() {
            return Ok(self.toggle_dropped(record_id));
        }

        let record = self.row(record_id).await?;
        self.toggle.start_edit(&record).await;
        let next = !self.toggle.draft().await.flag(field);
        debug!(
            resource = B::NAME,
            record_id = %record_id,
            field,
            next,
            "toggling status"
        );
        self.toggle.set_flag(field, next).await;
        match self.toggle.submit().await? {
            SubmitOutcome::Ignored => Ok(self.toggle_dropped(record_id)),
            outcome => Ok(outcome),
        }
    }

    fn toggle_dropped(&self, record_id: &RecordId) -> SubmitOutcome {
        debug!(resource = B::NAME, record_id = %record_id, "toggle dropped while another saves");
        self.notifier
            .notify(Notification::error(B::NAME, TOGGLE_BUSY_MESSAGE));
        SubmitOutcome::Ignored
    }

    /// Opens the delete confirmation for a row of the current page.
    pub async fn request_delete(&self, record_id: &RecordId) -> AppResult<()> {
        let record = self.row(record_id).await?;
        self.delete.request(record).await;
        Ok(())
    }

    /// Deletes the row awaiting confirmation.
    pub async fn confirm_delete(&self) -> AppResult<ConfirmOutcome> {
        self.delete.confirm().await
    }

    /// Discards the pending delete.
    pub async fn cancel_delete(&self) -> Option<B::Record> {
        self.delete.cancel().await
    }

    /// Returns what the table should render.
    pub async fn table_view(&self) -> TableView<B::Record> {
        let snapshot = self.list.snapshot().await;
        if snapshot.is_loading {
            TableView::Loading
        } else if snapshot.result.is_empty() {
            TableView::Empty
        } else {
            TableView::Rows(snapshot.result.items().to_vec())
        }
    }

    /// Returns the list controller.
    #[must_use]
    pub fn list(&self) -> &ListController<B> {
        self.list.as_ref()
    }

    /// Returns the add form.
    #[must_use]
    pub fn create_form(&self) -> &MutationController<B> {
        &self.create
    }

    /// Returns the edit form.
    #[must_use]
    pub fn edit_form(&self) -> &MutationController<B> {
        &self.edit
    }

    /// Returns the delete confirmation.
    #[must_use]
    pub fn delete_gate(&self) -> &ConfirmationController<B> {
        &self.delete
    }

    /// Detaches every controller; late responses are dropped.
    pub fn unmount(&self) {
        debug!(resource = B::NAME, "unmounting resource page");
        self.mount.unmount();
    }

    async fn row(&self, record_id: &RecordId) -> AppResult<B::Record> {
        match self.list.find(record_id).await {
            Some(record) => Ok(record),
            None => {
                let error =
                    AppError::NotFound(format!("{} {record_id} is not on this page", B::NAME));
                self.notifier
                    .notify(Notification::error(B::NAME, error.message()));
                Err(error)
            }
        }
    }
}
