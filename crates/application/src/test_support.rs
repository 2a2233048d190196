//! Fakes shared by controller tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use curator_core::{AppError, AppResult};
use curator_domain::{
    Badge, BadgeBinding, ListQuery, Payload, RecordId, ResourceBinding, ResourceRecord,
};
use serde_json::Value;
use tokio::sync::{Mutex, oneshot};

use crate::console_ports::{ListPage, MutationReceipt, Notification, Notifier, ResourceApi};
use crate::{ListController, MountHandle};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedMutation {
    Create(Option<String>, Payload),
    Update(RecordId, Payload),
    Delete(RecordId),
}

pub(crate) struct FakeResourceApi<R> {
    pub(crate) records: Mutex<Vec<R>>,
    pub(crate) list_calls: Mutex<Vec<ListQuery>>,
    pub(crate) mutations: Mutex<Vec<RecordedMutation>>,
    pub(crate) list_holds: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    pub(crate) mutation_hold: Mutex<Option<oneshot::Receiver<()>>>,
    pub(crate) list_failure: Mutex<Option<AppError>>,
    pub(crate) mutation_failure: Mutex<Option<AppError>>,
    next_id: Mutex<i64>,
}

impl<R: ResourceRecord> FakeResourceApi<R> {
    pub(crate) fn with_records(records: Vec<R>) -> Self {
        Self {
            next_id: Mutex::new(i64::try_from(records.len()).unwrap_or(0) + 1000),
            records: Mutex::new(records),
            list_calls: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
            list_holds: Mutex::new(HashMap::new()),
            mutation_hold: Mutex::new(None),
            list_failure: Mutex::new(None),
            mutation_failure: Mutex::new(None),
        }
    }

    /// Makes the next list call searching for `search` wait for the returned sender.
    pub(crate) async fn hold_list(&self, search: &str) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.list_holds
            .lock()
            .await
            .insert(search.to_owned(), receiver);
        sender
    }

    /// Makes the next mutation wait for the returned sender.
    pub(crate) async fn hold_mutation(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.mutation_hold.lock().await = Some(receiver);
        sender
    }

    pub(crate) async fn fail_lists_with(&self, error: Option<AppError>) {
        *self.list_failure.lock().await = error;
    }

    pub(crate) async fn fail_mutations_with(&self, error: Option<AppError>) {
        *self.mutation_failure.lock().await = error;
    }

    pub(crate) async fn list_call_count(&self) -> usize {
        self.list_calls.lock().await.len()
    }

    pub(crate) async fn mutation_count(&self) -> usize {
        self.mutations.lock().await.len()
    }

    pub(crate) async fn wait_for_list_calls(&self, count: usize) {
        while self.list_call_count().await < count {
            tokio::task::yield_now().await;
        }
    }

    pub(crate) async fn wait_for_mutations(&self, count: usize) {
        while self.mutation_count().await < count {
            tokio::task::yield_now().await;
        }
    }

    async fn finish_mutation(&self, mutation: RecordedMutation) -> AppResult<MutationReceipt> {
        self.mutations.lock().await.push(mutation.clone());

        let hold = self.mutation_hold.lock().await.take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }

        if let Some(error) = self.mutation_failure.lock().await.clone() {
            return Err(error);
        }

        let mut records = self.records.lock().await;
        match mutation {
            RecordedMutation::Create(_, payload) => {
                let mut next_id = self.next_id.lock().await;
                *next_id += 1;
                let mut object = payload;
                object.insert("id".to_owned(), Value::from(*next_id));
                records.push(from_object(object)?);
                Ok(receipt("created"))
            }
            RecordedMutation::Update(record_id, payload) => {
                let position = records
                    .iter()
                    .position(|record| record.record_id() == &record_id)
                    .ok_or_else(|| AppError::NotFound(format!("record {record_id}")))?;
                let mut object = to_object(&records[position])?;
                object.extend(payload);
                records[position] = from_object(object)?;
                Ok(receipt("saved"))
            }
            RecordedMutation::Delete(record_id) => {
                let before = records.len();
                records.retain(|record| record.record_id() != &record_id);
                if records.len() == before {
                    return Err(AppError::NotFound(format!("record {record_id}")));
                }
                Ok(receipt("deleted"))
            }
        }
    }
}

fn receipt(message: &str) -> MutationReceipt {
    MutationReceipt {
        message: Some(message.to_owned()),
        body: Value::Null,
    }
}

fn to_object<R: ResourceRecord>(record: &R) -> AppResult<Payload> {
    match serde_json::to_value(record) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(AppError::Internal("record is not an object".to_owned())),
    }
}

fn from_object<R: ResourceRecord>(object: Payload) -> AppResult<R> {
    serde_json::from_value(Value::Object(object))
        .map_err(|error| AppError::Internal(format!("invalid record: {error}")))
}

#[async_trait]
impl<R: ResourceRecord> ResourceApi<R> for FakeResourceApi<R> {
    async fn list(&self, token: &str, query: &ListQuery) -> AppResult<ListPage<R>> {
        assert!(!token.is_empty(), "list called without a token");
        self.list_calls.lock().await.push(query.clone());

        let hold = self.list_holds.lock().await.remove(query.search());
        if let Some(hold) = hold {
            let _ = hold.await;
        }

        if let Some(error) = self.list_failure.lock().await.clone() {
            return Err(error);
        }

        let search = query.search().to_lowercase();
        let matching: Vec<R> = self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| {
                search.is_empty()
                    || serde_json::to_string(record)
                        .map(|text| text.to_lowercase().contains(search.as_str()))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();

        let page_size = usize::try_from(query.page_size()).unwrap_or(usize::MAX);
        let offset = usize::try_from(query.page() - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(page_size);
        let items = matching.iter().skip(offset).take(page_size).cloned().collect();

        Ok(ListPage::new(
            items,
            query.page(),
            query.page_size(),
            u64::try_from(matching.len()).unwrap_or(u64::MAX),
        ))
    }

    async fn create(
        &self,
        _token: &str,
        scope: Option<&str>,
        payload: Payload,
    ) -> AppResult<MutationReceipt> {
        self.finish_mutation(RecordedMutation::Create(scope.map(str::to_owned), payload))
            .await
    }

    async fn update(
        &self,
        _token: &str,
        _scope: Option<&str>,
        record_id: &RecordId,
        payload: Payload,
    ) -> AppResult<MutationReceipt> {
        self.finish_mutation(RecordedMutation::Update(record_id.clone(), payload))
            .await
    }

    async fn delete(
        &self,
        _token: &str,
        _scope: Option<&str>,
        record_id: &RecordId,
    ) -> AppResult<MutationReceipt> {
        self.finish_mutation(RecordedMutation::Delete(record_id.clone()))
            .await
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|notifications| notifications.clone())
            .unwrap_or_default()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

pub(crate) fn badge(id: i64, name: &str, is_active: bool) -> Badge {
    Badge {
        id: RecordId::from(id),
        name: name.to_owned(),
        description: None,
        icon_url: None,
        is_active,
    }
}

pub(crate) fn badges(count: i64) -> Vec<Badge> {
    (1..=count)
        .map(|id| badge(id, format!("Badge {id}").as_str(), true))
        .collect()
}

pub(crate) fn badge_list(
    api: &Arc<FakeResourceApi<Badge>>,
    notifier: &Arc<RecordingNotifier>,
    token: &str,
    page_size: u32,
) -> Arc<ListController<BadgeBinding>> {
    list_for::<BadgeBinding>(api, notifier, token, page_size)
}

pub(crate) fn list_for<B: ResourceBinding>(
    api: &Arc<FakeResourceApi<B::Record>>,
    notifier: &Arc<RecordingNotifier>,
    token: &str,
    page_size: u32,
) -> Arc<ListController<B>> {
    Arc::new(ListController::new(
        api.clone(),
        notifier.clone(),
        token,
        MountHandle::new(),
        ListQuery::new(page_size),
    ))
}
