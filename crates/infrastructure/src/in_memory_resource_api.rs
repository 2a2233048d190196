use std::marker::PhantomData;

use async_trait::async_trait;
use curator_application::{ListPage, MutationReceipt, ResourceApi};
use curator_core::{AppError, AppResult};
use curator_domain::{ListQuery, Payload, RecordId, ResourceBinding, ResourceRecord};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// In-memory resource store answering like the admin API.
///
/// Used for offline demos of the console and as a reference adapter in tests.
pub struct InMemoryResourceApi<B: ResourceBinding> {
    state: RwLock<StoreState<B::Record>>,
    _binding: PhantomData<fn() -> B>,
}

struct StoreState<R> {
    records: Vec<R>,
    next_id: u64,
}

impl<B: ResourceBinding> Default for InMemoryResourceApi<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ResourceBinding> InMemoryResourceApi<B> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store seeded with `records`.
    #[must_use]
    pub fn with_records(records: Vec<B::Record>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| record.record_id().as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: RwLock::new(StoreState { records, next_id }),
            _binding: PhantomData,
        }
    }

    /// Returns every stored record.
    pub async fn records(&self) -> Vec<B::Record> {
        self.state.read().await.records.clone()
    }
}

#[async_trait]
impl<B: ResourceBinding> ResourceApi<B::Record> for InMemoryResourceApi<B> {
    async fn list(&self, _token: &str, query: &ListQuery) -> AppResult<ListPage<B::Record>> {
        B::collection_segments(query.scope())?;
        let state = self.state.read().await;

        let mut matching = Vec::new();
        for record in &state.records {
            let object = to_object(record)?;
            if matches_query::<B>(&object, query) {
                matching.push(record.clone());
            }
        }

        let page_size = usize::try_from(query.page_size()).unwrap_or(usize::MAX);
        let offset = usize::try_from(query.page().saturating_sub(1))
            .unwrap_or(usize::MAX)
            .saturating_mul(page_size);
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let items = matching.into_iter().skip(offset).take(page_size).collect();

        Ok(ListPage::new(items, query.page(), query.page_size(), total))
    }

    async fn create(
        &self,
        _token: &str,
        scope: Option<&str>,
        payload: Payload,
    ) -> AppResult<MutationReceipt> {
        B::collection_segments(scope)?;
        let mut state = self.state.write().await;

        let record_id = state.next_id;
        let mut object = payload;
        object.insert("id".to_owned(), Value::from(record_id));
        if let (Some(field), Some(scope)) = (B::scope_field(), scope) {
            object.insert(field.to_owned(), Value::from(scope));
        }

        let record = from_object::<B::Record>(object)?;
        state.next_id += 1;
        state.records.push(record);

        Ok(receipt(format!("{} created", B::NAME), record_id.to_string()))
    }

    async fn update(
        &self,
        _token: &str,
        scope: Option<&str>,
        record_id: &RecordId,
        payload: Payload,
    ) -> AppResult<MutationReceipt> {
        B::collection_segments(scope)?;
        let mut state = self.state.write().await;

        let position = position_of::<B>(&state.records, record_id)?;
        let mut object = to_object(&state.records[position])?;
        object.extend(payload);
        state.records[position] = from_object(object)?;

        Ok(receipt(format!("{} updated", B::NAME), record_id.to_string()))
    }

    async fn delete(
        &self,
        _token: &str,
        scope: Option<&str>,
        record_id: &RecordId,
    ) -> AppResult<MutationReceipt> {
        B::collection_segments(scope)?;
        let mut state = self.state.write().await;

        let position = position_of::<B>(&state.records, record_id)?;
        state.records.remove(position);

        Ok(receipt(format!("{} deleted", B::NAME), record_id.to_string()))
    }
}

fn position_of<B: ResourceBinding>(
    records: &[B::Record],
    record_id: &RecordId,
) -> AppResult<usize> {
    records
        .iter()
        .position(|record| record.record_id() == record_id)
        .ok_or_else(|| AppError::NotFound(format!("{} {record_id} does not exist", B::NAME)))
}

fn matches_query<B: ResourceBinding>(object: &Map<String, Value>, query: &ListQuery) -> bool {
    let search = query.search().to_lowercase();
    if !search.is_empty()
        && !object
            .values()
            .any(|value| value_text(value).to_lowercase().contains(search.as_str()))
    {
        return false;
    }

    if let Some(status) = query.status()
        && !matches_status::<B>(object, status)
    {
        return false;
    }

    if let (Some(field), Some(scope)) = (B::scope_field(), query.scope())
        && object.get(field).map(value_text).as_deref() != Some(scope)
    {
        return false;
    }

    query
        .filters()
        .iter()
        .all(|(name, expected)| {
            object.get(name).map(value_text).as_deref() == Some(expected.as_str())
        })
}

fn matches_status<B: ResourceBinding>(object: &Map<String, Value>, status: &str) -> bool {
    if let Some(value) = object.get("status") {
        return value_text(value).eq_ignore_ascii_case(status);
    }

    match B::toggle_field().and_then(|field| object.get(field)) {
        Some(Value::Bool(active)) => match status.to_ascii_lowercase().as_str() {
            "active" | "true" => *active,
            "inactive" | "false" => !*active,
            _ => false,
        },
        _ => false,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn receipt(message: String, record_id: String) -> MutationReceipt {
    let body = serde_json::json!({ "message": message.as_str(), "id": record_id.as_str() });
    MutationReceipt {
        message: Some(message),
        body,
    }
}

fn to_object<R: ResourceRecord>(record: &R) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(AppError::Internal(
            "record did not serialize to an object".to_owned(),
        )),
        Err(error) => Err(AppError::Internal(format!(
            "record serialization failed: {error}"
        ))),
    }
}

fn from_object<R: ResourceRecord>(object: Map<String, Value>) -> AppResult<R> {
    serde_json::from_value(Value::Object(object)).map_err(|error| {
        AppError::Validation(format!("payload does not form a record: {error}"))
    })
}

#[cfg(test)]
mod tests;
