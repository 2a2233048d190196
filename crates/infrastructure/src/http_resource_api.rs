use std::marker::PhantomData;

use async_trait::async_trait;
use curator_application::{ListPage, MutationReceipt, ResourceApi};
use curator_core::{AppError, AppResult};
use curator_domain::{ListQuery, Payload, RecordId, ResourceBinding, ResourceRecord};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// REST adapter for one admin resource.
pub struct HttpResourceApi<B> {
    http_client: reqwest::Client,
    base_url: Url,
    _binding: PhantomData<fn() -> B>,
}

impl<B: ResourceBinding> HttpResourceApi<B> {
    /// Creates an adapter rooted at `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let mut parsed = Url::parse(base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        parsed.set_query(None);
        parsed.set_fragment(None);

        Ok(Self {
            http_client,
            base_url: parsed,
            _binding: PhantomData,
        })
    }

    fn collection_url(&self, scope: Option<&str>) -> AppResult<Url> {
        self.url_with(B::collection_segments(scope)?)
    }

    fn member_url(&self, scope: Option<&str>, record_id: &RecordId) -> AppResult<Url> {
        let mut segments = B::collection_segments(scope)?;
        segments.push(record_id.as_str().to_owned());
        self.url_with(segments)
    }

    /// Appends percent-encoded `segments` to the base path.
    fn url_with(&self, segments: Vec<String>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<Value> {
        let response = request.send().await.map_err(|error| {
            AppError::Unavailable(format!("could not reach the admin API: {error}"))
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|error| {
            AppError::Unavailable(format!("admin API response was interrupted: {error}"))
        })?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text.as_str()).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_response(status, &body))
        }
    }

    async fn mutate(
        &self,
        method: reqwest::Method,
        url: Url,
        token: &str,
        payload: Option<Payload>,
    ) -> AppResult<MutationReceipt> {
        debug!(resource = B::NAME, %method, url = url.as_str(), "sending mutation");
        let mut request = self.http_client.request(method, url).bearer_auth(token);
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let body = self.send(request).await?;
        Ok(receipt_from_body(body))
    }
}

#[async_trait]
impl<B: ResourceBinding> ResourceApi<B::Record> for HttpResourceApi<B> {
    async fn list(&self, token: &str, query: &ListQuery) -> AppResult<ListPage<B::Record>> {
        let url = self.collection_url(query.scope())?;
        debug!(
            resource = B::NAME,
            url = url.as_str(),
            page = query.page(),
            "listing records"
        );

        let request = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(&list_parameters(query));
        let body = self.send(request).await?;

        list_page_from_body(body)
    }

    async fn create(
        &self,
        token: &str,
        scope: Option<&str>,
        payload: Payload,
    ) -> AppResult<MutationReceipt> {
        let url = self.collection_url(scope)?;
        self.mutate(reqwest::Method::POST, url, token, Some(payload))
            .await
    }

    async fn update(
        &self,
        token: &str,
        scope: Option<&str>,
        record_id: &RecordId,
        payload: Payload,
    ) -> AppResult<MutationReceipt> {
        let url = self.member_url(scope, record_id)?;
        self.mutate(reqwest::Method::PUT, url, token, Some(payload))
            .await
    }

    async fn delete(
        &self,
        token: &str,
        scope: Option<&str>,
        record_id: &RecordId,
    ) -> AppResult<MutationReceipt> {
        let url = self.member_url(scope, record_id)?;
        self.mutate(reqwest::Method::DELETE, url, token, None).await
    }
}

fn list_parameters(query: &ListQuery) -> Vec<(String, String)> {
    let page_size = query.page_size().to_string();
    let mut parameters = vec![
        ("page".to_owned(), query.page().to_string()),
        ("pageSize".to_owned(), page_size.clone()),
        ("limit".to_owned(), page_size),
    ];

    if !query.search().is_empty() {
        parameters.push(("q".to_owned(), query.search().to_owned()));
    }
    if let Some(status) = query.status() {
        parameters.push(("status".to_owned(), status.to_owned()));
    }
    for (name, value) in query.filters() {
        parameters.push((name.clone(), value.clone()));
    }

    parameters
}

fn list_page_from_body<R: ResourceRecord>(body: Value) -> AppResult<ListPage<R>> {
    let (items, meta) = match body {
        Value::Array(items) => (items, Map::new()),
        Value::Object(mut object) => {
            let items = match object.remove("items").or_else(|| object.remove("data")) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(AppError::Internal(
                        "list response items must be an array".to_owned(),
                    ));
                }
            };
            (items, object)
        }
        _ => {
            return Err(AppError::Internal(
                "list response must be a JSON object or array".to_owned(),
            ));
        }
    };

    let items = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<R>, _>>()
        .map_err(|error| AppError::Internal(format!("unexpected record shape: {error}")))?;

    Ok(ListPage {
        items,
        page: read_number(&meta, &["page"]).and_then(|value| u32::try_from(value).ok()),
        page_size: read_number(&meta, &["pageSize", "page_size", "limit"])
            .and_then(|value| u32::try_from(value).ok()),
        total: read_number(&meta, &["total"]),
        total_pages: read_number(&meta, &["totalPages", "total_pages"])
            .and_then(|value| u32::try_from(value).ok()),
    })
}

fn read_number(meta: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match meta.get(*key)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn receipt_from_body(body: Value) -> MutationReceipt {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned);
    MutationReceipt { message, body }
}

fn error_from_response(status: StatusCode, body: &Value) -> AppError {
    let message = match body {
        Value::String(text) if !text.trim().is_empty() => text.trim().to_owned(),
        _ => body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("admin API returned {status}")),
    };

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(message)
        }
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}
