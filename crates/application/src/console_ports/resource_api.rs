use async_trait::async_trait;
use curator_core::AppResult;
use curator_domain::{ListQuery, ListResult, Payload, RecordId, ResourceRecord};
use serde_json::Value;

/// One page as reported by a list endpoint.
///
/// Fields the server omits fall back to the request values.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    /// Records on the page.
    pub items: Vec<R>,
    /// Page the server actually served.
    pub page: Option<u32>,
    /// Page size the server actually applied.
    pub page_size: Option<u32>,
    /// Total matching rows.
    pub total: Option<u64>,
    /// Page count reported by the server.
    pub total_pages: Option<u32>,
}

impl<R> ListPage<R> {
    /// Creates a complete page report.
    #[must_use]
    pub fn new(items: Vec<R>, page: u32, page_size: u32, total: u64) -> Self {
        Self {
            items,
            page: Some(page),
            page_size: Some(page_size),
            total: Some(total),
            total_pages: None,
        }
    }

    /// Reconciles the report against the request that produced it.
    ///
    /// Returns the page number the server reported together with the result
    /// to display; the result's page is clamped when the reported page lies
    /// beyond the last one.
    #[must_use]
    pub fn into_result(self, query: &ListQuery) -> (u32, ListResult<R>) {
        let page = self.page.unwrap_or(query.page()).max(1);
        let page_size = self.page_size.unwrap_or(query.page_size()).max(1);
        let item_count = u64::try_from(self.items.len()).unwrap_or(u64::MAX);
        let total = self.total.unwrap_or_else(|| match self.total_pages {
            Some(total_pages) => u64::from(total_pages) * u64::from(page_size),
            None => u64::from(page - 1) * u64::from(page_size) + item_count,
        });

        (
            page,
            ListResult::from_server_page(self.items, page, page_size, total),
        )
    }
}

/// Acknowledgement returned by mutation endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReceipt {
    /// Server message, shown verbatim when present.
    pub message: Option<String>,
    /// Remaining response fields.
    pub body: Value,
}

/// Port over the remote REST endpoints of one resource.
#[async_trait]
pub trait ResourceApi<R>: Send + Sync
where
    R: ResourceRecord,
{
    /// Lists one page of records.
    async fn list(&self, token: &str, query: &ListQuery) -> AppResult<ListPage<R>>;

    /// Creates a record.
    async fn create(
        &self,
        token: &str,
        scope: Option<&str>,
        payload: Payload,
    ) -> AppResult<MutationReceipt>;

    /// Replaces the editable fields of a record.
    async fn update(
        &self,
        token: &str,
        scope: Option<&str>,
        record_id: &RecordId,
        payload: Payload,
    ) -> AppResult<MutationReceipt>;

    /// Deletes a record.
    async fn delete(
        &self,
        token: &str,
        scope: Option<&str>,
        record_id: &RecordId,
    ) -> AppResult<MutationReceipt>;
}
