use std::collections::BTreeMap;

use curator_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Page size used when a page does not configure one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query field addressed by filter writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    /// One-based page number.
    Page,
    /// Rows per page.
    PageSize,
    /// Free-text search.
    Search,
    /// Status filter.
    Status,
    /// Parent identifier for nested resources.
    Scope,
    /// Resource-specific filter such as a date or an id.
    Field(String),
}

impl FilterKey {
    /// Parses a user-facing key name.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "page" => Self::Page,
            "page_size" | "pageSize" | "limit" | "size" => Self::PageSize,
            "q" | "search" => Self::Search,
            "status" => Self::Status,
            "scope" => Self::Scope,
            other => Self::Field(other.to_owned()),
        }
    }
}

/// Paginated and filtered query owned by one list controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    search: String,
    status: Option<String>,
    scope: Option<String>,
    filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    /// Creates a first-page query with the given page size.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            status: None,
            scope: None,
            filters: BTreeMap::new(),
        }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the rows per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the free-text search term.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    /// Returns the status filter.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the parent identifier for nested resources.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns resource-specific filters.
    #[must_use]
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Moves to a page, never below the first one.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Adopts the page and page size the server actually served.
    ///
    /// Unlike filter writes this never resets the page.
    pub fn reconcile(&mut self, page: u32, page_size: u32) {
        self.page = page.max(1);
        self.page_size = page_size.max(1);
    }

    /// Writes one query field from user input.
    ///
    /// Every key other than [`FilterKey::Page`] resets the page to 1. Empty
    /// values clear optional filters.
    pub fn set_filter(&mut self, key: FilterKey, value: &str) -> AppResult<()> {
        let value = value.trim();
        match key {
            FilterKey::Page => {
                self.page = parse_positive("page", value)?;
                return Ok(());
            }
            FilterKey::PageSize => self.page_size = parse_positive("page size", value)?,
            FilterKey::Search => self.search = value.to_owned(),
            FilterKey::Status => self.status = non_empty(value),
            FilterKey::Scope => self.scope = non_empty(value),
            FilterKey::Field(name) => {
                if name.trim().is_empty() {
                    return Err(AppError::Validation(
                        "filter name must not be empty".to_owned(),
                    ));
                }
                match non_empty(value) {
                    Some(value) => {
                        self.filters.insert(name, value);
                    }
                    None => {
                        self.filters.remove(name.as_str());
                    }
                }
            }
        }

        self.page = 1;
        Ok(())
    }

    /// Merges a partial query.
    ///
    /// A patch that changes any field other than the page and does not name a
    /// page itself lands on page 1.
    pub fn apply(&mut self, patch: ListQueryPatch) {
        let touches_filters = patch.touches_filters();

        if let Some(page_size) = patch.page_size {
            self.page_size = page_size.max(1);
        }
        if let Some(search) = patch.search {
            self.search = search.trim().to_owned();
        }
        if let Some(status) = patch.status {
            self.status = status.as_deref().and_then(non_empty);
        }
        if let Some(scope) = patch.scope {
            self.scope = scope.as_deref().and_then(non_empty);
        }
        for (name, value) in patch.filters {
            match value.as_deref().and_then(non_empty) {
                Some(value) => {
                    self.filters.insert(name, value);
                }
                None => {
                    self.filters.remove(name.as_str());
                }
            }
        }

        match patch.page {
            Some(page) => self.set_page(page),
            None if touches_filters => self.page = 1,
            None => {}
        }
    }
}

/// Partial [`ListQuery`] merged by a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQueryPatch {
    /// Page to request.
    pub page: Option<u32>,
    /// Rows per page.
    pub page_size: Option<u32>,
    /// Free-text search term.
    pub search: Option<String>,
    /// Status filter, `Some(None)` clears it.
    pub status: Option<Option<String>>,
    /// Parent identifier, `Some(None)` clears it.
    pub scope: Option<Option<String>>,
    /// Resource-specific filters, `None` values remove the filter.
    pub filters: BTreeMap<String, Option<String>>,
}

impl ListQueryPatch {
    /// Patch that only moves to a page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Returns whether the patch writes anything besides the page.
    #[must_use]
    pub fn touches_filters(&self) -> bool {
        self.page_size.is_some()
            || self.search.is_some()
            || self.status.is_some()
            || self.scope.is_some()
            || !self.filters.is_empty()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn parse_positive(label: &str, value: &str) -> AppResult<u32> {
    match value.parse::<u32>() {
        Ok(parsed) if parsed >= 1 => Ok(parsed),
        _ => Err(AppError::Validation(format!(
            "{label} must be a whole number of at least 1, got '{value}'"
        ))),
    }
}
