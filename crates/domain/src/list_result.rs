use serde::{Deserialize, Serialize};

/// Returns the number of pages needed for `total` rows, never less than one.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamps a page number into `[1, total_pages]`.
#[must_use]
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// One page of server-backed records.
///
/// Replaced wholesale on every accepted fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult<R> {
    items: Vec<R>,
    page: u32,
    page_size: u32,
    total: u64,
}

impl<R> ListResult<R> {
    /// Creates the placeholder shown before the first fetch.
    #[must_use]
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// Creates a result from an authoritative server page.
    ///
    /// Items beyond the page size are dropped and the page is clamped into
    /// the valid range for `total`.
    #[must_use]
    pub fn from_server_page(mut items: Vec<R>, page: u32, page_size: u32, total: u64) -> Self {
        let page_size = page_size.max(1);
        items.truncate(usize::try_from(page_size).unwrap_or(usize::MAX));

        Self {
            items,
            page: clamp_page(page, total_pages(total, page_size)),
            page_size,
            total,
        }
    }

    /// Returns the records on this page.
    #[must_use]
    pub fn items(&self) -> &[R] {
        self.items.as_slice()
    }

    /// Returns the page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the rows per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the total number of matching rows.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of pages, at least one.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    /// Returns whether this page has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
