// 🔎 Query Layer - search, paginate, page navigation
//
// Pure synchronous functions over already-loaded collections.
// Ordering is always the source order: search filters, it never sorts.

use crate::coerce::digits_only;
use crate::entities::Client;
use serde::{Serialize, Serializer};

/// Rows per page in the list view
pub const PAGE_SIZE: usize = 10;

/// Width of the page-number window, first and last page included
const MAX_PAGES_SHOWN: usize = 5;

// ============================================================================
// SEARCH
// ============================================================================

/// SearchTerm - a normalised, non-blank search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    lowered: String,
    digits: String,
}

impl SearchTerm {
    /// Returns None for an empty or whitespace-only term (matches everything)
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(SearchTerm {
            lowered: trimmed.to_lowercase(),
            digits: digits_only(trimmed),
        })
    }

    /// Name contains the term (case-insensitive), or the tax id digits contain
    /// the term's digits. A term with no digits never matches on tax id.
    pub fn matches(&self, client: &Client) -> bool {
        if client.name.to_lowercase().contains(&self.lowered) {
            return true;
        }

        !self.digits.is_empty() && client.tax_id.contains_digits(&self.digits)
    }
}

/// Filter clients by name or tax id, keeping source order
///
/// A blank term returns everyone. A term without digits (`"ana"`, `".-/"`)
/// is only matched against names, never against tax ids.
///
/// # Example:
/// ```
/// use client_ledger::entities::Client;
/// use client_ledger::query::search;
///
/// let clients: Vec<Client> = Vec::new();
/// assert!(search(&clients, "ana").is_empty());
/// ```
pub fn search<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    match SearchTerm::parse(term) {
        Some(term) => clients.iter().filter(|c| term.matches(c)).collect(),
        None => clients.iter().collect(),
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Page - one slice of a result plus enough to draw its controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// 1-based page number that was requested
    pub page: usize,

    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// ceil(len / size); 0 when size is 0
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Slice `[(page-1)*size, page*size)` clipped to bounds
///
/// Page 0, or a page past the end, yields an empty slice.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);

    let slice = if page == 0 || page_size == 0 {
        &[][..]
    } else {
        let start = (page - 1).saturating_mul(page_size).min(total_items);
        let end = page.saturating_mul(page_size).min(total_items);
        &items[start..end]
    };

    Page {
        items: slice.to_vec(),
        page,
        page_size,
        total_pages,
        total_items,
    }
}

// ============================================================================
// PAGE NAVIGATION
// ============================================================================

/// One slot in the page-number strip. Serializes as the page number, or `"..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// PageNav - the page-number strip under a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNav {
    pub current: usize,
    pub total: usize,
    pub markers: Vec<PageMarker>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Build the page-number strip, or None when there is nothing to navigate
///
/// Always shows the first and last page, the current page and its neighbours,
/// and one ellipsis for each gap. Near either end the window is widened so
/// the strip keeps the same length.
pub fn page_navigation(current: usize, total: usize) -> Option<PageNav> {
    if total <= 1 {
        return None;
    }

    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(total - 1);

    if current <= 2 {
        end = (total - 1).min(MAX_PAGES_SHOWN - 1);
    } else if current + 2 >= total {
        start = (total + 2).saturating_sub(MAX_PAGES_SHOWN).max(2);
    }

    let mut markers = vec![PageMarker::Page(1)];
    if start > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((start..=end).map(PageMarker::Page));
    if end < total - 1 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(total));

    Some(PageNav {
        current,
        total,
        markers,
        has_previous: current > 1,
        has_next: current < total,
    })
}

// ============================================================================
// LIST STATE
// ============================================================================

/// ClientQuery - the list view's search term and current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientQuery {
    term: String,
    page: usize,
    page_size: usize,
}

impl ClientQuery {
    pub fn new() -> Self {
        ClientQuery {
            term: String::new(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }

    /// Builder: rows per page (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// A different term always goes back to page 1
    pub fn set_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.term {
            self.term = term;
            self.page = 1;
        }
    }

    /// Jump to a page, clamped to `[1, total_pages]`
    pub fn set_page(&mut self, page: usize, clients: &[Client]) {
        let total = self.total_pages(clients);
        self.page = page.clamp(1, total.max(1));
    }

    pub fn next_page(&mut self, clients: &[Client]) {
        self.set_page(self.page + 1, clients);
    }

    pub fn previous_page(&mut self, clients: &[Client]) {
        self.set_page(self.page.saturating_sub(1), clients);
    }

    pub fn total_pages(&self, clients: &[Client]) -> usize {
        total_pages(search(clients, &self.term).len(), self.page_size)
    }

    /// Search, then paginate
    pub fn run<'a>(&self, clients: &'a [Client]) -> Page<&'a Client> {
        let matches = search(clients, &self.term);
        paginate(&matches, self.page_size, self.page)
    }

    pub fn navigation(&self, clients: &[Client]) -> Option<PageNav> {
        page_navigation(self.page, self.total_pages(clients))
    }
}

impl Default for ClientQuery {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
