//! Pagination strategy implementations

use super::types::{extract_path_str, NextPage, PageState, Paginator};
use crate::types::{JsonValue, StringMap};
use reqwest::header::HeaderMap;
use tracing::debug;

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Opaque continuation token pagination.
///
/// The response carries the next cursor at `cursor_path`; an absent or empty
/// cursor ends the walk. A cursor equal to the previous one also ends it —
/// a server echoing the same token back would otherwise loop forever.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Query parameter carrying the cursor
    pub cursor_param: String,
    /// Dot path to the cursor in the response body
    pub cursor_path: String,
    /// Query parameter bounding page size
    pub limit_param: String,
    /// Page size; omitted means server default
    pub page_size: Option<u32>,
}

impl CursorPaginator {
    fn limit_params(&self) -> StringMap {
        let mut params = StringMap::new();
        if let Some(size) = self.page_size {
            params.insert(self.limit_param.clone(), size.to_string());
        }
        params
    }
}

impl Paginator for CursorPaginator {
    fn initial_params(&self, state: &PageState) -> StringMap {
        let mut params = self.limit_params();
        if let Some(cursor) = &state.cursor {
            params.insert(self.cursor_param.clone(), cursor.clone());
        }
        params
    }

    fn next_page(
        &self,
        body: &JsonValue,
        _headers: &HeaderMap,
        _records: usize,
        state: &mut PageState,
    ) -> NextPage {
        let Some(cursor) = extract_path_str(body, &self.cursor_path) else {
            return NextPage::Done;
        };
        if cursor.is_empty() {
            return NextPage::Done;
        }
        if state.cursor.as_deref() == Some(cursor.as_str()) {
            debug!(cursor = %cursor, "cursor unchanged, ending pagination");
            return NextPage::Done;
        }

        state.cursor = Some(cursor.clone());
        let mut params = self.limit_params();
        params.insert(self.cursor_param.clone(), cursor);
        NextPage::with_params(params)
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset/limit pagination. A short page means the collection is drained.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter carrying the offset
    pub offset_param: String,
    /// Query parameter bounding page size
    pub limit_param: String,
    /// Page size
    pub page_size: u32,
}

impl OffsetPaginator {
    fn params_at(&self, offset: u64) -> StringMap {
        let mut params = StringMap::new();
        params.insert(self.offset_param.clone(), offset.to_string());
        params.insert(self.limit_param.clone(), self.page_size.to_string());
        params
    }
}

impl Paginator for OffsetPaginator {
    fn initial_params(&self, state: &PageState) -> StringMap {
        self.params_at(state.offset)
    }

    fn next_page(
        &self,
        _body: &JsonValue,
        _headers: &HeaderMap,
        records: usize,
        state: &mut PageState,
    ) -> NextPage {
        if records < self.page_size as usize {
            return NextPage::Done;
        }
        state.offset += u64::from(self.page_size);
        NextPage::with_params(self.params_at(state.offset))
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page-number pagination, ending on an empty or short page.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter carrying the page number
    pub page_param: String,
    /// First page number, usually 0 or 1
    pub start_page: u32,
    /// Optional page size parameter
    pub page_size_param: Option<String>,
    /// Page size
    pub page_size: Option<u32>,
}

impl PageNumberPaginator {
    fn params_at(&self, page: u32) -> StringMap {
        let mut params = StringMap::new();
        params.insert(self.page_param.clone(), page.to_string());
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.insert(param.clone(), size.to_string());
        }
        params
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_params(&self, state: &PageState) -> StringMap {
        let page = if state.page == 0 {
            self.start_page
        } else {
            state.page
        };
        self.params_at(page)
    }

    fn next_page(
        &self,
        _body: &JsonValue,
        _headers: &HeaderMap,
        records: usize,
        state: &mut PageState,
    ) -> NextPage {
        if records == 0 {
            return NextPage::Done;
        }
        if let Some(size) = self.page_size {
            if records < size as usize {
                return NextPage::Done;
            }
        }
        if state.page == 0 {
            state.page = self.start_page;
        }
        state.page += 1;
        NextPage::with_params(self.params_at(state.page))
    }
}

// ============================================================================
// Link Header Pagination
// ============================================================================

/// RFC 5988 `Link` header pagination: follow the URL with the matching rel.
#[derive(Debug, Clone)]
pub struct LinkHeaderPaginator {
    /// Rel value to follow
    pub rel: String,
}

impl Default for LinkHeaderPaginator {
    fn default() -> Self {
        Self {
            rel: "next".to_string(),
        }
    }
}

impl Paginator for LinkHeaderPaginator {
    fn initial_params(&self, _state: &PageState) -> StringMap {
        StringMap::new()
    }

    fn next_page(
        &self,
        _body: &JsonValue,
        headers: &HeaderMap,
        _records: usize,
        _state: &mut PageState,
    ) -> NextPage {
        headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .and_then(|header| parse_link_header(header, &self.rel))
            .map_or(NextPage::Done, NextPage::with_url)
    }
}

/// Extract the URL for `target_rel` from a `Link` header value.
///
/// Format: `<url>; rel="next", <url>; rel="prev"`
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    for part in header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(stripped) = segment.strip_prefix("rel=") {
                rel = Some(stripped.trim_matches('"').trim_matches('\''));
            }
        }

        if let (Some(u), Some(r)) = (url, rel) {
            if r == target_rel {
                return Some(u.to_string());
            }
        }
    }

    None
}

// ============================================================================
// Next URL Pagination
// ============================================================================

/// Next page URL carried in the response body, e.g. `{"next": "https://..."}`
#[derive(Debug, Clone)]
pub struct NextUrlPaginator {
    /// Dot path to the URL
    pub path: String,
}

impl Paginator for NextUrlPaginator {
    fn initial_params(&self, _state: &PageState) -> StringMap {
        StringMap::new()
    }

    fn next_page(
        &self,
        body: &JsonValue,
        _headers: &HeaderMap,
        _records: usize,
        _state: &mut PageState,
    ) -> NextPage {
        match extract_path_str(body, &self.path) {
            Some(url) if !url.is_empty() => NextPage::with_url(url),
            _ => NextPage::Done,
        }
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// Single request; the walk is exhausted after the first page.
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn initial_params(&self, _state: &PageState) -> StringMap {
        StringMap::new()
    }

    fn next_page(
        &self,
        _body: &JsonValue,
        _headers: &HeaderMap,
        _records: usize,
        _state: &mut PageState,
    ) -> NextPage {
        NextPage::Done
    }
}
