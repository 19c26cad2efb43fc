//! Pagination types and traits
//!
//! A page walk is a small state machine: `Initial -> Fetching` on the first
//! request, then `Fetching -> HasNext` or `Fetching -> Exhausted` depending
//! on what the strategy extracts from the response. `Exhausted` is terminal.

use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;

// ============================================================================
// Next Page Decision
// ============================================================================

/// What a strategy decided after inspecting a response
#[derive(Debug, Clone, PartialEq)]
pub enum NextPage {
    /// More pages available
    Continue {
        /// Query parameters to add/replace on the next request
        query_params: StringMap,
        /// Full replacement URL (link-header and next-url strategies)
        url: Option<String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Continuation with query parameters
    pub fn with_params(params: StringMap) -> Self {
        Self::Continue {
            query_params: params,
            url: None,
        }
    }

    /// Continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = StringMap::new();
        params.insert(key.into(), value.into());
        Self::with_params(params)
    }

    /// Continuation that replaces the request URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::Continue {
            query_params: StringMap::new(),
            url: Some(url.into()),
        }
    }

    /// Check if this is a done decision
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

// ============================================================================
// Page State
// ============================================================================

/// Phase of the page walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request issued yet
    #[default]
    Initial,
    /// A request is in flight
    Fetching,
    /// Last response carried a continuation
    HasNext,
    /// Terminal; no further pages
    Exhausted,
}

/// Mutable state threaded through a sequence of page fetches.
///
/// Not shared across tasks; independent walks over the same operation each
/// carry their own state.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// Current phase
    pub phase: Phase,
    /// Last cursor token seen, for the equal-cursor termination guard
    pub cursor: Option<String>,
    /// Current offset (offset strategy)
    pub offset: u64,
    /// Current page number (page-number strategy)
    pub page: u32,
    /// Records seen across all fetched pages
    pub total_fetched: u64,
}

impl PageState {
    /// Fresh state at the start of a walk
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition into `Fetching`. Only valid from `Initial` or `HasNext`.
    pub fn begin_fetch(&mut self) -> Result<()> {
        match self.phase {
            Phase::Initial | Phase::HasNext => {
                self.phase = Phase::Fetching;
                Ok(())
            }
            Phase::Fetching => Err(Error::config("page fetch already in flight")),
            Phase::Exhausted => Err(Error::config("pagination is exhausted")),
        }
    }

    /// Transition out of `Fetching` based on the strategy's decision
    pub fn finish_fetch(&mut self, decision: &NextPage, records: usize) {
        self.total_fetched += records as u64;
        self.phase = if decision.is_done() {
            Phase::Exhausted
        } else {
            Phase::HasNext
        };
    }

    /// Check for the terminal phase
    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }
}

// ============================================================================
// Paginator Trait
// ============================================================================

/// A pagination strategy: parameters for the first request, and how to read
/// the continuation out of each response.
pub trait Paginator: Send + Sync + std::fmt::Debug {
    /// Query parameters for the first request
    fn initial_params(&self, state: &PageState) -> StringMap;

    /// Inspect a response and decide whether a next page exists.
    ///
    /// `records` is the item count of the page just decoded; strategies that
    /// stop on an empty page use it directly.
    fn next_page(
        &self,
        body: &JsonValue,
        headers: &HeaderMap,
        records: usize,
        state: &mut PageState,
    ) -> NextPage;
}

// ============================================================================
// Declarative Config
// ============================================================================

/// Pagination settings as they appear in a client definition
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PaginationConfig {
    /// Single page; `next()` always yields nothing
    #[default]
    None,

    /// Opaque continuation token (cursor + limit query pair)
    Cursor {
        /// Query parameter carrying the cursor
        #[serde(default = "default_cursor_param")]
        cursor_param: String,
        /// Dot path to the cursor in the response body
        cursor_path: String,
        /// Query parameter bounding page size
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Page size; omitted means server default
        #[serde(default)]
        page_size: Option<u32>,
    },

    /// Offset/limit pagination
    Offset {
        /// Query parameter carrying the offset
        offset_param: String,
        /// Query parameter bounding page size
        limit_param: String,
        /// Page size
        page_size: u32,
    },

    /// Page-number pagination
    PageNumber {
        /// Query parameter carrying the page number
        page_param: String,
        /// First page number, usually 0 or 1
        #[serde(default = "default_start_page")]
        start_page: u32,
        /// Optional page size parameter
        #[serde(default)]
        page_size_param: Option<String>,
        /// Page size
        #[serde(default)]
        page_size: Option<u32>,
    },

    /// RFC 5988 Link header
    LinkHeader {
        /// Rel value to follow
        #[serde(default = "default_rel")]
        rel: String,
    },

    /// Next page URL in the response body
    NextUrl {
        /// Dot path to the URL
        path: String,
    },
}

fn default_cursor_param() -> String {
    "cursor".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_rel() -> String {
    "next".to_string()
}

impl PaginationConfig {
    /// Build the strategy this config describes
    pub fn build(&self) -> Arc<dyn Paginator> {
        use super::strategies::{
            CursorPaginator, LinkHeaderPaginator, NextUrlPaginator, NoPaginator, OffsetPaginator,
            PageNumberPaginator,
        };

        match self {
            Self::None => Arc::new(NoPaginator),
            Self::Cursor {
                cursor_param,
                cursor_path,
                limit_param,
                page_size,
            } => Arc::new(CursorPaginator {
                cursor_param: cursor_param.clone(),
                cursor_path: cursor_path.clone(),
                limit_param: limit_param.clone(),
                page_size: *page_size,
            }),
            Self::Offset {
                offset_param,
                limit_param,
                page_size,
            } => Arc::new(OffsetPaginator {
                offset_param: offset_param.clone(),
                limit_param: limit_param.clone(),
                page_size: *page_size,
            }),
            Self::PageNumber {
                page_param,
                start_page,
                page_size_param,
                page_size,
            } => Arc::new(PageNumberPaginator {
                page_param: page_param.clone(),
                start_page: *start_page,
                page_size_param: page_size_param.clone(),
                page_size: *page_size,
            }),
            Self::LinkHeader { rel } => Arc::new(LinkHeaderPaginator { rel: rel.clone() }),
            Self::NextUrl { path } => Arc::new(NextUrlPaginator { path: path.clone() }),
        }
    }
}

// ============================================================================
// Dot Path Extraction
// ============================================================================

/// Walk a dot path (`result_info.cursor`, optionally `$.`-prefixed) through
/// nested objects.
pub(crate) fn extract_path<'a>(body: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = body;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Extract a dot path as a string, accepting numbers as well
pub(crate) fn extract_path_str(body: &JsonValue, path: &str) -> Option<String> {
    match extract_path(body, path)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
