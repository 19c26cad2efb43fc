//! Pagination module
//!
//! Strategies: Cursor, Offset, Page Number, Link Header, Next URL, None
//!
//! # Overview
//!
//! A list operation yields a [`Page`] of typed models. Each page knows how to
//! fetch its successor: the configured [`Paginator`] reads the continuation
//! out of the response (cursor token, offset arithmetic, `Link` header, or a
//! URL in the body) and [`Page::next`] re-invokes the operation with it. The
//! walk follows `Initial -> Fetching -> {HasNext, Exhausted}` and stops for
//! good once `Exhausted`.

mod strategies;
mod types;


pub use strategies::{
    parse_link_header, CursorPaginator, LinkHeaderPaginator, NextUrlPaginator, NoPaginator,
    OffsetPaginator, PageNumberPaginator,
};
pub use types::{NextPage, PageState, PaginationConfig, Paginator, Phase};

pub(crate) use types::extract_path;

use crate::codec::TypedModel;
use crate::error::Result;
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Page Fetching
// ============================================================================

/// One fetched page before pagination bookkeeping: the decoded records plus
/// the raw body and headers the strategy inspects.
#[derive(Debug)]
pub struct FetchedPage {
    /// Decoded records of this page
    pub items: Vec<TypedModel>,
    /// Full response body
    pub body: JsonValue,
    /// Response headers
    pub headers: HeaderMap,
}

/// Issues one page request. Implemented by the resource façade; pagination
/// stays agnostic of transport and decoding.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page with extra query parameters, or against a full
    /// replacement URL when the strategy produced one.
    async fn fetch_page(&self, params: StringMap, url: Option<String>) -> Result<FetchedPage>;
}

// ============================================================================
// Page
// ============================================================================

/// One page of a paginated listing.
///
/// Holds the items of this page and everything needed to fetch the next one.
/// Not shared across tasks; run independent walks for concurrent consumers.
pub struct Page {
    items: Vec<TypedModel>,
    paginator: Arc<dyn Paginator>,
    fetcher: Arc<dyn PageFetcher>,
    state: PageState,
    pending: Option<NextPage>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("items", &self.items.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Fetch the first page of a walk
    pub async fn first(
        paginator: Arc<dyn Paginator>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        let mut state = PageState::new();
        let params = paginator.initial_params(&state);
        state.begin_fetch()?;

        Self::fetch_into(paginator, fetcher, state, params, None).await
    }

    async fn fetch_into(
        paginator: Arc<dyn Paginator>,
        fetcher: Arc<dyn PageFetcher>,
        mut state: PageState,
        params: StringMap,
        url: Option<String>,
    ) -> Result<Self> {
        let fetched = fetcher.fetch_page(params, url).await?;
        let decision = paginator.next_page(
            &fetched.body,
            &fetched.headers,
            fetched.items.len(),
            &mut state,
        );
        state.finish_fetch(&decision, fetched.items.len());

        debug!(
            records = fetched.items.len(),
            total = state.total_fetched,
            exhausted = state.is_exhausted(),
            "fetched page"
        );

        let pending = match decision {
            NextPage::Done => None,
            continuation => Some(continuation),
        };

        Ok(Self {
            items: fetched.items,
            paginator,
            fetcher,
            state,
            pending,
        })
    }

    /// Fetch the next page, or `None` when the server indicated no more data
    pub async fn next(mut self) -> Result<Option<Self>> {
        let Some(NextPage::Continue { query_params, url }) = self.pending.take() else {
            return Ok(None);
        };
        self.state.begin_fetch()?;

        Self::fetch_into(self.paginator, self.fetcher, self.state, query_params, url)
            .await
            .map(Some)
    }

    /// Whether a further page is available
    pub fn has_next(&self) -> bool {
        !self.state.is_exhausted()
    }

    /// Records of this page
    pub fn items(&self) -> &[TypedModel] {
        &self.items
    }

    /// Consume the page, returning its records
    pub fn into_items(self) -> Vec<TypedModel> {
        self.items
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pagination state after this page was fetched
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Drain the remaining pages into a single vector, this page included
    pub async fn collect_all(self) -> Result<Vec<TypedModel>> {
        let mut page = self;
        let mut all = Vec::new();
        loop {
            all.append(&mut page.items);
            match page.next().await? {
                Some(next) => page = next,
                None => return Ok(all),
            }
        }
    }
}
