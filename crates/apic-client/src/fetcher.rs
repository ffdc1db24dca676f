//! Paginated class fetches.
//!
//! [`PagedFetcher`] walks the pages of a query until the controller signals
//! the last one and returns the objects of all pages concatenated in page
//! order.
//!
//! # Termination
//!
//! Page `P` is requested with `page-size=N&page=P`, starting at `P = 0`.
//! Fetching stops as soon as either:
//!
//! - the page holds fewer than `N` objects, or
//! - the accumulated object count reaches the reply's `totalCount`.
//!
//! An endpoint that never satisfies either condition is cut off after
//! `max_pages` requests with [`FetchError::PaginationLimit`].

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use apic_core::{FetchConfig, ManagedObject, PageResponse};
use tracing::{debug, error, warn};

use crate::error::FetchError;
use crate::query::ClassQuery;
use crate::transport::Transport;

/// Default number of objects requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 75_000;

/// Default cap on pages fetched for a single query.
pub const DEFAULT_MAX_PAGES: u64 = 10_000;

/// Fetches every page of a class query.
///
/// Cheaply cloneable; clones share the transport.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use apic_client::{ClassQuery, PagedFetcher, ReplayTransport};
/// use apic_core::ShardId;
///
/// let fetcher = PagedFetcher::new(Arc::new(ReplayTransport::empty()));
/// let objects = fetcher
///     .fetch_class(&ClassQuery::new("policymgr", "pconsRefDn", ShardId::new(1)))
///     .unwrap();
/// assert!(objects.is_empty());
/// ```
#[derive(Clone)]
pub struct PagedFetcher {
    transport: Arc<dyn Transport>,
    page_size: u64,
    max_pages: u64,
}

impl std::fmt::Debug for PagedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedFetcher")
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl PagedFetcher {
    /// Creates a fetcher with the default page size and page limit.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Creates a fetcher using the pagination settings from `config`.
    #[must_use]
    pub fn from_config(transport: Arc<dyn Transport>, config: &FetchConfig) -> Self {
        Self::new(transport)
            .with_page_size(config.page_size)
            .with_max_pages(config.max_pages)
    }

    /// Sets the objects requested per page. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the page limit. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u64) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Objects requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Fetches all pages of a class query.
    pub fn fetch_class(&self, query: &ClassQuery) -> Result<Vec<ManagedObject>, FetchError> {
        self.fetch(&query.url())
    }

    /// Fetches all pages of `url` (relative to the controller root).
    ///
    /// # Errors
    ///
    /// Fails on the first page that cannot be fetched or decoded, or when
    /// the page limit is reached. No further pages are requested after a
    /// failure.
    pub fn fetch(&self, url: &str) -> Result<Vec<ManagedObject>, FetchError> {
        let delim = if url.contains('?') { '&' } else { '?' };
        let mut results: Vec<ManagedObject> = Vec::new();

        for page in 0..self.max_pages {
            let page_url = format!("{url}{delim}page-size={}&page={page}", self.page_size);
            debug!(url = %page_url, "Fetching page");

            let started = Instant::now();
            let body = self.transport.get(&page_url).inspect_err(|e| {
                warn!(url = %url, error = %e, "Failed to get data");
            })?;
            debug!(
                url = %page_url,
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Response received"
            );

            let reply = decode_page(&page_url, &body)?;
            let returned = reply.imdata.len() as u64;
            results.extend(reply.imdata);
            debug!(
                count = results.len(),
                total = reply.total_count,
                url = %page_url,
                "Accumulated results"
            );

            if returned < self.page_size || results.len() as u64 >= reply.total_count {
                debug!(url = %url, pages = page + 1, "All pages received");
                return Ok(results);
            }
        }

        error!(url = %url, max_pages = self.max_pages, "Pagination did not converge");
        Err(FetchError::PaginationLimit {
            url: url.to_owned(),
            max_pages: self.max_pages,
        })
    }
}

/// Decodes one page reply, checking for the required keys first.
fn decode_page(url: &str, body: &str) -> Result<PageResponse, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        error!(
            url = %url,
            body_len = body.len(),
            body = %excerpt(body),
            error = %e,
            "Failed to decode reply"
        );
        FetchError::decode(url, e)
    })?;

    for key in [PageResponse::IMDATA_KEY, PageResponse::TOTAL_COUNT_KEY] {
        if value.get(key).is_none() {
            let reply = value.to_string();
            error!(
                url = %url,
                missing = key,
                reply = %excerpt(&reply),
                "Failed to parse reply"
            );
            return Err(FetchError::Incomplete {
                url: url.to_owned(),
                missing: key,
            });
        }
    }

    serde_json::from_value(value).map_err(|e| {
        error!(url = %url, error = %e, "Failed to decode objects");
        FetchError::decode(url, e)
    })
}

/// Longest reply prefix written to the log.
const LOG_EXCERPT_CHARS: usize = 512;

/// Cuts `text` to [`LOG_EXCERPT_CHARS`] characters, marking the cut.
fn excerpt(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(LOG_EXCERPT_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}... ({} bytes total)", &text[..cut], text.len())),
        None => Cow::Borrowed(text),
    }
}
