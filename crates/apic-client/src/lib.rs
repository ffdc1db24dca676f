//! Paginated class queries against the APIC REST API.
//!
//! # Overview
//!
//! - [`QueryFilters`]: the seven optional class-query options
//! - [`ClassQuery`]: service + class + shard + filters, rendered to a URL
//! - [`PagedFetcher`]: walks pages until the controller signals completion
//! - [`Transport`]: the request seam, implemented by [`HttpTransport`] for
//!   the local endpoint and [`ReplayTransport`] for canned replies
//! - [`RemoteSession`]: `aaaLogin` + bearer-token requests to a remote
//!   controller
//!
//! # Architecture
//!
//! ```text
//! ClassQuery ──url()──▶ PagedFetcher ──get(page URL)──▶ dyn Transport
//!     │                     │                             ├── HttpTransport (reqwest)
//!     └── QueryFilters      └── decode + accumulate       └── ReplayTransport
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use apic_client::{ClassQuery, HttpTransport, PagedFetcher};
//! use apic_core::ShardId;
//!
//! let transport = HttpTransport::new("http://127.0.0.1:7777", Duration::from_secs(90))?;
//! let fetcher = PagedFetcher::new(Arc::new(transport));
//! let refs = fetcher.fetch_class(&ClassQuery::new("policymgr", "pconsRefDn", ShardId::new(4)))?;
//! println!("{} references", refs.len());
//! # Ok::<(), apic_client::FetchError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod fetcher;
mod filters;
mod query;
mod replay;
mod session;
mod transport;

pub use error::{FetchError, SessionError};
pub use fetcher::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, PagedFetcher};
pub use filters::QueryFilters;
pub use query::ClassQuery;
pub use replay::{ReplayTransport, page_index, page_json};
pub use session::RemoteSession;
pub use transport::{HttpTransport, Transport};
