//! Request transport.
//!
//! The fetcher talks to the controller through the [`Transport`] trait. The
//! production implementation, [`HttpTransport`], issues blocking GET requests
//! against the local management endpoint with a per-request timeout.
//! [`ReplayTransport`](crate::ReplayTransport) serves canned replies for
//! offline runs and tests.

use std::time::Duration;

use tracing::debug;

use crate::error::FetchError;

/// Issues a GET for a controller-relative URL and returns the body.
///
/// `url` is relative to the controller root, e.g.
/// `/api/policymgr/class/pconsRefDn.json?shard=1&page-size=75000&page=0`.
///
/// Implementations must be shareable across scan threads.
pub trait Transport: Send + Sync {
    /// Performs the request.
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP transport against the local management endpoint.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use apic_client::{HttpTransport, Transport};
///
/// let transport = HttpTransport::new("http://127.0.0.1:7777", Duration::from_secs(90))?;
/// let body = transport.get("/api/class/topSystem.json")?;
/// # Ok::<(), apic_client::FetchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport for `endpoint` with the given per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        })
    }

    /// The endpoint this transport targets.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn absolute(&self, url: &str) -> String {
        format!("{}/{}", self.endpoint, url.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let target = self.absolute(url);
        debug!(url = %target, "GET");
        let resp = self
            .client
            .get(&target)
            .send()
            .map_err(|e| FetchError::transport(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        resp.text().map_err(|e| FetchError::transport(url, e))
    }
}
