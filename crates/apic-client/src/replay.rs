//! In-memory transport serving canned replies.
//!
//! [`ReplayTransport`] routes each request to the first responder whose
//! prefix matches the URL, falling back to a default responder. Every
//! requested URL is recorded, which lets callers assert on exactly which
//! pages were fetched.

use std::sync::Arc;

use apic_core::ManagedObject;
use parking_lot::Mutex;
use serde_json::json;

use crate::error::FetchError;
use crate::transport::Transport;

type Responder = Arc<dyn Fn(&str) -> Result<String, FetchError> + Send + Sync>;

/// Transport that answers from registered responders instead of the network.
///
/// # Examples
///
/// ```
/// use apic_client::{ReplayTransport, Transport, page_json};
///
/// let transport = ReplayTransport::new()
///     .route("/api/policymgr/", |_| Ok(page_json(&[], 0)));
///
/// assert!(transport.get("/api/policymgr/class/pconsRefDn.json?shard=1").is_ok());
/// assert!(transport.get("/api/topomgr/class/pconsRefDn.json?shard=1").is_err());
/// assert_eq!(transport.request_count(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ReplayTransport {
    routes: Vec<(String, Responder)>,
    fallback: Option<Responder>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for ReplayTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayTransport")
            .field("routes", &self.routes.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .field("has_fallback", &self.fallback.is_some())
            .field("requests", &self.requests.lock().len())
            .finish()
    }
}

impl ReplayTransport {
    /// Creates a transport with no routes. Unrouted requests fail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that answers every request with an empty page.
    #[must_use]
    pub fn empty() -> Self {
        Self::new().fallback(|_| Ok(page_json(&[], 0)))
    }

    /// Routes URLs starting with `prefix` to `responder`.
    ///
    /// Routes are tried in registration order.
    #[must_use]
    pub fn route<F>(mut self, prefix: impl Into<String>, responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, FetchError> + Send + Sync + 'static,
    {
        self.routes.push((prefix.into(), Arc::new(responder)));
        self
    }

    /// Sets the responder for URLs no route matches.
    #[must_use]
    pub fn fallback<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, FetchError> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(responder));
        self
    }

    /// URLs requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for ReplayTransport {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().push(url.to_owned());
        let responder = self
            .routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, r)| r)
            .or(self.fallback.as_ref());
        match responder {
            Some(responder) => responder(url),
            None => Err(FetchError::transport(url, "no replay route")),
        }
    }
}

/// Renders a page reply body in the controller's wire format.
#[must_use]
pub fn page_json(objects: &[ManagedObject], total_count: u64) -> String {
    json!({
        "imdata": objects,
        "totalCount": total_count.to_string(),
    })
    .to_string()
}

/// Extracts the `page=` index from a paged request URL.
#[must_use]
pub fn page_index(url: &str) -> Option<u64> {
    url.split(['?', '&'])
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|p| p.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_tried_in_order() {
        let transport = ReplayTransport::new()
            .route("/api/a/x", |_| Ok("first".to_owned()))
            .route("/api/a/", |_| Ok("second".to_owned()));
        assert_eq!(transport.get("/api/a/x.json").unwrap(), "first");
        assert_eq!(transport.get("/api/a/y.json").unwrap(), "second");
    }

    #[test]
    fn test_unrouted_request_fails() {
        let transport = ReplayTransport::new();
        assert!(matches!(
            transport.get("/api/none.json"),
            Err(FetchError::Transport { .. })
        ));
        assert_eq!(transport.requests(), vec!["/api/none.json".to_owned()]);
    }

    #[test]
    fn test_page_json_shape() {
        let body = page_json(&[ManagedObject::new("pconsRefDn").with_attr("dn", "d")], 1);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["totalCount"], "1");
        assert_eq!(value["imdata"][0]["pconsRefDn"]["attributes"]["dn"], "d");
    }

    #[test]
    fn test_page_index() {
        assert_eq!(page_index("/api/x.json?shard=1&page-size=5&page=3"), Some(3));
        assert_eq!(page_index("/api/x.json?shard=1"), None);
    }
}
