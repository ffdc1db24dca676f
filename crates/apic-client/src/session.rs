//! Authenticated session against a remote controller.
//!
//! Logs in with `aaaLogin` and sends the returned token as a bearer header on
//! subsequent class queries. Controllers commonly run with self-signed
//! certificates, so certificate validation is disabled for this session.

use std::time::Duration;

use apic_core::{ManagedObject, PageResponse};
use serde_json::json;
use tracing::{debug, info};

use crate::error::SessionError;

/// A logged-in session.
#[derive(Debug, Clone)]
pub struct RemoteSession {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl RemoteSession {
    /// Logs in to the controller at `host` over HTTPS.
    pub fn login(
        host: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, SessionError> {
        Self::login_at(&format!("https://{host}"), username, password, timeout)
    }

    /// Logs in against an explicit base URL (scheme, host, and port).
    pub fn login_at(
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, SessionError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()?;

        let payload = json!({
            "aaaUser": {
                "attributes": {
                    "name": username,
                    "pwd": password,
                }
            }
        });

        let resp = client
            .post(format!("{base_url}/api/aaaLogin.json"))
            .json(&payload)
            .send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(SessionError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        let reply: serde_json::Value = serde_json::from_str(&resp.text()?)?;
        let token = reply
            .pointer("/imdata/0/aaaLogin/attributes/token")
            .and_then(serde_json::Value::as_str)
            .ok_or(SessionError::MissingToken)?
            .to_owned();

        info!(base_url = %base_url, user = %username, "Logged in");
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Fetches all objects of `class` across the fabric (`/api/node/class`).
    pub fn get_class(&self, class: &str) -> Result<Vec<ManagedObject>, SessionError> {
        let url = format!("{}/api/node/class/{class}.json", self.base_url);
        debug!(url = %url, "GET");
        let body = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()?
            .text()?;
        let page: PageResponse = serde_json::from_str(&body)?;
        debug!(class, count = page.imdata.len(), total = page.total_count, "Class fetched");
        Ok(page.imdata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_server;

    const LOGIN_OK: &str =
        r#"{"imdata":[{"aaaLogin":{"attributes":{"token":"tok-123"}}}],"totalCount":"1"}"#;

    #[test]
    fn test_login_then_get_class_with_bearer() {
        let fcot = r#"{"imdata":[{"ethpmFcot":{"attributes":{"dn":"topology/pod-1/node-101/sys/phys-[eth1/1]/phys/fcot","actualType":"10Gbase-SR"}}}],"totalCount":"1"}"#;
        let (base, server) =
            test_server::serve(vec![(200, LOGIN_OK.to_owned()), (200, fcot.to_owned())]);

        let session = RemoteSession::login_at(&base, "admin", "s3cret", Duration::from_secs(5)).unwrap();
        let objects = session.get_class("ethpmFcot").unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].attr("actualType"), Some("10Gbase-SR"));

        let captured = server.join().unwrap();
        assert!(captured[0].request_line.starts_with("POST /api/aaaLogin.json "));
        let login: serde_json::Value = serde_json::from_str(&captured[0].body).unwrap();
        assert_eq!(login["aaaUser"]["attributes"]["name"], "admin");
        assert_eq!(login["aaaUser"]["attributes"]["pwd"], "s3cret");

        assert!(captured[1].request_line.starts_with("GET /api/node/class/ethpmFcot.json "));
        assert!(
            captured[1]
                .headers
                .iter()
                .any(|h| h.eq_ignore_ascii_case("authorization: Bearer tok-123"))
        );
    }

    #[test]
    fn test_login_rejected() {
        let (base, server) = test_server::serve(vec![(401, "{}".to_owned())]);
        let err = RemoteSession::login_at(&base, "admin", "bad", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SessionError::AuthenticationFailed { status: 401 }));
        assert!(err.is_auth_failure());
        server.join().unwrap();
    }

    #[test]
    fn test_login_without_token() {
        let (base, server) =
            test_server::serve(vec![(200, r#"{"imdata":[],"totalCount":"0"}"#.to_owned())]);
        let err = RemoteSession::login_at(&base, "admin", "pw", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SessionError::MissingToken));
        server.join().unwrap();
    }
}
