//! Error types for the apic-client crate.
//!
//! - [`FetchError`] covers every way a paginated class query can fail.
//! - [`SessionError`] covers login and bearer-authenticated requests against
//!   a remote controller.

/// Errors that can occur while fetching a paginated class query.
///
/// All variants carry the URL that failed so a log line is enough to
/// reproduce the request. The type is `Clone` so scan units can hand the
/// same error to both the streaming channel and the final result.
///
/// # Error Recovery Strategy
///
/// Every variant is local to one query. Callers skip the affected scan
/// unit and continue with the others.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be completed (connect failure, timeout, I/O).
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The endpoint answered with a non-success status code.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body is not valid JSON, or its objects could not be decoded.
    #[error("failed to decode reply from {url}: {message}")]
    Decode {
        /// The requested URL.
        url: String,
        /// The decoder's message.
        message: String,
    },

    /// The reply is valid JSON but lacks a required key.
    #[error("reply from {url} is missing `{missing}`")]
    Incomplete {
        /// The requested URL.
        url: String,
        /// The missing key.
        missing: &'static str,
    },

    /// The endpoint never signalled the last page.
    #[error("query {url} did not finish within {max_pages} pages")]
    PaginationLimit {
        /// The base query URL (without page parameters).
        url: String,
        /// The configured page limit.
        max_pages: u64,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Creates a new [`FetchError::Transport`] error.
    #[inline]
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Creates a new [`FetchError::Decode`] error.
    #[inline]
    pub fn decode(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Returns the URL associated with this error, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::Incomplete { url, .. }
            | Self::PaginationLimit { url, .. } => Some(url),
            Self::Client(_) => None,
        }
    }

    /// Returns `true` if the endpoint answered but the reply was unusable.
    #[inline]
    #[must_use]
    pub const fn is_malformed_reply(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Incomplete { .. })
    }
}

/// Errors from an authenticated session against a remote controller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The login request was rejected.
    #[error("authentication failed with HTTP {status}")]
    AuthenticationFailed {
        /// The HTTP status of the login reply.
        status: u16,
    },

    /// The login reply did not carry a token.
    #[error("login reply has no token")]
    MissingToken,

    /// A reply could not be decoded.
    #[error("failed to decode reply: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SessionError {
    /// Returns `true` if the controller rejected the credentials.
    #[inline]
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. } | Self::MissingToken)
    }
}
