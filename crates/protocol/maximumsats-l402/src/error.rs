//! Error types for the L402 request adapter.

use thiserror::Error;

/// Result type for L402 operations.
pub type L402Result<T> = Result<T, L402Error>;

/// Errors that can occur while talking to an L402-protected upstream.
#[derive(Debug, Error)]
pub enum L402Error {
    /// The transport call itself failed (DNS, connect, TLS, timeout).
    #[error("upstream unreachable at {url}: {reason}")]
    UpstreamUnreachable {
        /// URL that was being requested.
        url: String,
        /// Description of the failure.
        reason: String,
    },

    /// The upstream answered, but the body was not usable.
    #[error("malformed upstream response: {reason}")]
    MalformedUpstreamResponse {
        /// Description of what's wrong.
        reason: String,
    },

    /// Internal error.
    #[error("internal L402 error: {0}")]
    Internal(String),
}

impl L402Error {
    /// Create a malformed-response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UpstreamUnreachable { .. } => "UPSTREAM_UNREACHABLE",
            Self::MalformedUpstreamResponse { .. } => "MALFORMED_UPSTREAM_RESPONSE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::UpstreamUnreachable { .. } => {
                "Check network connectivity to the upstream API and call the tool again"
            }
            Self::MalformedUpstreamResponse { .. } => {
                "The upstream API returned an unexpected response; try again later"
            }
            Self::Internal(_) => "This is an internal error; please report it",
        }
    }

    /// Returns true if this error is transient and a fresh call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UpstreamUnreachable { .. })
    }
}

impl From<reqwest::Error> for L402Error {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        let reason = if e.is_timeout() {
            "request timed out".to_string()
        } else {
            e.to_string()
        };
        Self::UpstreamUnreachable { url, reason }
    }
}
