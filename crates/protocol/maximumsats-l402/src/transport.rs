//! Network transport used by the request adapter.
//!
//! The adapter only ever builds an [`UpstreamRequest`] and hands it to a
//! [`Transport`]. The production implementation is [`HttpTransport`]; tests
//! substitute a recording mock.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{L402Error, L402Result};

/// Default HTTP timeout for upstream requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method of an upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Free and metered lookups.
    Get,
    /// Paid actions.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A fully-shaped upstream request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub url: String,
    /// Request headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// JSON body (POST only).
    pub body: Option<Value>,
}

impl UpstreamRequest {
    /// Look up a header value (case-insensitive name).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a query parameter value.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a top-level string field of the JSON body.
    pub fn body_field(&self, name: &str) -> Option<&str> {
        self.body.as_ref()?.get(name)?.as_str()
    }
}

/// Raw upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Performs exactly one network round trip per call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response.
    ///
    /// Implementations must not retry and must map transport failures
    /// (including timeouts) to [`L402Error::UpstreamUnreachable`].
    async fn send(&self, request: UpstreamRequest) -> L402Result<UpstreamResponse>;
}

/// reqwest-backed transport.
///
/// Idle connections are not pooled, so no connection state outlives a call.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> L402Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .user_agent(concat!("maximumsats-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| L402Error::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: UpstreamRequest) -> L402Result<UpstreamResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(
            url = %request.url,
            status = status,
            bytes = body.len(),
            "Upstream responded"
        );

        Ok(UpstreamResponse { status, body })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> UpstreamRequest {
        UpstreamRequest {
            method: HttpMethod::Post,
            url: "https://maximumsats.com/api/dvm".into(),
            headers: vec![("Authorization".into(), "L402 abc".into())],
            query: vec![("pubkey".into(), "npub1".into())],
            body: Some(json!({ "prompt": "hi", "payment_hash": "abc" })),
        }
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_transport_debug() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let debug = format!("{:?}", transport);
        assert!(debug.contains("HttpTransport"));
        assert!(debug.contains("5s"));
    }

    #[test]
    fn test_request_lookups() {
        let request = sample_request();
        assert_eq!(request.header("authorization"), Some("L402 abc"));
        assert_eq!(request.query_param("pubkey"), Some("npub1"));
        assert_eq!(request.body_field("payment_hash"), Some("abc"));
        assert_eq!(request.body_field("missing"), None);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }
}
