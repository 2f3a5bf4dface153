//! L402 request adapter.
//!
//! Shapes one upstream call, sends it through a [`Transport`], and classifies
//! the response. The adapter holds no per-call state: it never retries and
//! never caches.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::L402Result;
use crate::transport::{HttpMethod, HttpTransport, Transport, UpstreamRequest};
use crate::types::{UpstreamReply, AUTH_SCHEME, PAYMENT_HASH_FIELD};

/// JSON object used for request payloads.
pub type JsonObject = Map<String, Value>;

/// Client that executes L402-aware upstream calls.
#[derive(Clone)]
pub struct L402Client {
    transport: Arc<dyn Transport>,
}

impl L402Client {
    /// Create a client over an arbitrary transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client over the reqwest transport.
    pub fn http(timeout: Duration) -> L402Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(timeout)?)))
    }

    /// Perform one upstream call and classify its outcome.
    ///
    /// For POST the payload becomes the JSON body; for GET it becomes the
    /// query string. A payment hash, when given, is attached to both the
    /// body and the `Authorization` header (POST) or to the query (GET).
    pub async fn execute(
        &self,
        base_url: &str,
        endpoint: &str,
        method: HttpMethod,
        payload: JsonObject,
        payment_hash: Option<&str>,
    ) -> L402Result<UpstreamReply> {
        let request = build_request(base_url, endpoint, method, payload, payment_hash);
        let url = request.url.clone();

        debug!(
            method = %method,
            url = %url,
            with_proof = payment_hash.is_some(),
            "Sending upstream request"
        );

        let response = self.transport.send(request).await.inspect_err(|e| {
            warn!(url = %url, error = %e, "Upstream request failed");
        })?;

        let reply = UpstreamReply::from_slice(&response.body).inspect_err(|e| {
            warn!(url = %url, status = response.status, error = %e, "Unusable upstream response");
        })?;

        if let UpstreamReply::Challenge(challenge) = &reply {
            info!(
                url = %url,
                price_sats = challenge.price_sats,
                payment_hash = %challenge.payment_hash,
                "Upstream issued L402 challenge"
            );
        }

        Ok(reply)
    }

    /// POST a paid action.
    pub async fn post(
        &self,
        base_url: &str,
        endpoint: &str,
        body: JsonObject,
        payment_hash: Option<&str>,
    ) -> L402Result<UpstreamReply> {
        self.execute(base_url, endpoint, HttpMethod::Post, body, payment_hash)
            .await
    }

    /// GET a free or metered lookup.
    pub async fn get(
        &self,
        base_url: &str,
        endpoint: &str,
        params: JsonObject,
        payment_hash: Option<&str>,
    ) -> L402Result<UpstreamReply> {
        self.execute(base_url, endpoint, HttpMethod::Get, params, payment_hash)
            .await
    }
}

impl std::fmt::Debug for L402Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L402Client").finish_non_exhaustive()
    }
}

/// Shape an upstream request without sending it.
pub fn build_request(
    base_url: &str,
    endpoint: &str,
    method: HttpMethod,
    mut payload: JsonObject,
    payment_hash: Option<&str>,
) -> UpstreamRequest {
    let url = join_url(base_url, endpoint);

    match method {
        HttpMethod::Post => {
            let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
            if let Some(hash) = payment_hash {
                headers.push((
                    "Authorization".to_string(),
                    format!("{} {}", AUTH_SCHEME, hash),
                ));
                payload.insert(PAYMENT_HASH_FIELD.to_string(), Value::String(hash.to_string()));
            }

            UpstreamRequest {
                method,
                url,
                headers,
                query: Vec::new(),
                body: Some(Value::Object(payload)),
            }
        }
        HttpMethod::Get => {
            let mut query: Vec<(String, String)> = payload
                .into_iter()
                .filter(|(key, _)| key != PAYMENT_HASH_FIELD)
                .filter_map(|(key, value)| query_value(&value).map(|v| (key, v)))
                .collect();
            if let Some(hash) = payment_hash {
                query.push((PAYMENT_HASH_FIELD.to_string(), hash.to_string()));
            }

            UpstreamRequest {
                method,
                url,
                headers: Vec::new(),
                query,
                body: None,
            }
        }
    }
}

/// Join a base URL and an endpoint path with exactly one slash.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = endpoint.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
