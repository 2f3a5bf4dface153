//! Mock implementation of the `Transport` trait for testing.
//!
//! Serves scripted responses per URL path, simulates L402-protected paid
//! endpoints and metered free-tier lookups, and records every request so
//! tests can assert on call counts and request shapes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use maximumsats_l402::{
    L402Error, L402Result, Transport, UpstreamRequest, UpstreamResponse, AUTH_SCHEME,
    PAYMENT_HASH_FIELD,
};
use serde_json::{json, Value};

enum Route {
    /// Fixed JSON body.
    Json { status: u16, body: Value },
    /// Fixed raw body (for malformed-response tests).
    Raw { status: u16, body: String },
    /// POST-style paid action: challenges until `payment_hash` is paid.
    Paid {
        price_sats: u64,
        payment_hash: String,
        result: Value,
    },
    /// GET-style metered lookup: `free_calls` free answers, then a
    /// free-tier challenge until `payment_hash` is paid.
    Metered {
        free_calls: u32,
        served: u32,
        amount_sats: u64,
        payment_hash: String,
        result: Value,
    },
}

#[derive(Default)]
struct MockUpstreamInner {
    /// Routes keyed by URL path (leading slash).
    routes: HashMap<String, Route>,
    /// Every request received, in order.
    requests: Vec<UpstreamRequest>,
    /// Payment hashes considered settled.
    paid: HashSet<String>,
    /// When set, every call fails as unreachable with this reason.
    failure: Option<String>,
    /// When set, every call is recorded and then never answers.
    stalled: bool,
}

/// A mock upstream API.
///
/// Uses `Arc<Mutex<...>>` internally, so it is cheap to clone and all clones
/// share the same state.
#[derive(Clone, Default)]
pub struct MockUpstream {
    inner: Arc<Mutex<MockUpstreamInner>>,
}

impl MockUpstream {
    /// Create an upstream with no routes (every path answers 404).
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a fixed JSON body with status 200.
    pub fn with_json(self, path: &str, body: Value) -> Self {
        self.with_status_json(path, 200, body)
    }

    /// Serve a fixed JSON body with the given status.
    pub fn with_status_json(self, path: &str, status: u16, body: Value) -> Self {
        self.route(path, Route::Json { status, body })
    }

    /// Serve a fixed raw body.
    pub fn with_raw(self, path: &str, status: u16, body: &str) -> Self {
        self.route(
            path,
            Route::Raw {
                status,
                body: body.to_string(),
            },
        )
    }

    /// Serve an L402-protected POST action.
    pub fn with_paid_action(
        self,
        path: &str,
        price_sats: u64,
        payment_hash: &str,
        result: Value,
    ) -> Self {
        self.route(
            path,
            Route::Paid {
                price_sats,
                payment_hash: payment_hash.to_string(),
                result,
            },
        )
    }

    /// Serve a metered GET lookup.
    pub fn with_metered_lookup(
        self,
        path: &str,
        free_calls: u32,
        amount_sats: u64,
        payment_hash: &str,
        result: Value,
    ) -> Self {
        self.route(
            path,
            Route::Metered {
                free_calls,
                served: 0,
                amount_sats,
                payment_hash: payment_hash.to_string(),
                result,
            },
        )
    }

    /// Make every call fail at the transport level.
    pub fn unreachable(self, reason: &str) -> Self {
        self.lock().failure = Some(reason.to_string());
        self
    }

    /// Make every call hang forever after it is recorded.
    pub fn stalled(self) -> Self {
        self.lock().stalled = true;
        self
    }

    /// Mark a payment hash as settled.
    pub fn mark_paid(&self, payment_hash: &str) {
        self.lock().paid.insert(payment_hash.to_string());
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.lock().requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.lock().requests.last().cloned()
    }

    fn route(self, path: &str, route: Route) -> Self {
        self.lock().routes.insert(normalize_path(path), route);
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockUpstreamInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockUpstream {
    async fn send(&self, request: UpstreamRequest) -> L402Result<UpstreamResponse> {
        let stalled = {
            let mut inner = self.lock();
            inner.requests.push(request.clone());
            inner.stalled
        };
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut inner = self.lock();
        if let Some(reason) = &inner.failure {
            return Err(L402Error::UpstreamUnreachable {
                url: request.url.clone(),
                reason: reason.clone(),
            });
        }

        let proof = presented_proof(&request);
        let MockUpstreamInner { routes, paid, .. } = &mut *inner;
        let Some(route) = routes.get_mut(path_of(&request.url)) else {
            return Ok(json_response(404, &json!({ "error": "not found" })));
        };

        let response = match route {
            Route::Json { status, body } => json_response(*status, body),
            Route::Raw { status, body } => UpstreamResponse {
                status: *status,
                body: body.clone().into_bytes(),
            },
            Route::Paid {
                price_sats,
                payment_hash,
                result,
            } => {
                if proof.as_deref().is_some_and(|p| paid.contains(p)) {
                    json_response(200, result)
                } else {
                    json_response(
                        402,
                        &json!({
                            "status": "payment_required",
                            "protocols": {
                                "l402": {
                                    "price_sats": *price_sats,
                                    "payment_request": mock_invoice(*price_sats, payment_hash),
                                    "payment_hash": payment_hash.as_str(),
                                }
                            }
                        }),
                    )
                }
            }
            Route::Metered {
                free_calls,
                served,
                amount_sats,
                payment_hash,
                result,
            } => {
                let proven = proof.as_deref().is_some_and(|p| paid.contains(p));
                if proven || *served < *free_calls {
                    if !proven {
                        *served += 1;
                    }
                    json_response(200, result)
                } else {
                    json_response(
                        402,
                        &json!({
                            "message": format!("Free tier exhausted. Pay {} sats to continue.", amount_sats),
                            "invoice": mock_invoice(*amount_sats, payment_hash),
                            "payment_hash": payment_hash.as_str(),
                            "amount_sats": *amount_sats,
                        }),
                    )
                }
            }
        };

        Ok(response)
    }
}

/// Extract the payment proof from header, body, or query, in that order.
fn presented_proof(request: &UpstreamRequest) -> Option<String> {
    let prefix = format!("{} ", AUTH_SCHEME);
    request
        .header("Authorization")
        .and_then(|h| h.strip_prefix(prefix.as_str()))
        .or_else(|| request.body_field(PAYMENT_HASH_FIELD))
        .or_else(|| request.query_param(PAYMENT_HASH_FIELD))
        .map(str::to_string)
}

fn json_response(status: u16, body: &Value) -> UpstreamResponse {
    UpstreamResponse {
        status,
        body: body.to_string().into_bytes(),
    }
}

fn mock_invoice(amount_sats: u64, payment_hash: &str) -> String {
    format!("lnbc{}0n1pmock{}", amount_sats, payment_hash)
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Path component of an absolute URL (leading slash, no query).
fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = rest.find('/').map_or("/", |i| &rest[i..]);
    path.split('?').next().unwrap_or(path)
}
