//! L402 payment-challenge handshake for MaximumSats upstream APIs.
//!
//! Paid MaximumSats endpoints answer an unpaid request with an
//! [L402](https://docs.lightning.engineering/the-lightning-network/l402)
//! challenge: a Lightning invoice plus a payment hash. After paying the
//! invoice out of band, the caller re-issues the same request carrying the
//! payment hash as proof.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  POST /api/dvm {prompt}     ┌──────────────┐
//! │  Tool        │ ───────────────────────────→│  MaximumSats │
//! │  handler     │ ←───────────────────────────│  API         │
//! │              │  status: payment_required   │              │
//! │              │  protocols.l402 {invoice,   │              │
//! │              │                 hash, sats} │              │
//! │              │                             │              │
//! │   (agent pays the invoice out of band)     │              │
//! │              │                             │              │
//! │              │  POST + Authorization: L402 │              │
//! │              │  {prompt, payment_hash}     │              │
//! │              │ ───────────────────────────→│              │
//! │              │ ←───────────────────────────│              │
//! │              │  200 OK {result}            │              │
//! └──────────────┘                             └──────────────┘
//! ```
//!
//! # Components
//!
//! - **[`types`]**: challenge / result types and response classification
//! - **[`transport`]**: the [`Transport`] seam and the reqwest implementation
//! - **[`client`]**: the request adapter ([`L402Client`])
//! - **[`format`]**: text rendering for the agent host
//! - **[`error`]**: error types with recovery suggestions
//!
//! # Usage
//!
//! ```rust,no_run
//! use maximumsats_l402::{format, JsonObject, L402Client, API_BASE, DEFAULT_TIMEOUT};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = L402Client::http(DEFAULT_TIMEOUT)?;
//!
//! let mut body = JsonObject::new();
//! body.insert("prompt".into(), "What is a HTLC?".into());
//!
//! let reply = client.post(API_BASE, "/api/dvm", body.clone(), None).await?;
//! if let Some(challenge) = reply.challenge() {
//!     println!("{}", format::render_challenge(challenge));
//!     // ... pay the invoice, then:
//!     let paid = client
//!         .post(API_BASE, "/api/dvm", body, Some(&challenge.payment_hash))
//!         .await?;
//!     println!("{}", format::render_reply(&paid));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Payment verification and settlement are entirely the upstream's concern;
//! this crate only relays challenge metadata and shaped requests.

pub mod client;
pub mod error;
pub mod format;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{build_request, join_url, JsonObject, L402Client};
pub use error::{L402Error, L402Result};
pub use transport::{
    HttpMethod, HttpTransport, Transport, UpstreamRequest, UpstreamResponse, DEFAULT_TIMEOUT,
};
pub use types::{
    Challenge, UpstreamReply, UpstreamResult, API_BASE, AUTH_SCHEME, DEFAULT_IMAGE_MODEL,
    PAYMENT_HASH_FIELD, STATUS_PAYMENT_REQUIRED, WOT_BASE,
};
