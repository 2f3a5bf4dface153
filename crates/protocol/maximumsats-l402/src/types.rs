//! L402 handshake types.
//!
//! Upstream responses are loosely-typed JSON. [`UpstreamReply::classify`]
//! turns them into an explicit tagged union: either a [`Challenge`] asking
//! for a Lightning payment, or an opaque [`UpstreamResult`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{L402Error, L402Result};

/// Base URL of the paid MaximumSats API (AI text, images, reports).
pub const API_BASE: &str = "https://maximumsats.com";

/// Base URL of the Web-of-Trust lookup API (free and metered GETs).
pub const WOT_BASE: &str = "https://wot.klabo.world";

/// Authorization scheme used when retrying with a payment proof.
pub const AUTH_SCHEME: &str = "L402";

/// Body field / query parameter carrying the payment proof.
pub const PAYMENT_HASH_FIELD: &str = "payment_hash";

/// `status` marker used by POST endpoints to signal a challenge.
pub const STATUS_PAYMENT_REQUIRED: &str = "payment_required";

/// Model reported for image results that do not name one.
pub const DEFAULT_IMAGE_MODEL: &str = "flux-1-schnell";

/// Substring of a free-tier `message` announcing that payment is owed,
/// matched case-insensitively.
const FREE_TIER_PAY_MARKER: &str = "pay";

// =============================================================================
// Challenge
// =============================================================================

/// Payment challenge issued by the upstream.
///
/// Never persisted: it is rendered into a retry instruction and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Price of the action in satoshis.
    pub price_sats: u64,

    /// BOLT11 Lightning invoice to pay.
    pub payment_request: String,

    /// Opaque token the caller presents as proof after paying.
    pub payment_hash: String,
}

/// POST-style `protocols` envelope.
#[derive(Debug, Deserialize)]
struct Protocols {
    l402: Challenge,
}

/// The two key sets under which upstreams express a challenge.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChallengeShape {
    /// `{ "status": "payment_required", "protocols": { "l402": { ... } } }`
    Post { protocols: Protocols },

    /// `{ "message": "... Pay ...", "invoice", "payment_hash", "amount_sats" }`
    FreeTier {
        message: String,
        invoice: String,
        payment_hash: String,
        amount_sats: u64,
    },
}

// =============================================================================
// Result
// =============================================================================

/// Successful upstream payload, passed through as opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UpstreamResult(Value);

impl UpstreamResult {
    /// Wrap a raw JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Text answer (`result` field), if non-empty.
    pub fn result(&self) -> Option<&str> {
        self.non_empty_str("result")
    }

    /// Base64 image payload (`image` field), if non-empty.
    pub fn image(&self) -> Option<&str> {
        self.non_empty_str("image")
    }

    /// Model identifier (`model` field), if non-empty.
    pub fn model(&self) -> Option<&str> {
        self.non_empty_str("model")
    }

    /// The raw JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consume into the raw JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Reply
// =============================================================================

/// Classified outcome of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply {
    /// Payment is required before the action can complete.
    Challenge(Challenge),
    /// The action completed.
    Result(UpstreamResult),
}

impl UpstreamReply {
    /// Parse a raw response body and classify it.
    pub fn from_slice(body: &[u8]) -> L402Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| L402Error::malformed(format!("body is not valid JSON: {}", e)))?;
        Self::classify(value)
    }

    /// Classify a JSON body as a challenge or a result.
    ///
    /// POST-style and free-tier challenge key sets are both recognized. A
    /// body that is explicitly marked as a challenge (`status` marker or a
    /// `protocols.l402` object) but whose terms do not decode is rejected as
    /// malformed rather than passed through.
    pub fn classify(value: Value) -> L402Result<Self> {
        let challenge = match ChallengeShape::deserialize(&value) {
            Ok(ChallengeShape::Post { protocols }) => Some(protocols.l402),
            Ok(ChallengeShape::FreeTier {
                message,
                invoice,
                payment_hash,
                amount_sats,
            }) if message.to_ascii_lowercase().contains(FREE_TIER_PAY_MARKER) => Some(Challenge {
                price_sats: amount_sats,
                payment_request: invoice,
                payment_hash,
            }),
            _ => None,
        };

        if let Some(challenge) = challenge {
            if challenge.price_sats == 0 {
                return Err(L402Error::malformed("payment challenge has a zero price"));
            }
            return Ok(Self::Challenge(challenge));
        }

        if is_marked_challenge(&value) {
            return Err(L402Error::malformed(
                "payment challenge is missing price_sats, payment_request or payment_hash",
            ));
        }

        Ok(Self::Result(UpstreamResult(value)))
    }

    /// Returns true if this reply is a payment challenge.
    pub fn is_challenge(&self) -> bool {
        matches!(self, Self::Challenge(_))
    }

    /// The challenge, if this reply is one.
    pub fn challenge(&self) -> Option<&Challenge> {
        match self {
            Self::Challenge(c) => Some(c),
            Self::Result(_) => None,
        }
    }

    /// The result, if this reply is one.
    pub fn result(&self) -> Option<&UpstreamResult> {
        match self {
            Self::Challenge(_) => None,
            Self::Result(r) => Some(r),
        }
    }
}

fn is_marked_challenge(value: &Value) -> bool {
    let status_marked =
        value.get("status").and_then(Value::as_str) == Some(STATUS_PAYMENT_REQUIRED);
    let has_terms = value
        .pointer("/protocols/l402")
        .is_some_and(|terms| !terms.is_null());
    status_marked || has_terms
}
