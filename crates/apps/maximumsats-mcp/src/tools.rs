//! MCP tool input types.
//!
//! Each input struct doubles as the tool's argument schema (via
//! `JsonSchema`) and as its validator (via `Deserialize`): the registry only
//! hands a handler a value that deserialized cleanly.
//!
//! Paid and metered tools accept an optional `payment_hash`. Call without it
//! first; if the upstream answers with a payment challenge, pay the invoice
//! and call the same tool again with the challenge's `payment_hash`.

use maximumsats_l402::JsonObject;
use rmcp::schemars;
use rmcp::schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

/// Common behavior of tool inputs.
pub trait ToolInput {
    /// Payment proof supplied by the caller, if any.
    fn payment_hash(&self) -> Option<&str> {
        None
    }
}

/// Input for a paid POST action: one subject field plus optional proof.
pub trait PaidInput: ToolInput {
    /// The value sent under the action's body field.
    fn subject(&self) -> &str;
}

/// Input for a GET lookup: query parameters plus optional proof.
pub trait LookupInput: ToolInput {
    /// Query parameters, excluding the payment proof.
    fn params(&self) -> JsonObject;
}

/// Treat empty or whitespace-only proofs as absent.
fn proof(payment_hash: &Option<String>) -> Option<&str> {
    payment_hash
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

fn string_params<const N: usize>(pairs: [(&str, &str); N]) -> JsonObject {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

// ============================================================================
// Paid actions
// ============================================================================

/// Input for `ask_bitcoin` and `generate_image`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PromptInput {
    /// Your question or image description.
    pub prompt: String,

    /// payment_hash from a previous payment challenge, after paying its invoice.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for PromptInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl PaidInput for PromptInput {
    fn subject(&self) -> &str {
        &self.prompt
    }
}

/// Input for `wot_report` and `nostr_summary`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PubkeyInput {
    /// Nostr public key in hex format.
    pub pubkey: String,

    /// payment_hash from a previous payment challenge, after paying its invoice.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for PubkeyInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl PaidInput for PubkeyInput {
    fn subject(&self) -> &str {
        &self.pubkey
    }
}

/// Input for `ln_analysis`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalysisInput {
    /// What to analyze about the Lightning Network.
    pub query: String,

    /// payment_hash from a previous payment challenge, after paying its invoice.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for AnalysisInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl PaidInput for AnalysisInput {
    fn subject(&self) -> &str {
        &self.query
    }
}

/// Input for `retry_with_payment`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RetryWithPaymentInput {
    /// The payment_hash from the payment challenge.
    pub payment_hash: String,

    /// The API endpoint to retry (e.g. /api/dvm, /api/imagegen).
    pub endpoint: String,

    /// The original prompt (or pubkey, for report and summary endpoints).
    pub prompt: String,
}

impl ToolInput for RetryWithPaymentInput {
    fn payment_hash(&self) -> Option<&str> {
        let hash = self.payment_hash.trim();
        (!hash.is_empty()).then_some(hash)
    }
}

// ============================================================================
// Web-of-Trust lookups
// ============================================================================

/// Input for `wot_top`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EmptyInput {}

impl ToolInput for EmptyInput {}

impl LookupInput for EmptyInput {
    fn params(&self) -> JsonObject {
        JsonObject::new()
    }
}

/// Input for single-pubkey Web-of-Trust lookups.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PubkeyLookupInput {
    /// Nostr public key in hex format.
    pub pubkey: String,

    /// payment_hash to use once the free tier is exhausted.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for PubkeyLookupInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl LookupInput for PubkeyLookupInput {
    fn params(&self) -> JsonObject {
        string_params([("pubkey", self.pubkey.as_str())])
    }
}

/// Input for `wot_trust_path`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TrustPathInput {
    /// Source Nostr public key in hex format.
    pub from: String,

    /// Target Nostr public key in hex format.
    pub to: String,

    /// payment_hash to use once the free tier is exhausted.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for TrustPathInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl LookupInput for TrustPathInput {
    fn params(&self) -> JsonObject {
        string_params([("from", self.from.as_str()), ("to", self.to.as_str())])
    }
}

/// Input for `wot_predict_link`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PredictLinkInput {
    /// Nostr public key that might follow.
    pub source: String,

    /// Nostr public key that might be followed.
    pub target: String,

    /// payment_hash to use once the free tier is exhausted.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for PredictLinkInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl LookupInput for PredictLinkInput {
    fn params(&self) -> JsonObject {
        string_params([("source", self.source.as_str()), ("target", self.target.as_str())])
    }
}

/// Input for `wot_influence`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InfluenceInput {
    /// Nostr public key that would follow.
    pub pubkey: String,

    /// Nostr public key that would be followed.
    pub other: String,

    /// payment_hash to use once the free tier is exhausted.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for InfluenceInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl LookupInput for InfluenceInput {
    fn params(&self) -> JsonObject {
        string_params([("pubkey", self.pubkey.as_str()), ("other", self.other.as_str())])
    }
}

/// Input for `wot_network_health`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NetworkHealthInput {
    /// payment_hash to use once the free tier is exhausted.
    #[serde(default)]
    pub payment_hash: Option<String>,
}

impl ToolInput for NetworkHealthInput {
    fn payment_hash(&self) -> Option<&str> {
        proof(&self.payment_hash)
    }
}

impl LookupInput for NetworkHealthInput {
    fn params(&self) -> JsonObject {
        JsonObject::new()
    }
}
