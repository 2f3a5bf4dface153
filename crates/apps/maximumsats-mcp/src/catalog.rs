//! The MaximumSats tool catalog.
//!
//! Paid actions are POSTed to the MaximumSats API and answer an unpaid
//! request with an L402 challenge. Web-of-Trust lookups are GETs against the
//! WoT API; most are free until a per-caller quota runs out, after which they
//! answer with a free-tier challenge.

use std::sync::Arc;

use maximumsats_l402::{format, JsonObject, L402Client, L402Result, UpstreamReply};
use rmcp::model::{CallToolResult, Content};
use rmcp::schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ToolError;
use crate::registry::ToolDescriptor;
use crate::tools::{
    AnalysisInput, EmptyInput, InfluenceInput, LookupInput, NetworkHealthInput, PaidInput,
    PredictLinkInput, PromptInput, PubkeyInput, PubkeyLookupInput, RetryWithPaymentInput,
    ToolInput, TrustPathInput,
};

/// A paid POST action on the MaximumSats API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaidAction {
    /// Tool name.
    pub tool: &'static str,
    /// API path.
    pub endpoint: &'static str,
    /// Advertised price in sats.
    pub price_sats: u64,
    /// Body field carrying the action's subject.
    pub body_field: &'static str,
    /// Tool description.
    pub description: &'static str,
}

/// A GET lookup on the Web-of-Trust API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WotLookup {
    /// Tool name.
    pub tool: &'static str,
    /// API path.
    pub endpoint: &'static str,
    /// Tool description.
    pub description: &'static str,
}

pub const ASK_BITCOIN: PaidAction = PaidAction {
    tool: "ask_bitcoin",
    endpoint: "/api/dvm",
    price_sats: 21,
    body_field: "prompt",
    description: "Ask a question about Bitcoin, Lightning Network, or cryptocurrency. Powered by Llama 3.3 70B. Costs 21 sats via Lightning L402. Call without payment_hash to get an invoice; after paying, call again with the payment_hash.",
};

pub const GENERATE_IMAGE: PaidAction = PaidAction {
    tool: "generate_image",
    endpoint: "/api/imagegen",
    price_sats: 100,
    body_field: "prompt",
    description: "Generate an image from a text prompt using FLUX.1 Schnell (12B). Costs 100 sats via Lightning L402. Call without payment_hash to get an invoice; after paying, call again with the payment_hash.",
};

pub const WOT_REPORT: PaidAction = PaidAction {
    tool: "wot_report",
    endpoint: "/api/wot-report",
    price_sats: 100,
    body_field: "pubkey",
    description: "Get a detailed Web of Trust analysis report for a Nostr pubkey. Costs 100 sats via Lightning L402. Call without payment_hash to get an invoice; after paying, call again with the payment_hash.",
};

pub const NOSTR_SUMMARY: PaidAction = PaidAction {
    tool: "nostr_summary",
    endpoint: "/api/nostr-summary",
    price_sats: 50,
    body_field: "pubkey",
    description: "Get an AI-powered summary of a Nostr profile with activity and reputation analysis. Costs 50 sats via Lightning L402. Call without payment_hash to get an invoice; after paying, call again with the payment_hash.",
};

pub const LN_ANALYSIS: PaidAction = PaidAction {
    tool: "ln_analysis",
    endpoint: "/api/ln-analysis",
    price_sats: 75,
    body_field: "prompt",
    description: "Get an AI-powered Lightning Network analysis with real-time data. Costs 75 sats via Lightning L402. Call without payment_hash to get an invoice; after paying, call again with the payment_hash.",
};

/// Every paid action, for endpoint lookup on retry.
pub const PAID_ACTIONS: &[PaidAction] = &[
    ASK_BITCOIN,
    GENERATE_IMAGE,
    WOT_REPORT,
    NOSTR_SUMMARY,
    LN_ANALYSIS,
];

pub const WOT_SCORE: WotLookup = WotLookup {
    tool: "wot_score",
    endpoint: "/score",
    description: "Look up a Nostr pubkey's Web of Trust score. Free within the daily quota; afterwards returns an invoice, then call again with the payment_hash.",
};

pub const WOT_TOP: WotLookup = WotLookup {
    tool: "wot_top",
    endpoint: "/top",
    description: "Get the top 100 Nostr accounts by Web of Trust score. Free, no payment required.",
};

pub const WOT_SYBIL_CHECK: WotLookup = WotLookup {
    tool: "wot_sybil_check",
    endpoint: "/sybil",
    description: "Estimate how likely a Nostr pubkey is to be a sybil (fake or bot) account from its follow graph. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_TRUST_PATH: WotLookup = WotLookup {
    tool: "wot_trust_path",
    endpoint: "/trust-path",
    description: "Find the shortest chain of follows connecting two Nostr pubkeys and how much trust flows along it. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_NETWORK_HEALTH: WotLookup = WotLookup {
    tool: "wot_network_health",
    endpoint: "/network-health",
    description: "Get aggregate health metrics of the Nostr follow graph (size, density, connectivity). Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_FOLLOW_QUALITY: WotLookup = WotLookup {
    tool: "wot_follow_quality",
    endpoint: "/follow-quality",
    description: "Rate the quality of the accounts a Nostr pubkey follows. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_TRUST_CIRCLE: WotLookup = WotLookup {
    tool: "wot_trust_circle",
    endpoint: "/trust-circle",
    description: "List the mutual-follow trust circle around a Nostr pubkey. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_ANOMALIES: WotLookup = WotLookup {
    tool: "wot_anomalies",
    endpoint: "/anomalies",
    description: "Detect anomalous follow behavior (bursts, follow-back farming) for a Nostr pubkey. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_PREDICT_LINK: WotLookup = WotLookup {
    tool: "wot_predict_link",
    endpoint: "/predict",
    description: "Predict how likely one Nostr pubkey is to follow another. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_COMPARE_PROVIDERS: WotLookup = WotLookup {
    tool: "wot_compare_providers",
    endpoint: "/compare-providers",
    description: "Compare a Nostr pubkey's trust score across Web of Trust providers. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

pub const WOT_INFLUENCE: WotLookup = WotLookup {
    tool: "wot_influence",
    endpoint: "/influence",
    description: "Simulate how a new follow from one Nostr pubkey to another would shift Web of Trust scores. Free within the daily quota; afterwards pay and retry with payment_hash.",
};

const RETRY_WITH_PAYMENT: &str = "retry_with_payment";

const RETRY_DESCRIPTION: &str = "Complete an L402 request after paying the Lightning invoice. Pass the payment_hash from the original request and the endpoint to retry. Prefer calling the original tool again with payment_hash.";

/// Upstream coordinates shared by every handler.
#[derive(Debug)]
pub struct Upstream {
    client: L402Client,
    api_base: String,
    wot_base: String,
}

impl Upstream {
    /// Create from a client and the two API base URLs.
    pub fn new(client: L402Client, api_base: impl Into<String>, wot_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            wot_base: wot_base.into(),
        }
    }

    async fn paid(
        &self,
        action: &PaidAction,
        subject: &str,
        payment_hash: Option<&str>,
    ) -> L402Result<UpstreamReply> {
        let mut body = JsonObject::new();
        body.insert(action.body_field.to_string(), Value::String(subject.to_string()));
        self.client
            .post(&self.api_base, action.endpoint, body, payment_hash)
            .await
    }

    async fn lookup(
        &self,
        lookup: &WotLookup,
        params: JsonObject,
        payment_hash: Option<&str>,
    ) -> L402Result<UpstreamReply> {
        self.client
            .get(&self.wot_base, lookup.endpoint, params, payment_hash)
            .await
    }
}

/// Build the full tool list in catalog order.
pub fn tools(upstream: Arc<Upstream>) -> Vec<ToolDescriptor> {
    vec![
        paid_tool::<PromptInput>(ASK_BITCOIN, &upstream),
        paid_tool::<PromptInput>(GENERATE_IMAGE, &upstream),
        retry_tool(&upstream),
        lookup_tool::<PubkeyLookupInput>(WOT_SCORE, &upstream),
        lookup_tool::<EmptyInput>(WOT_TOP, &upstream),
        paid_tool::<PubkeyInput>(WOT_REPORT, &upstream),
        paid_tool::<PubkeyInput>(NOSTR_SUMMARY, &upstream),
        paid_tool::<AnalysisInput>(LN_ANALYSIS, &upstream),
        lookup_tool::<PubkeyLookupInput>(WOT_SYBIL_CHECK, &upstream),
        lookup_tool::<TrustPathInput>(WOT_TRUST_PATH, &upstream),
        lookup_tool::<NetworkHealthInput>(WOT_NETWORK_HEALTH, &upstream),
        lookup_tool::<PubkeyLookupInput>(WOT_FOLLOW_QUALITY, &upstream),
        lookup_tool::<PubkeyLookupInput>(WOT_TRUST_CIRCLE, &upstream),
        lookup_tool::<PubkeyLookupInput>(WOT_ANOMALIES, &upstream),
        lookup_tool::<PredictLinkInput>(WOT_PREDICT_LINK, &upstream),
        lookup_tool::<PubkeyLookupInput>(WOT_COMPARE_PROVIDERS, &upstream),
        lookup_tool::<InfluenceInput>(WOT_INFLUENCE, &upstream),
    ]
}

/// Find the paid action served at `endpoint`.
pub fn paid_action_for(endpoint: &str) -> Option<&'static PaidAction> {
    PAID_ACTIONS.iter().find(|a| a.endpoint == endpoint)
}

fn paid_tool<I>(action: PaidAction, upstream: &Arc<Upstream>) -> ToolDescriptor
where
    I: PaidInput + DeserializeOwned + JsonSchema + Send + Sync + 'static,
{
    let upstream = Arc::clone(upstream);
    ToolDescriptor::new(action.tool, action.description, move |input: I| {
        let upstream = Arc::clone(&upstream);
        async move {
            let reply = upstream
                .paid(&action, input.subject(), input.payment_hash())
                .await;
            respond(action.tool, reply, format::render_reply)
        }
    })
}

fn lookup_tool<I>(lookup: WotLookup, upstream: &Arc<Upstream>) -> ToolDescriptor
where
    I: LookupInput + DeserializeOwned + JsonSchema + Send + Sync + 'static,
{
    let upstream = Arc::clone(upstream);
    ToolDescriptor::new(lookup.tool, lookup.description, move |input: I| {
        let upstream = Arc::clone(&upstream);
        async move {
            let reply = upstream
                .lookup(&lookup, input.params(), input.payment_hash())
                .await;
            respond(lookup.tool, reply, format::render_reply)
        }
    })
}

fn retry_tool(upstream: &Arc<Upstream>) -> ToolDescriptor {
    let upstream = Arc::clone(upstream);
    ToolDescriptor::new(
        RETRY_WITH_PAYMENT,
        RETRY_DESCRIPTION,
        move |input: RetryWithPaymentInput| {
            let upstream = Arc::clone(&upstream);
            async move {
                let endpoint = normalize_endpoint(&input.endpoint);
                // Unknown endpoints still get a prompt body; the upstream decides.
                let body_field = paid_action_for(&endpoint)
                    .map(|action| action.body_field)
                    .unwrap_or("prompt");

                let mut body = JsonObject::new();
                body.insert(body_field.to_string(), Value::String(input.prompt.clone()));
                let reply = upstream
                    .client
                    .post(&upstream.api_base, &endpoint, body, input.payment_hash())
                    .await;

                respond(RETRY_WITH_PAYMENT, reply, |reply| match reply {
                    UpstreamReply::Challenge(challenge) => {
                        format::render_challenge_for_endpoint(challenge, &endpoint)
                    }
                    UpstreamReply::Result(result) => format::render_result(result),
                })
            }
        },
    )
}

/// Convert an adapter outcome into the tool result the host sees.
///
/// Upstream failures become error-flagged text results; they never cross the
/// protocol boundary as faults.
fn respond(
    tool: &str,
    reply: L402Result<UpstreamReply>,
    render: impl FnOnce(&UpstreamReply) -> String,
) -> CallToolResult {
    match reply {
        Ok(reply) => {
            if let UpstreamReply::Challenge(challenge) = &reply {
                info!(
                    tool = tool,
                    price_sats = challenge.price_sats,
                    "Returning payment challenge to caller"
                );
            }
            CallToolResult::success(vec![Content::text(render(&reply))])
        }
        Err(e) => {
            warn!(tool = tool, error = %e, "Upstream call failed");
            tool_error(&ToolError::Upstream(e))
        }
    }
}

/// Create a standardized error response for MCP tools.
///
/// Returns a JSON-formatted error with error code, message, and recovery suggestion.
pub fn tool_error(error: &ToolError) -> CallToolResult {
    let response = json!({
        "error": error.error_code(),
        "message": error.to_string(),
        "suggestion": error.suggestion(),
    });
    CallToolResult::error(vec![Content::text(response.to_string())])
}

fn normalize_endpoint(endpoint: &str) -> String {
    format!("/{}", endpoint.trim().trim_start_matches('/'))
}
