//! Text rendering of upstream replies for the agent host.

use crate::types::{Challenge, UpstreamReply, UpstreamResult, DEFAULT_IMAGE_MODEL};

/// Render a reply as the single text blob the host displays.
pub fn render_reply(reply: &UpstreamReply) -> String {
    match reply {
        UpstreamReply::Challenge(challenge) => render_challenge(challenge),
        UpstreamReply::Result(result) => render_result(result),
    }
}

/// Retry instruction for a tool that accepts `payment_hash` directly.
pub fn render_challenge(challenge: &Challenge) -> String {
    format!(
        "Payment required: {} sats\n\nLightning invoice: {}\n\nAfter paying, retry with payment_hash: {}",
        challenge.price_sats, challenge.payment_request, challenge.payment_hash
    )
}

/// Retry instruction pointing at the `retry_with_payment` tool.
pub fn render_challenge_for_endpoint(challenge: &Challenge, endpoint: &str) -> String {
    format!(
        "Payment required: {} sats\n\nLightning invoice: {}\n\nAfter paying, call retry_with_payment with endpoint=\"{}\" and payment_hash: {}",
        challenge.price_sats, challenge.payment_request, endpoint, challenge.payment_hash
    )
}

/// Render a successful result.
///
/// Images are summarized by payload length and model; the base64 data is
/// never inlined.
pub fn render_result(result: &UpstreamResult) -> String {
    if let Some(image) = result.image() {
        return format!(
            "Image generated. Base64 PNG ({} chars). Model: {}",
            image.len(),
            result.model().unwrap_or(DEFAULT_IMAGE_MODEL)
        );
    }

    if let Some(text) = result.result() {
        return text.to_string();
    }

    serde_json::to_string_pretty(result.value()).unwrap_or_else(|_| result.value().to_string())
}
