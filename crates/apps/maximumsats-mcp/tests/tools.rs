//! Tool behavior against a mock upstream.

use std::sync::Arc;

use maximumsats_l402::HttpMethod;
use maximumsats_mcp::{MaximumSatsServer, McpServerConfig};
use maximumsats_test_utils::MockUpstream;
use rmcp::model::{CallToolResult, ErrorCode, JsonObject, RawContent, RawTextContent};
use serde_json::{json, Value};

fn test_server(mock: &MockUpstream) -> MaximumSatsServer {
    MaximumSatsServer::with_transport(McpServerConfig::default(), Arc::new(mock.clone())).unwrap()
}

fn args(value: Value) -> Option<JsonObject> {
    value.as_object().cloned()
}

fn text_of(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        RawContent::Text(RawTextContent { text, .. }) => text.clone(),
        other => panic!("expected text content, got {:?}", other),
    }
}

fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

#[tokio::test]
async fn test_catalog_listing() {
    let server = test_server(&MockUpstream::new());
    let names: Vec<String> = server
        .registry()
        .list()
        .into_iter()
        .map(|t| t.name.to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "ask_bitcoin",
            "generate_image",
            "retry_with_payment",
            "wot_score",
            "wot_top",
            "wot_report",
            "nostr_summary",
            "ln_analysis",
            "wot_sybil_check",
            "wot_trust_path",
            "wot_network_health",
            "wot_follow_quality",
            "wot_trust_circle",
            "wot_anomalies",
            "wot_predict_link",
            "wot_compare_providers",
            "wot_influence",
        ]
    );

    for tool in server.registry().descriptors() {
        assert_eq!(tool.input_schema()["type"], "object", "{}", tool.name());
        assert!(!tool.description().is_empty());
    }

    let score = server.registry().get("wot_score").unwrap();
    assert_eq!(score.input_schema()["required"], json!(["pubkey"]));
}

#[tokio::test]
async fn test_every_paid_tool_challenges_without_proof() {
    let cases = [
        ("ask_bitcoin", "/api/dvm", 21, json!({ "prompt": "What is a UTXO?" })),
        ("generate_image", "/api/imagegen", 100, json!({ "prompt": "a sunset" })),
        ("wot_report", "/api/wot-report", 100, json!({ "pubkey": "aa" })),
        ("nostr_summary", "/api/nostr-summary", 50, json!({ "pubkey": "aa" })),
        ("ln_analysis", "/api/ln-analysis", 75, json!({ "query": "fees" })),
    ];

    for (tool, path, price, arguments) in cases {
        let mock = MockUpstream::new().with_paid_action(path, price, "hash-1", json!({}));
        let server = test_server(&mock);

        let result = server.dispatch(tool, args(arguments)).await.unwrap();
        let text = text_of(&result);

        assert!(!is_error(&result), "{tool}");
        assert!(
            text.starts_with(&format!("Payment required: {} sats", price)),
            "{tool}: {text}"
        );
        assert!(text.contains("Lightning invoice: lnbc"), "{tool}");
        assert!(text.ends_with("retry with payment_hash: hash-1"), "{tool}");
        assert_eq!(mock.call_count(), 1, "{tool}");

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.starts_with("https://maximumsats.com"));
        assert_eq!(request.header("Authorization"), None);
    }
}

#[tokio::test]
async fn test_paid_round_trip() {
    let mock = MockUpstream::new().with_paid_action(
        "/api/dvm",
        21,
        "hash-dvm",
        json!({ "result": "An unspent transaction output." }),
    );
    let server = test_server(&mock);

    let first = server
        .dispatch("ask_bitcoin", args(json!({ "prompt": "What is a UTXO?" })))
        .await
        .unwrap();
    assert!(text_of(&first).contains("hash-dvm"));

    mock.mark_paid("hash-dvm");

    let second = server
        .dispatch(
            "ask_bitcoin",
            args(json!({ "prompt": "What is a UTXO?", "payment_hash": "hash-dvm" })),
        )
        .await
        .unwrap();
    assert_eq!(text_of(&second), "An unspent transaction output.");
    assert_eq!(mock.call_count(), 2);

    let request = mock.last_request().unwrap();
    assert_eq!(request.header("Authorization"), Some("L402 hash-dvm"));
    assert_eq!(request.body_field("payment_hash"), Some("hash-dvm"));
}

#[tokio::test]
async fn test_ln_analysis_sends_query_as_prompt() {
    let mock = MockUpstream::new().with_json("/api/ln-analysis", json!({ "result": "ok" }));
    let server = test_server(&mock);

    server
        .dispatch("ln_analysis", args(json!({ "query": "channel fees" })))
        .await
        .unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(request.body_field("prompt"), Some("channel fees"));
    assert_eq!(request.body_field("query"), None);
}

#[tokio::test]
async fn test_missing_argument_makes_no_upstream_call() {
    let mock = MockUpstream::new().with_json("/score", json!({ "score": 1 }));
    let server = test_server(&mock);

    let err = server.dispatch("wot_score", args(json!({}))).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("pubkey"));
    assert_eq!(mock.call_count(), 0);

    let err = server.dispatch("ask_bitcoin", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_image_result_is_summarized() {
    let image = "A".repeat(1000);
    let mock = MockUpstream::new().with_json("/api/imagegen", json!({ "image": image }));
    let server = test_server(&mock);

    let result = server
        .dispatch("generate_image", args(json!({ "prompt": "a sunset" })))
        .await
        .unwrap();
    let text = text_of(&result);

    assert_eq!(text, "Image generated. Base64 PNG (1000 chars). Model: flux-1-schnell");
    assert!(!text.contains(&image));
}

#[tokio::test]
async fn test_free_tier_exhaustion() {
    let mock = MockUpstream::new().with_metered_lookup(
        "/score",
        2,
        10,
        "hash-score",
        json!({ "pubkey": "aa", "score": 42 }),
    );
    let server = test_server(&mock);

    for _ in 0..2 {
        let result = server
            .dispatch("wot_score", args(json!({ "pubkey": "aa" })))
            .await
            .unwrap();
        assert!(text_of(&result).contains("\"score\": 42"));
    }

    let exhausted = server
        .dispatch("wot_score", args(json!({ "pubkey": "aa" })))
        .await
        .unwrap();
    let text = text_of(&exhausted);
    assert!(!is_error(&exhausted));
    assert!(text.starts_with("Payment required: 10 sats"));
    assert!(text.contains("hash-score"));

    mock.mark_paid("hash-score");
    let paid = server
        .dispatch(
            "wot_score",
            args(json!({ "pubkey": "aa", "payment_hash": "hash-score" })),
        )
        .await
        .unwrap();
    assert!(text_of(&paid).contains("\"score\": 42"));

    let request = mock.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert!(request.url.starts_with("https://wot.klabo.world"));
    assert_eq!(request.query_param("pubkey"), Some("aa"));
    assert_eq!(request.query_param("payment_hash"), Some("hash-score"));
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test]
async fn test_wot_top_is_stateless() {
    let top = json!([{ "pubkey": "aa", "score": 99 }, { "pubkey": "bb", "score": 98 }]);
    let mock = MockUpstream::new().with_json("/top", top.clone());
    let server = test_server(&mock);

    let first = text_of(&server.dispatch("wot_top", None).await.unwrap());
    let second = text_of(&server.dispatch("wot_top", args(json!({}))).await.unwrap());

    assert_eq!(first, serde_json::to_string_pretty(&top).unwrap());
    assert_eq!(first, second);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_two_pubkey_lookups_send_both_params() {
    let mock = MockUpstream::new()
        .with_json("/trust-path", json!({ "hops": 2 }))
        .with_json("/predict", json!({ "probability": 0.4 }))
        .with_json("/influence", json!({ "delta": 0.01 }));
    let server = test_server(&mock);

    server
        .dispatch("wot_trust_path", args(json!({ "from": "aa", "to": "bb" })))
        .await
        .unwrap();
    let request = mock.last_request().unwrap();
    assert_eq!(request.query_param("from"), Some("aa"));
    assert_eq!(request.query_param("to"), Some("bb"));

    server
        .dispatch("wot_predict_link", args(json!({ "source": "aa", "target": "bb" })))
        .await
        .unwrap();
    let request = mock.last_request().unwrap();
    assert_eq!(request.query_param("source"), Some("aa"));
    assert_eq!(request.query_param("target"), Some("bb"));

    server
        .dispatch("wot_influence", args(json!({ "pubkey": "aa", "other": "bb" })))
        .await
        .unwrap();
    let request = mock.last_request().unwrap();
    assert_eq!(request.query_param("pubkey"), Some("aa"));
    assert_eq!(request.query_param("other"), Some("bb"));

    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_retry_with_payment_maps_body_field() {
    let mock = MockUpstream::new()
        .with_paid_action("/api/wot-report", 100, "hash-report", json!({ "result": "report" }))
        .with_paid_action("/api/imagegen", 100, "hash-image", json!({ "image": "QUJD" }));
    mock.mark_paid("hash-report");
    mock.mark_paid("hash-image");
    let server = test_server(&mock);

    let result = server
        .dispatch(
            "retry_with_payment",
            args(json!({
                "payment_hash": "hash-report",
                "endpoint": "api/wot-report",
                "prompt": "aa",
            })),
        )
        .await
        .unwrap();
    assert_eq!(text_of(&result), "report");
    let request = mock.last_request().unwrap();
    assert!(request.url.ends_with("/api/wot-report"));
    assert_eq!(request.body_field("pubkey"), Some("aa"));
    assert_eq!(request.body_field("prompt"), None);

    let result = server
        .dispatch(
            "retry_with_payment",
            args(json!({
                "payment_hash": "hash-image",
                "endpoint": "/api/imagegen",
                "prompt": "a sunset",
            })),
        )
        .await
        .unwrap();
    assert_eq!(
        text_of(&result),
        "Image generated. Base64 PNG (4 chars). Model: flux-1-schnell"
    );
    assert_eq!(mock.last_request().unwrap().body_field("prompt"), Some("a sunset"));
}

#[tokio::test]
async fn test_retry_with_unpaid_hash_points_back_to_retry() {
    let mock = MockUpstream::new().with_paid_action("/api/dvm", 21, "hash-dvm", json!({}));
    let server = test_server(&mock);

    let result = server
        .dispatch(
            "retry_with_payment",
            args(json!({ "payment_hash": "hash-dvm", "endpoint": "/api/dvm", "prompt": "?" })),
        )
        .await
        .unwrap();
    let text = text_of(&result);

    assert!(text.starts_with("Payment required: 21 sats"));
    assert!(text.contains("endpoint=\"/api/dvm\""));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_upstream_failures_are_error_results() {
    let mock = MockUpstream::new().unreachable("connection refused");
    let server = test_server(&mock);

    let result = server
        .dispatch("wot_report", args(json!({ "pubkey": "aa" })))
        .await
        .unwrap();
    assert!(is_error(&result));
    let body: Value = serde_json::from_str(&text_of(&result)).unwrap();
    assert_eq!(body["error"], "UPSTREAM_UNREACHABLE");
    assert!(body["message"].as_str().unwrap().contains("connection refused"));

    let mock = MockUpstream::new().with_raw("/network-health", 502, "<html>Bad Gateway</html>");
    let server = test_server(&mock);

    let result = server.dispatch("wot_network_health", None).await.unwrap();
    assert!(is_error(&result));
    let body: Value = serde_json::from_str(&text_of(&result)).unwrap();
    assert_eq!(body["error"], "MALFORMED_UPSTREAM_RESPONSE");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_challenge_marker_without_terms_is_malformed() {
    let mock = MockUpstream::new().with_status_json(
        "/api/dvm",
        402,
        json!({ "status": "payment_required" }),
    );
    let server = test_server(&mock);

    let result = server
        .dispatch("ask_bitcoin", args(json!({ "prompt": "?" })))
        .await
        .unwrap();
    assert!(is_error(&result));
}
