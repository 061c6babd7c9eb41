//! HTTP-level tests over the full router.

use crate::api;
use crate::auth::signing::{generate_secret, sign_payload};
use crate::config::Config;
use crate::test_utils::*;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

fn server(harness: &TestHarness) -> TestServer {
    server_with_config(harness, Config::default())
}

fn server_with_config(harness: &TestHarness, config: Config) -> TestServer {
    let router = api::router(test_state_with_config(harness, config));
    TestServer::new(router).expect("test server should build")
}

fn identity() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-ticker-user"),
        HeaderValue::from_static("u1"),
    )
}

#[tokio::test]
async fn health_is_open() {
    let h = harness();
    let server = server(&h);
    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn status_requires_identity() {
    let h = harness();
    let server = server(&h);
    let response = server.get("/api/v1/swipes/status").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn provision_then_status_round_trip() {
    let h = harness();
    let server = server(&h);
    let (name, value) = identity();

    let provisioned = server.put("/internal/api/v1/users/u1").await;
    provisioned.assert_status(StatusCode::OK);
    let body: Value = provisioned.json();
    assert_eq!(body["swipesRemaining"], 10);
    assert_eq!(body["maxSwipes"], 10);
    assert_eq!(body["tier"], "free");

    let status = server
        .get("/api/v1/swipes/status")
        .add_header(name, value)
        .await;
    status.assert_status(StatusCode::OK);
    let body: Value = status.json();
    assert_eq!(body["swipesRemaining"], 10);
    assert_eq!(body["needsReset"], false);
}

#[tokio::test]
async fn unknown_user_status_is_not_found() {
    let h = harness();
    let server = server(&h);
    let (name, value) = identity();

    let response = server
        .get("/api/v1/swipes/status")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_serves_and_then_caches() {
    let h = harness();
    h.generator
        .push_batch(vec![stock_candidate("NVDA"), stock_candidate("AMD")]);
    let server = server(&h);
    let (name, value) = identity();
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    let request_body = json!({
        "profile": {
            "investmentAmount": "$1K - $5K",
            "riskLevel": "moderate",
            "interests": ["technology"]
        },
        "type": "stock",
        "count": 2
    });

    let first = server
        .post("/api/v1/cards/generate")
        .add_header(name.clone(), value.clone())
        .json(&request_body)
        .await;
    first.assert_status(StatusCode::OK);
    let body: Value = first.json();
    assert_eq!(body["cached"], false);
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["type"], "stock");
    assert_eq!(cards[0]["ticker"], "NVDA");
    assert!(cards[0].get("simpleExplainer").is_some());

    let second = server
        .post("/api/v1/cards/generate")
        .add_header(name, value)
        .json(&request_body)
        .await;
    second.assert_status(StatusCode::OK);
    let body: Value = second.json();
    assert_eq!(body["cached"], true);
}

#[tokio::test]
async fn generate_rejects_out_of_range_count() {
    let h = harness();
    let server = server(&h);
    let (name, value) = identity();
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    let response = server
        .post("/api/v1/cards/generate")
        .add_header(name, value)
        .json(&json!({
            "profile": {"investmentAmount": "$1K", "riskLevel": "low", "interests": []},
            "category": "stock",
            "count": 0
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn swipe_quota_runs_out_at_the_tier_limit() {
    let h = harness();
    let server = server(&h);
    let (name, value) = identity();
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    for expected_remaining in (0..10).rev() {
        let response = server
            .post("/api/v1/swipes")
            .add_header(name.clone(), value.clone())
            .json(&json!({"contentId": "NVDA", "direction": "left"}))
            .await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["swipesRemaining"], expected_remaining);
    }

    let exhausted = server
        .post("/api/v1/swipes")
        .add_header(name.clone(), value.clone())
        .json(&json!({"contentId": "NVDA", "direction": "left"}))
        .await;
    exhausted.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = exhausted.json();
    assert_eq!(body["tier"], "free");
    assert_eq!(body["maxSwipes"], 10);

    let undone = server
        .post("/api/v1/swipes/undo")
        .add_header(name, value)
        .json(&json!({"contentId": "NVDA", "direction": "left"}))
        .await;
    undone.assert_status(StatusCode::OK);
    let body: Value = undone.json();
    assert_eq!(body["swipesRemaining"], 1);
}

#[tokio::test]
async fn malformed_direction_is_a_client_error() {
    let h = harness();
    let server = server(&h);
    let (name, value) = identity();
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    let response = server
        .post("/api/v1/swipes")
        .add_header(name, value)
        .json(&json!({"contentId": "NVDA", "direction": "sideways"}))
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn signed_webhook_updates_the_tier() {
    let secret = generate_secret();
    let mut config = Config::default();
    config.webhooks.secret = Some(secret.clone());

    let h = harness();
    let server = server_with_config(&h, config);
    let (name, value) = identity();
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    let payload = json!({"userId": "u1", "tier": "pro"}).to_string();
    let timestamp = 1741348800;
    let signature = sign_payload("msg_1", timestamp, &payload, &secret).unwrap();

    let response = server
        .post("/internal/api/v1/webhooks/subscription")
        .add_header(HeaderName::from_static("webhook-id"), HeaderValue::from_static("msg_1"))
        .add_header(
            HeaderName::from_static("webhook-timestamp"),
            HeaderValue::from_str(&timestamp.to_string()).unwrap(),
        )
        .add_header(
            HeaderName::from_static("webhook-signature"),
            HeaderValue::from_str(&signature).unwrap(),
        )
        .add_header(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        )
        .text(payload)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let status = server
        .get("/api/v1/swipes/status")
        .add_header(name, value)
        .await;
    let body: Value = status.json();
    assert_eq!(body["tier"], "pro");
    assert_eq!(body["maxSwipes"], 50);
    assert_eq!(body["swipesRemaining"], 50);
}

#[tokio::test]
async fn webhook_with_bad_signature_is_rejected() {
    let secret = generate_secret();
    let mut config = Config::default();
    config.webhooks.secret = Some(secret.clone());

    let h = harness();
    let server = server_with_config(&h, config);
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    let payload = json!({"userId": "u1", "tier": "pro"}).to_string();

    let bad_signature = server
        .post("/internal/api/v1/webhooks/subscription")
        .add_header(HeaderName::from_static("webhook-id"), HeaderValue::from_static("msg_1"))
        .add_header(
            HeaderName::from_static("webhook-timestamp"),
            HeaderValue::from_static("1741348800"),
        )
        .add_header(
            HeaderName::from_static("webhook-signature"),
            HeaderValue::from_static("v1,dGFtcGVyZWQ="),
        )
        .text(payload.clone())
        .await;
    bad_signature.assert_status(StatusCode::UNAUTHORIZED);

    let missing_headers = server
        .post("/internal/api/v1/webhooks/subscription")
        .text(payload)
        .await;
    missing_headers.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unsigned_webhook_is_accepted_when_no_secret_is_configured() {
    let h = harness();
    let server = server(&h);
    server.put("/internal/api/v1/users/u1").await.assert_status(StatusCode::OK);

    let response = server
        .post("/internal/api/v1/webhooks/subscription")
        .add_header(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        )
        .text(json!({"userId": "u1", "tier": "pro"}).to_string())
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let h = harness();
    let server = server(&h);
    let response = server.get("/api/v1/openapi.json").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"].get("/api/v1/swipes").is_some());
}
