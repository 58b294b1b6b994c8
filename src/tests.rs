use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::{api, utils::test::setup_test_state};

fn app() -> Router {
    api::router(setup_test_state())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

async fn create_session(app: &Router, user_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/session",
        Some(json!({ "userId": user_id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_store_status_reports_memory_backend() {
    let (status, body) = send(&app(), "GET", "/api/store/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "backend": "memory", "writable": true }));
}

#[tokio::test]
async fn test_get_user_requires_user_id() {
    let (status, body) = send(&app(), "GET", "/api/user", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId is required");
}

#[tokio::test]
async fn test_get_user_unknown_is_null_data() {
    let (status, body) = send(&app(), "GET", "/api/user?userId=42", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": null }));
}

#[tokio::test]
async fn test_put_then_get_user_round_trips() {
    let app = app();
    let record = json!({
        "id": "42",
        "username": "tester",
        "avatar": null,
        "tokenUsage": 1200,
        "lastTokenReset": chrono::Utc::now().to_rfc3339()
    });

    let (status, saved) = send(
        &app,
        "PUT",
        "/api/user",
        Some(json!({ "userId": "42", "tokenUsage": 0, "userData": record })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["id"], "42");
    assert!(saved["lastUpdated"].is_string());

    let (status, body) = send(&app, "GET", "/api/user?userId=42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], saved);
}

#[tokio::test]
async fn test_put_user_increments_usage() {
    let app = app();
    let record = json!({
        "id": "42",
        "username": "tester",
        "avatar": null,
        "tokenUsage": 1000,
        "lastTokenReset": chrono::Utc::now().to_rfc3339()
    });
    send(
        &app,
        "PUT",
        "/api/user",
        Some(json!({ "userId": "42", "userData": record })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/user",
        Some(json!({ "userId": "42", "tokenUsage": 250 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenUsage"], 1250);
}

#[tokio::test]
async fn test_put_user_without_record_is_not_found() {
    let (status, body) = send(
        &app(),
        "PUT",
        "/api/user",
        Some(json!({ "userId": "missing", "tokenUsage": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_get_user_applies_stale_window_reset() {
    let app = app();
    let record = json!({
        "id": "42",
        "username": "tester",
        "avatar": null,
        "tokenUsage": 9000,
        // Well past the 24-hour window
        "lastTokenReset": "2020-01-01T00:00:00Z"
    });
    send(
        &app,
        "PUT",
        "/api/user",
        Some(json!({ "userId": "42", "userData": record })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/user?userId=42", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tokenUsage"], 0);
    assert_ne!(body["data"]["lastTokenReset"], "2020-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_compile_rejects_missing_source() {
    let (status, body) = send(&app(), "POST", "/api/compile", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Source code is required");
}

#[tokio::test]
async fn test_create_session_returns_welcome() {
    let (status, body) = send(
        &app(),
        "POST",
        "/api/session",
        Some(json!({ "userId": "42" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
    assert_eq!(body["state"]["currentState"], "DESCRIPTION");
    assert_eq!(body["state"]["messages"][0]["type"], "system");
    assert_eq!(body["state"]["optimizations"]["remaining"], 3);
}

#[tokio::test]
async fn test_create_session_requires_user_id() {
    let (status, body) = send(
        &app(),
        "POST",
        "/api/session",
        Some(json!({ "userId": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId is required");
}

#[tokio::test]
async fn test_get_session_round_trips() {
    let app = app();
    let session_id = create_session(&app, "42").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/session?sessionId={}", session_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], session_id.as_str());
    assert_eq!(body["state"]["userId"], "42");
}

#[tokio::test]
async fn test_get_session_unknown_is_not_found() {
    let (status, body) = send(&app(), "GET", "/api/session?sessionId=missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn test_chat_unknown_session_is_not_found() {
    let (status, body) = send(
        &app(),
        "POST",
        "/api/chat",
        Some(json!({ "sessionId": "missing", "input": "a voting dapp" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn test_chat_rejects_oversized_input() {
    let app = app();
    let session_id = create_session(&app, "42").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/chat",
        Some(json!({ "sessionId": session_id, "input": "x".repeat(1001) })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Input exceeds the 1000 character limit");
}

#[tokio::test]
async fn test_contract_action_before_contract_is_rejected() {
    let app = app();
    let session_id = create_session(&app, "42").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/contract/action",
        Some(json!({ "sessionId": session_id, "action": "deploy" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Generate a contract before deploying");
}

#[tokio::test]
async fn test_deploy_before_contract_is_rejected() {
    let app = app();
    let session_id = create_session(&app, "42").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/deploy",
        Some(json!({
            "sessionId": session_id,
            "walletAddress": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_estimate_unknown_session_is_not_found() {
    let (status, body) = send(
        &app(),
        "POST",
        "/api/deploy/estimate",
        Some(json!({ "sessionId": "missing" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn test_estimate_requires_contract() {
    let app = app();
    let session_id = create_session(&app, "42").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/deploy/estimate",
        Some(json!({ "sessionId": session_id })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Generate a contract before estimating deployment cost"
    );
}

#[tokio::test]
async fn test_chain_status_surfaces_rpc_failure() {
    // The test RPC endpoint is a closed port, so the status probe fails
    let (status, body) = send(&app(), "GET", "/api/chain/status", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_reset_returns_fresh_state() {
    let app = app();
    let session_id = create_session(&app, "42").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/reset",
        Some(json!({ "sessionId": session_id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["state"]["currentState"], "DESCRIPTION");
    assert_eq!(body["state"]["tokenUsage"]["total"], 0);
}
