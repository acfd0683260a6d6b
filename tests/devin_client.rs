//! Integration tests for the Devin API client against a mock upstream.

use devin_mcp::devin::{DevinClient, DevinError};
use serde_json::json;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DevinClient {
    DevinClient::new(server.uri(), "sk-test".into())
}

// ── create_session ───────────────────────────────────────────

#[tokio::test]
async fn create_session_minimal_body_has_no_optional_fields() {
    let server = MockServer::start().await;

    // Exact body match: snapshot and budget fields must be absent.
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/sessions"))
        .and(matchers::header("authorization", "Bearer sk-test"))
        .and(matchers::body_json(json!({
            "prompt": "fix bug",
            "idempotent": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "devin-abc",
            "url": "https://app.devin.ai/sessions/abc",
            "is_new_session": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client(&server)
        .create_session("fix bug", None, None, false)
        .await
        .expect("create_session should succeed");

    assert_eq!(session["session_id"], "devin-abc");
    assert_eq!(session["is_new_session"], true);
}

#[tokio::test]
async fn create_session_forwards_optional_fields() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/sessions"))
        .and(matchers::body_json(json!({
            "prompt": "migrate the database",
            "idempotent": true,
            "snapshot_id": "snap-1",
            "max_acu_limit": 25,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "devin-xyz",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let max_acu = json!(25);
    client(&server)
        .create_session("migrate the database", Some("snap-1"), Some(&max_acu), true)
        .await
        .expect("create_session should succeed");
}

// ── get_session ──────────────────────────────────────────────

#[tokio::test]
async fn get_session_hits_session_path() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/session/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "devin-abc",
            "status_enum": "running",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client(&server).get_session("abc").await.unwrap();
    assert_eq!(session["status_enum"], "running");
}

// ── send_message ─────────────────────────────────────────────

#[tokio::test]
async fn send_message_accepts_empty_2xx_body() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/session/abc/message"))
        .and(matchers::body_json(json!({ "message": "keep going" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = client(&server)
        .send_message("abc", "keep going")
        .await
        .expect("2xx with empty body should be success");
    assert!(body.is_empty());
}

#[tokio::test]
async fn send_message_404_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/session/gone/message"))
        .respond_with(ResponseTemplate::new(404).set_body_string("session not found"))
        .mount(&server)
        .await;

    let err = client(&server)
        .send_message("gone", "hello?")
        .await
        .expect_err("404 should be an error");

    match err {
        DevinError::Http { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "session not found");
        }
        other => panic!("expected DevinError::Http, got: {other}"),
    }
}

// ── list_sessions ────────────────────────────────────────────

#[tokio::test]
async fn list_sessions_passes_pagination_params() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/sessions"))
        .and(matchers::query_param("limit", "5"))
        .and(matchers::query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessions": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .list_sessions(Some(5), Some(10))
        .await
        .unwrap();
}

#[tokio::test]
async fn list_sessions_omits_absent_params() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .and(matchers::path("/sessions"))
        .and(matchers::query_param_is_missing("limit"))
        .and(matchers::query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessions": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).list_sessions(None, None).await.unwrap();
}
