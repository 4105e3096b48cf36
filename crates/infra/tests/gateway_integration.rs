//! Integration tests for the backend gateway against a mock HTTP backend.

use std::sync::Arc;

use cadence_common::testing::MockKeychainProvider;
use cadence_core::{CalendarTokenRelay, ChatGateway, CredentialStore};
use cadence_domain::{CadenceError, ChatRole};
use cadence_infra::{ApiClient, ApiClientConfig, BackendGateway, KeychainSessionStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestCredentials = KeychainSessionStore<MockKeychainProvider>;

fn credentials() -> Arc<TestCredentials> {
    let service = format!("CadenceTest.gateway.{}", uuid::Uuid::new_v4());
    Arc::new(KeychainSessionStore::new(Arc::new(MockKeychainProvider::new(service))))
}

fn gateway(base_url: String, credentials: Arc<TestCredentials>) -> BackendGateway {
    let config = ApiClientConfig { base_url, ..Default::default() };
    let client = ApiClient::new(config, credentials.clone()).unwrap();
    BackendGateway::new(client, credentials)
}

fn auth_body(token: &str) -> serde_json::Value {
    serde_json::json!({
        "user": { "id": "u1", "username": "ada", "email": "ada@example.com" },
        "token": token,
    })
}

#[tokio::test]
async fn login_stores_the_returned_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({ "username": "ada", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("bearer-1")))
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    let gateway = gateway(mock_server.uri(), credentials.clone());

    let response = gateway.login("ada", "pw").await.unwrap();

    assert_eq!(response.user.username, "ada");
    assert_eq!(response.token, "bearer-1");
    assert_eq!(credentials.credential().await.unwrap(), Some("bearer-1".to_string()));
}

#[tokio::test]
async fn rejected_login_maps_to_auth_error_and_stores_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Invalid username or password" })),
        )
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    let gateway = gateway(mock_server.uri(), credentials.clone());

    let result = gateway.login("ada", "wrong").await;

    match result {
        Err(CadenceError::Auth(message)) => assert_eq!(message, "Invalid username or password"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!credentials.is_authenticated().await);
}

#[tokio::test]
async fn signup_stores_the_returned_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(serde_json::json!({
            "username": "ada",
            "password": "pw",
            "email": "ada@example.com",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("bearer-2")))
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    let gateway = gateway(mock_server.uri(), credentials.clone());

    gateway.signup("ada", "pw", Some("ada@example.com")).await.unwrap();

    assert_eq!(credentials.credential().await.unwrap(), Some("bearer-2".to_string()));
}

#[tokio::test]
async fn duplicate_signup_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(serde_json::json!({ "message": "username already taken" })),
        )
        .mount(&mock_server)
        .await;

    let gateway = gateway(mock_server.uri(), credentials());
    let result = gateway.signup("ada", "pw", None).await;

    assert!(matches!(result, Err(CadenceError::Auth(_))));
}

#[tokio::test]
async fn send_message_attaches_bearer_and_returns_the_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("Authorization", "Bearer bearer-3"))
        .and(body_json(serde_json::json!({ "content": "hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "1",
            "content": "hi",
            "role": "assistant",
            "timestamp": "2025-03-01T12:00:00Z",
        })))
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    credentials.set_credential("bearer-3").await.unwrap();
    let gateway = gateway(mock_server.uri(), credentials);

    let message = gateway.send_message("hi").await.unwrap();

    assert_eq!(message.id, "1");
    assert_eq!(message.content, "hi");
    assert_eq!(message.role, ChatRole::Assistant);
}

#[tokio::test]
async fn unauthenticated_send_surfaces_the_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let gateway = gateway(mock_server.uri(), credentials());
    let result = gateway.send_message("hi").await;

    assert!(matches!(result, Err(CadenceError::Request { status: 401, .. })));
}

#[tokio::test]
async fn empty_history_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    credentials.set_credential("bearer").await.unwrap();
    let gateway = gateway(mock_server.uri(), credentials);

    let history = gateway.message_history().await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn history_preserves_backend_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "1", "content": "first", "role": "user", "timestamp": "2025-03-01T12:00:00Z" },
            { "id": "2", "content": "second", "role": "assistant", "timestamp": "2025-03-01T12:00:05Z" },
        ])))
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    credentials.set_credential("bearer").await.unwrap();
    let gateway = gateway(mock_server.uri(), credentials);

    let history = gateway.message_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "first");
    assert_eq!(history[1].content, "second");
}

#[tokio::test]
async fn logout_clears_the_credential_and_is_idempotent() {
    let mock_server = MockServer::start().await;

    let credentials = credentials();
    credentials.set_credential("bearer").await.unwrap();
    let gateway = gateway(mock_server.uri(), credentials.clone());

    gateway.logout().await.unwrap();
    assert!(!credentials.is_authenticated().await);

    // No active credential: still not an error, and no request is made.
    gateway.logout().await.unwrap();
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn calendar_token_roundtrips_through_the_relay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/google/save-token"))
        .and(body_json(serde_json::json!({ "token": "cal-token" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/google/get-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "cal-token" })),
        )
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    credentials.set_credential("bearer").await.unwrap();
    let gateway = gateway(mock_server.uri(), credentials);

    gateway.save_calendar_token("cal-token").await.unwrap();
    let fetched = gateway.fetch_calendar_token().await.unwrap();

    assert_eq!(fetched, Some("cal-token".to_string()));
}

#[tokio::test]
async fn absent_calendar_token_comes_back_as_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/google/get-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": null })),
        )
        .mount(&mock_server)
        .await;

    let credentials = credentials();
    credentials.set_credential("bearer").await.unwrap();
    let gateway = gateway(mock_server.uri(), credentials);

    let fetched = gateway.fetch_calendar_token().await.unwrap();
    assert_eq!(fetched, None);
}
