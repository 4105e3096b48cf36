//! Authenticated HTTP request primitive
//!
//! A thin JSON client over reqwest. Attaches the stored bearer credential
//! when one is present and normalizes failures into the domain error type:
//! non-success statuses become `CadenceError::Request` (with the body's
//! `message` field when the backend provides one), transport failures become
//! `CadenceError::Network`. There are no automatic retries; every retry is a
//! fresh user-initiated action.

use std::sync::Arc;
use std::time::Duration;

use cadence_core::CredentialStore;
use cadence_domain::{CadenceError, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the backend (e.g., "http://127.0.0.1:8000")
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:8000".to_string(), timeout: Duration::from_secs(30) }
    }
}

/// JSON API client with bearer authentication
pub struct ApiClient {
    http: Client,
    config: ApiClientConfig,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    /// Returns `CadenceError::Config` if the underlying HTTP client cannot be
    /// built
    pub fn new(config: ApiClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CadenceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, credentials })
    }

    /// Execute a GET request against a relative endpoint path
    ///
    /// # Errors
    /// `CadenceError::Request` on non-success status, `CadenceError::Network`
    /// on transport failure
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    /// `CadenceError::Request` on non-success status, `CadenceError::Network`
    /// on transport failure
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| CadenceError::Internal(format!("Failed to serialize body: {}", e)))?;
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(method = %method, url = %url, "Issuing request");

        let mut request =
            self.http.request(method, &url).header("Content-Type", "application/json");

        // Bearer header only when a credential is present; unauthenticated
        // requests (login/signup) go out bare.
        if let Some(token) = self.credentials.credential().await? {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_status_error(status, &text));
        }

        // Empty success bodies decode as JSON null so callers can ask for
        // `()` or an Option.
        let payload = if text.is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            CadenceError::Internal(format!("Failed to parse response from {}: {}", path, e))
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> CadenceError {
    if err.is_timeout() {
        CadenceError::Network(format!("request timed out: {}", err))
    } else {
        CadenceError::Network(err.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> CadenceError {
    // Prefer the backend's own message field; otherwise derive one from the
    // status code.
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error: status {}", status.as_u16()));

    CadenceError::Request { status: status.as_u16(), message }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct FixedCredentials(Option<String>);

    #[async_trait]
    impl CredentialStore for FixedCredentials {
        async fn set_credential(&self, _token: &str) -> Result<()> {
            Ok(())
        }

        async fn credential(&self) -> Result<Option<String>> {
            Ok(self.0.clone())
        }

        async fn clear_credential(&self) -> Result<()> {
            Ok(())
        }

        async fn is_authenticated(&self) -> bool {
            self.0.is_some()
        }
    }

    fn client(base_url: String, token: Option<&str>) -> ApiClient {
        let config = ApiClientConfig { base_url, ..Default::default() };
        let credentials = Arc::new(FixedCredentials(token.map(str::to_string)));
        ApiClient::new(config, credentials).unwrap()
    }

    #[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_when_credential_present() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestResponse { message: "ok".to_string() }),
            )
            .mount(&mock_server)
            .await;

        let client = client(mock_server.uri(), Some("test-token"));
        let result: TestResponse = client.get("/test").await.unwrap();
        assert_eq!(result.message, "ok");
    }

    #[tokio::test]
    async fn test_get_sends_no_bearer_without_credential() {
        let mock_server = MockServer::start().await;

        // Matcher would reject a request carrying an Authorization header.
        Mock::given(method("GET"))
            .and(path("/open"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/open"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestResponse { message: "open".to_string() }),
            )
            .mount(&mock_server)
            .await;

        let client = client(mock_server.uri(), None);
        let result: TestResponse = client.get("/open").await.unwrap();
        assert_eq!(result.message, "open");
    }

    #[tokio::test]
    async fn test_error_message_taken_from_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({ "message": "content must not be empty" })),
            )
            .mount(&mock_server)
            .await;

        let client = client(mock_server.uri(), Some("tok"));
        let result: Result<TestResponse> =
            client.post("/chat", &serde_json::json!({ "content": "" })).await;

        match result {
            Err(CadenceError::Request { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "content must not be empty");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_message_falls_back_to_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = client(mock_server.uri(), None);
        let result: Result<TestResponse> = client.get("/broken").await;

        match result {
            Err(CadenceError::Request { status, message }) => {
                assert_eq!(status, 503);
                assert!(message.contains("503"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_network_error() {
        // Nothing is listening on this port.
        let client = client("http://127.0.0.1:9".to_string(), None);
        let result: Result<TestResponse> = client.get("/unreachable").await;
        assert!(matches!(result, Err(CadenceError::Network(_))));
    }

    #[tokio::test]
    async fn test_empty_success_body_decodes_as_unit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fire-and-forget"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = client(mock_server.uri(), Some("tok"));
        let result: Result<()> =
            client.post("/fire-and-forget", &serde_json::json!({})).await;
        assert!(result.is_ok());
    }
}
