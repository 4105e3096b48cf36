//! External consent SDK surface
//!
//! The Google implementation speaks three documented surfaces: the consent
//! flow (authorization code + PKCE through a loopback redirect), the
//! `tokeninfo` validity probe, and the `revoke` endpoint. Nothing here
//! invents protocol on top of them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use cadence_common::auth::PkceChallenge;
use cadence_domain::constants::{
    GOOGLE_AUTHORIZATION_ENDPOINT, GOOGLE_CALENDAR_DISCOVERY_DOC, GOOGLE_REVOKE_ENDPOINT,
    GOOGLE_TOKENINFO_ENDPOINT, GOOGLE_TOKEN_ENDPOINT,
};
use cadence_domain::{CadenceError, CalendarConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Trait over the external consent SDK
///
/// The two `init_*` surfaces are the analogue of the SDK's independently
/// loaded script surfaces; the calendar link adapter joins them into a single
/// readiness gate. Everything else maps one-to-one onto documented SDK entry
/// points.
#[async_trait]
pub trait ConsentSdk: Send + Sync {
    /// Initialize the API surface (endpoint discovery)
    async fn init_api_surface(&self) -> Result<()>;

    /// Initialize the token-consent surface (token client construction)
    async fn init_token_surface(&self) -> Result<()>;

    /// Run the consent flow and return the granted access token.
    ///
    /// Blocks until the user completes or abandons the external prompt,
    /// bounded by the configured consent timeout.
    async fn request_access_token(&self) -> Result<String>;

    /// The locally held grant, if any
    async fn cached_token(&self) -> Option<String>;

    /// Install or clear the locally held grant (e.g., a token fetched back
    /// from the backend relay)
    async fn set_cached_token(&self, token: Option<String>);

    /// Probe whether a grant is currently accepted by the provider
    async fn probe_token(&self, token: &str) -> Result<bool>;

    /// Revoke a grant at the provider
    async fn revoke(&self, token: &str) -> Result<()>;
}

/// Configuration for the Google consent client
#[derive(Debug, Clone)]
pub struct GoogleConsentSettings {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub scopes: Vec<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub revoke_endpoint: String,
    pub tokeninfo_endpoint: String,
    pub discovery_url: String,
    pub consent_timeout: Duration,
}

impl GoogleConsentSettings {
    /// Build settings from the calendar configuration with Google defaults
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes: config.scopes.clone(),
            authorization_endpoint: GOOGLE_AUTHORIZATION_ENDPOINT.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            revoke_endpoint: GOOGLE_REVOKE_ENDPOINT.to_string(),
            tokeninfo_endpoint: GOOGLE_TOKENINFO_ENDPOINT.to_string(),
            discovery_url: GOOGLE_CALENDAR_DISCOVERY_DOC.to_string(),
            consent_timeout: Duration::from_secs(config.consent_timeout_secs),
        }
    }
}

/// Token response from the authorization server (RFC 6749)
#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
}

/// Error response from the authorization server (RFC 6749 §5.2)
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Google consent client
///
/// The token client is instance state constructed once per process lifetime
/// and torn down on disconnect; there are no module-level globals.
pub struct GoogleConsentClient {
    settings: GoogleConsentSettings,
    http: Client,
    token: RwLock<Option<String>>,
}

impl GoogleConsentClient {
    /// Create a new consent client
    ///
    /// # Errors
    /// Returns `CadenceError::Config` if the HTTP client cannot be built
    pub fn new(settings: GoogleConsentSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CadenceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { settings, http, token: RwLock::new(None) })
    }

    fn build_authorization_url(
        &self,
        redirect_uri: &str,
        challenge: &PkceChallenge,
        prompt_consent: bool,
    ) -> String {
        let scope_string = self.settings.scopes.join(" ");

        let mut params = vec![
            ("response_type".to_string(), "code".to_string()),
            ("client_id".to_string(), self.settings.client_id.clone()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
            ("scope".to_string(), scope_string),
            ("state".to_string(), challenge.state.clone()),
            ("code_challenge".to_string(), challenge.code_challenge.clone()),
            ("code_challenge_method".to_string(), challenge.challenge_method().to_string()),
            ("access_type".to_string(), "offline".to_string()),
        ];

        // Force the consent screen only when no grant was ever held, the way
        // the token client distinguishes first-time from repeat requests.
        if prompt_consent {
            params.push(("prompt".to_string(), "consent".to_string()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.settings.authorization_endpoint, query_string)
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<String> {
        let mut form = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("client_id".to_string(), self.settings.client_id.clone()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
            ("code_verifier".to_string(), code_verifier.to_string()),
        ];

        if let Some(secret) = &self.settings.client_secret {
            form.push(("client_secret".to_string(), secret.clone()));
        }

        let response = self
            .http
            .post(&self.settings.token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| CadenceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = match response.json::<OAuthErrorResponse>().await {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {}", err.error, desc),
                    None => err.error,
                },
                Err(_) => format!("token exchange failed with status {}", status),
            };
            return Err(CadenceError::Auth(message));
        }

        let tokens: TokenExchangeResponse = response
            .json()
            .await
            .map_err(|e| CadenceError::Internal(format!("Failed to parse token response: {}", e)))?;

        Ok(tokens.access_token)
    }
}

#[async_trait]
impl ConsentSdk for GoogleConsentClient {
    /// Discovery fetch: confirms the calendar API surface is reachable and
    /// well-formed before any operation is considered valid.
    async fn init_api_surface(&self) -> Result<()> {
        let response = self
            .http
            .get(&self.settings.discovery_url)
            .send()
            .await
            .map_err(|e| CadenceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CadenceError::Request {
                status: response.status().as_u16(),
                message: "calendar discovery document unavailable".to_string(),
            });
        }

        debug!("Calendar API surface initialized");
        Ok(())
    }

    async fn init_token_surface(&self) -> Result<()> {
        if self.settings.client_id.is_empty() {
            return Err(CadenceError::Config(
                "calendar client_id is not configured".to_string(),
            ));
        }

        debug!("Token consent surface initialized");
        Ok(())
    }

    async fn request_access_token(&self) -> Result<String> {
        let challenge = PkceChallenge::generate();

        let server = CallbackServer::start().await?;
        server.set_expected_state(challenge.state.clone());
        let redirect_uri = server.redirect_uri();

        let prompt_consent = self.token.read().await.is_none();
        let url = self.build_authorization_url(&redirect_uri, &challenge, prompt_consent);
        info!(url = %url, "Open the authorization URL in a browser to grant calendar access");

        let code = server.wait_for_code(self.settings.consent_timeout).await?;
        let access_token = self.exchange_code(&code, &redirect_uri, &challenge.code_verifier).await?;

        *self.token.write().await = Some(access_token.clone());
        server.shutdown().await?;

        info!("Calendar access granted");
        Ok(access_token)
    }

    async fn cached_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn set_cached_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn probe_token(&self, token: &str) -> Result<bool> {
        let url = format!(
            "{}?access_token={}",
            self.settings.tokeninfo_endpoint,
            urlencoding::encode(token)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CadenceError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status.is_client_error() {
            // The provider no longer accepts the grant.
            return Ok(false);
        }

        Err(CadenceError::Request {
            status: status.as_u16(),
            message: "token validity probe failed".to_string(),
        })
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.settings.revoke_endpoint)
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| CadenceError::Network(e.to_string()))?;

        let status = response.status();
        // 400 means the grant was already invalid; revocation is idempotent.
        if status.is_success() || status.as_u16() == 400 {
            return Ok(());
        }

        Err(CadenceError::Request {
            status: status.as_u16(),
            message: "token revocation failed".to_string(),
        })
    }
}

/// OAuth callback data captured by the loopback server
#[derive(Debug, Clone)]
struct CallbackData {
    code: String,
}

/// Loopback HTTP server that receives OAuth redirect callbacks
pub(crate) struct CallbackServer {
    port: u16,
    callback_data: Arc<StdMutex<Option<CallbackData>>>,
    expected_state: Arc<StdMutex<Option<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CallbackServer {
    /// Start the loopback server on an ephemeral port
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await.map_err(|err| {
            CadenceError::Network(format!("failed to bind consent loopback server: {err}"))
        })?;

        let port = listener
            .local_addr()
            .map_err(|err| CadenceError::Network(format!("failed to determine port: {err}")))?
            .port();

        let callback_data = Arc::new(StdMutex::new(None));
        let expected_state = Arc::new(StdMutex::new(None));

        let callback_data_clone = callback_data.clone();
        let expected_state_clone = expected_state.clone();

        let app = Router::new().route(
            "/callback",
            get(move |query: Query<HashMap<String, String>>| {
                handle_callback(query, callback_data_clone.clone(), expected_state_clone.clone())
            }),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("Consent callback server error: {}", err);
            }
        });

        Ok(Self {
            port,
            callback_data,
            expected_state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Redirect URI used in the authorization request
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// Configure the expected OAuth state for CSRF validation
    pub fn set_expected_state(&self, state: String) {
        let mut guard = self.expected_state.lock().expect("expected_state poisoned");
        *guard = Some(state);
    }

    /// Await the OAuth callback with a timeout
    pub async fn wait_for_code(&self, timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;

        loop {
            {
                let guard = self.callback_data.lock().expect("callback_data poisoned");
                if let Some(data) = guard.clone() {
                    return Ok(data.code);
                }
            }

            if Instant::now() > deadline {
                return Err(CadenceError::Network(
                    "consent callback timed out waiting for authorization code".to_string(),
                ));
            }

            sleep(Duration::from_millis(100)).await;
        }
    }

    /// Shut down the loopback server gracefully
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    return Err(CadenceError::Internal(format!(
                        "consent callback server panicked: {err}"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

async fn handle_callback(
    Query(params): Query<HashMap<String, String>>,
    callback_data: Arc<StdMutex<Option<CallbackData>>>,
    expected_state: Arc<StdMutex<Option<String>>>,
) -> Html<&'static str> {
    let code = params.get("code").cloned();
    let state = params.get("state").cloned();
    let expected = expected_state.lock().expect("expected_state poisoned").clone();

    match (code, state, expected) {
        (Some(code), Some(state), Some(expected_state)) if state == expected_state => {
            let mut guard = callback_data.lock().expect("callback_data poisoned");
            *guard = Some(CallbackData { code });

            Html(
                r#"<!DOCTYPE html>
<html>
<head><title>Authorization Complete</title></head>
<body><h1>Authorization Successful</h1><p>You can close this window.</p></body>
</html>"#,
            )
        }
        _ => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Authorization Failed</title></head>
<body><h1>Authorization Failed</h1><p>Invalid or unexpected callback parameters.</p></body>
</html>"#,
        ),
    }
}
