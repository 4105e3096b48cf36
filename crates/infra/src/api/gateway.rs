//! Backend gateway
//!
//! Implements the chat and calendar-relay ports on top of the authenticated
//! request primitive. Auth operations store the returned bearer token in the
//! credential store; logout is local-only and idempotent.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::{CalendarTokenRelay, ChatGateway, CredentialStore};
use cadence_domain::constants::{
    AUTH_LOGIN_PATH, AUTH_SIGNUP_PATH, CALENDAR_FETCH_TOKEN_PATH, CALENDAR_SAVE_TOKEN_PATH,
    CHAT_HISTORY_PATH, CHAT_PATH,
};
use cadence_domain::{
    AuthResponse, CadenceError, CalendarTokenResponse, LoginRequest, Message, Result,
    SaveCalendarTokenRequest, SendMessageRequest, SignupRequest,
};
use tracing::{debug, info, instrument};

use super::client::ApiClient;

/// HTTP gateway to the chat backend
pub struct BackendGateway {
    client: ApiClient,
    credentials: Arc<dyn CredentialStore>,
}

impl BackendGateway {
    /// Create a new backend gateway
    pub fn new(client: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { client, credentials }
    }

    /// Rejected credentials come back as 4xx from the auth endpoints; those
    /// surface as `Auth` so the caller can distinguish "wrong password" from
    /// a broken backend.
    fn map_auth_error(err: CadenceError) -> CadenceError {
        match err {
            CadenceError::Request { status, message } if (400..500).contains(&status) => {
                CadenceError::Auth(message)
            }
            other => other,
        }
    }
}

#[async_trait]
impl ChatGateway for BackendGateway {
    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let request =
            LoginRequest { username: username.to_string(), password: password.to_string() };

        let response: AuthResponse = self
            .client
            .post(AUTH_LOGIN_PATH, &request)
            .await
            .map_err(Self::map_auth_error)?;

        self.credentials.set_credential(&response.token).await?;
        info!(username = %response.user.username, "Login successful");

        Ok(response)
    }

    #[instrument(skip(self, password, email))]
    async fn signup(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<AuthResponse> {
        let request = SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.map(str::to_string),
        };

        let response: AuthResponse = self
            .client
            .post(AUTH_SIGNUP_PATH, &request)
            .await
            .map_err(Self::map_auth_error)?;

        self.credentials.set_credential(&response.token).await?;
        info!(username = %response.user.username, "Signup successful");

        Ok(response)
    }

    /// Local-only: no network round trip. Clearing an absent credential is
    /// not an error.
    async fn logout(&self) -> Result<()> {
        self.credentials.clear_credential().await?;
        info!("Logged out");
        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn send_message(&self, content: &str) -> Result<Message> {
        let request = SendMessageRequest { content: content.to_string() };
        let message: Message = self.client.post(CHAT_PATH, &request).await?;
        debug!(id = %message.id, role = %message.role, "Message delivered");
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn message_history(&self) -> Result<Vec<Message>> {
        let messages: Vec<Message> = self.client.get(CHAT_HISTORY_PATH).await?;
        debug!(count = messages.len(), "History fetched");
        Ok(messages)
    }
}

#[async_trait]
impl CalendarTokenRelay for BackendGateway {
    #[instrument(skip(self, token))]
    async fn save_calendar_token(&self, token: &str) -> Result<()> {
        let request = SaveCalendarTokenRequest { token: token.to_string() };
        let _: serde_json::Value = self.client.post(CALENDAR_SAVE_TOKEN_PATH, &request).await?;
        info!("Calendar token relayed to backend");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_calendar_token(&self) -> Result<Option<String>> {
        let response: CalendarTokenResponse = self.client.get(CALENDAR_FETCH_TOKEN_PATH).await?;
        Ok(response.token)
    }
}
