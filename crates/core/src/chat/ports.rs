//! Port interfaces for the chat session
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use cadence_domain::{AuthResponse, ConnectionState, Message, Result};

/// Trait for the authenticated chat backend
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Authenticate with username/password; the implementation stores the
    /// returned bearer token
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse>;

    /// Create an account; same token storage behaviour as `login`
    async fn signup(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<AuthResponse>;

    /// Clear the stored credential. Local-only and idempotent: logging out
    /// with no active credential is not an error.
    async fn logout(&self) -> Result<()>;

    /// Send one message and return the backend's reply
    async fn send_message(&self, content: &str) -> Result<Message>;

    /// Fetch the ordered message history (empty is not an error)
    async fn message_history(&self) -> Result<Vec<Message>>;
}

/// Trait for relaying the calendar access token through the backend
///
/// The backend persists the token so the calendar link survives across
/// sessions and devices.
#[async_trait]
pub trait CalendarTokenRelay: Send + Sync {
    /// Store an opaque calendar access token on behalf of the user
    async fn save_calendar_token(&self, token: &str) -> Result<()>;

    /// Retrieve the previously relayed token, if any
    async fn fetch_calendar_token(&self) -> Result<Option<String>>;
}

/// Trait for the external calendar link
#[async_trait]
pub trait CalendarLink: Send + Sync {
    /// Query whether a valid access grant currently exists.
    ///
    /// Best-effort: never errors. Failures during the check degrade to
    /// `ConnectionState::Disconnected`.
    async fn check_connection(&self) -> ConnectionState;

    /// Run the consent flow and relay the obtained token.
    ///
    /// Blocking from the caller's perspective until the user completes or
    /// cancels the external prompt. On failure the state remains
    /// `Disconnected`.
    async fn connect(&self) -> Result<()>;

    /// Revoke the held grant. No-op when no grant is held.
    async fn disconnect(&self) -> Result<()>;

    /// Current state without probing
    async fn state(&self) -> ConnectionState;
}

/// Trait for bearer credential presence and lifecycle
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a credential (memory + durable storage)
    async fn set_credential(&self, token: &str) -> Result<()>;

    /// Current credential, hydrating from durable storage at most once
    async fn credential(&self) -> Result<Option<String>>;

    /// Remove the credential everywhere (idempotent)
    async fn clear_credential(&self) -> Result<()>;

    /// Whether a credential is present
    async fn is_authenticated(&self) -> bool;
}
