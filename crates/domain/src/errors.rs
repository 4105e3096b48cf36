//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Cadence
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum CadenceError {
    /// Transport-level failure: DNS, connection refused, timeout. No response
    /// was received, so there is no status code to report.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success HTTP status. The message is
    /// taken from the response body when present, otherwise derived from the
    /// status code.
    #[error("Request failed with status {status}: {message}")]
    Request { status: u16, message: String },

    /// Credentials were rejected by the backend (login/signup).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// User input failed local validation and never reached the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The calendar consent surface did not become ready within the bounded
    /// wait.
    #[error("Calendar link not ready: {0}")]
    NotReady(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable credential storage (platform keychain) failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;
