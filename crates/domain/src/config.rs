//! Application configuration structures
//!
//! Plain serde types. Loading (environment variables, file probing) lives in
//! the infra crate.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONSENT_TIMEOUT_SECS, DEFAULT_READINESS_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    GOOGLE_CALENDAR_READONLY_SCOPE,
};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub calendar: CalendarConfig,
}

/// Backend gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chat backend (e.g., "http://127.0.0.1:8000")
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Calendar consent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// OAuth client ID for the Google consent flow
    #[serde(default)]
    pub client_id: String,
    /// Optional OAuth client secret (not required for PKCE-only clients)
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Scopes requested during consent
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Bounded wait for the consent surfaces to become ready, in seconds
    #[serde(default = "default_readiness_timeout")]
    pub readiness_timeout_secs: u64,
    /// Bounded wait for the user to complete the consent prompt, in seconds
    #[serde(default = "default_consent_timeout")]
    pub consent_timeout_secs: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            scopes: default_scopes(),
            readiness_timeout_secs: DEFAULT_READINESS_TIMEOUT_SECS,
            consent_timeout_secs: DEFAULT_CONSENT_TIMEOUT_SECS,
        }
    }
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_readiness_timeout() -> u64 {
    DEFAULT_READINESS_TIMEOUT_SECS
}

fn default_consent_timeout() -> u64 {
    DEFAULT_CONSENT_TIMEOUT_SECS
}

fn default_scopes() -> Vec<String> {
    vec![GOOGLE_CALENDAR_READONLY_SCOPE.to_string()]
}
