//! Calendar link types

use serde::{Deserialize, Serialize};

/// Status of the external calendar link.
///
/// Owned by the calendar link adapter; the chat session only ever reads it.
/// `Unknown` means no check has completed yet, `Checking` that one is in
/// progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Unknown,
    Checking,
    Connected,
    Disconnected,
}

impl ConnectionState {
    /// Whether message sending is currently allowed.
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Checking => write!(f, "checking"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Request body for relaying a calendar access token to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCalendarTokenRequest {
    pub token: String,
}

/// Response body for fetching the relayed calendar token back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarTokenResponse {
    pub token: Option<String>,
}
