//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Backend endpoint paths
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_SIGNUP_PATH: &str = "/auth/signup";
pub const CHAT_PATH: &str = "/chat";
pub const CHAT_HISTORY_PATH: &str = "/chat/history";
pub const CALENDAR_SAVE_TOKEN_PATH: &str = "/google/save-token";
pub const CALENDAR_FETCH_TOKEN_PATH: &str = "/google/get-token";

// Keychain naming
pub const SESSION_KEYCHAIN_SERVICE: &str = "Cadence.session";
pub const SESSION_KEYCHAIN_ACCOUNT: &str = "token";
pub const CALENDAR_KEYCHAIN_SERVICE: &str = "Cadence.calendar";

// Default timeouts (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONSENT_TIMEOUT_SECS: u64 = 300;

// Google OAuth surfaces consumed by the consent client
pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_REVOKE_ENDPOINT: &str = "https://oauth2.googleapis.com/revoke";
pub const GOOGLE_TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const GOOGLE_CALENDAR_DISCOVERY_DOC: &str =
    "https://www.googleapis.com/discovery/v1/apis/calendar/v3/rest";
pub const GOOGLE_CALENDAR_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/calendar.readonly";
