//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//!
//! ## Environment Variables
//! - `CADENCE_BACKEND_URL`: Base URL of the chat backend (required)
//! - `CADENCE_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `CADENCE_GOOGLE_CLIENT_ID`: OAuth client ID for the consent flow
//! - `CADENCE_GOOGLE_CLIENT_SECRET`: Optional OAuth client secret
//! - `CADENCE_READINESS_TIMEOUT_SECS`: Bounded wait for the consent surfaces
//! - `CADENCE_CONSENT_TIMEOUT_SECS`: Bounded wait for the consent prompt
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.toml` (current working directory)
//! 2. `./cadence.toml` (current working directory)
//! 3. `../config.toml` / `../cadence.toml` (parent directory)

use std::path::PathBuf;

use cadence_domain::{BackendConfig, CadenceError, CalendarConfig, Config, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CadenceError::Config` if configuration cannot be loaded from
/// either source
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `CADENCE_BACKEND_URL` is required; everything else falls back to its
/// default.
///
/// # Errors
/// Returns `CadenceError::Config` if the required variable is missing or a
/// numeric variable fails to parse
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("CADENCE_BACKEND_URL")?;
    let defaults = Config::default();

    let request_timeout_secs = env_u64(
        "CADENCE_REQUEST_TIMEOUT_SECS",
        defaults.backend.request_timeout_secs,
    )?;
    let readiness_timeout_secs = env_u64(
        "CADENCE_READINESS_TIMEOUT_SECS",
        defaults.calendar.readiness_timeout_secs,
    )?;
    let consent_timeout_secs =
        env_u64("CADENCE_CONSENT_TIMEOUT_SECS", defaults.calendar.consent_timeout_secs)?;

    Ok(Config {
        backend: BackendConfig { base_url, request_timeout_secs },
        calendar: CalendarConfig {
            client_id: std::env::var("CADENCE_GOOGLE_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("CADENCE_GOOGLE_CLIENT_SECRET").ok(),
            readiness_timeout_secs,
            consent_timeout_secs,
            ..defaults.calendar
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations for config files.
///
/// # Errors
/// Returns `CadenceError::Config` if no file is found or the file fails to
/// parse
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CadenceError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CadenceError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CadenceError::Config(format!("Failed to read config file: {}", e)))?;

    toml::from_str(&contents)
        .map_err(|e| CadenceError::Config(format!("Invalid config file: {}", e)))
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: &[&str] =
        &["config.toml", "cadence.toml", "../config.toml", "../cadence.toml"];

    CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| CadenceError::Config(format!("Missing environment variable: {}", name)))
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| CadenceError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
