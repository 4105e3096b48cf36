//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use cadence_common::security::KeychainProvider;
use cadence_core::ChatSessionService;
use cadence_domain::constants::SESSION_KEYCHAIN_SERVICE;
use cadence_domain::{Config, Result};
use cadence_infra::{
    ApiClient, ApiClientConfig, BackendGateway, CalendarLinkAdapter, GoogleConsentClient,
    GoogleConsentSettings, KeychainSessionStore,
};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub credentials: Arc<KeychainSessionStore<KeychainProvider>>,
    pub gateway: Arc<BackendGateway>,
    pub chat: Arc<ChatSessionService>,
}

impl AppContext {
    /// Wire the full dependency graph from configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client or consent client cannot be built
    pub fn new(config: Config) -> Result<Self> {
        let keychain = Arc::new(KeychainProvider::new(SESSION_KEYCHAIN_SERVICE));
        let credentials = Arc::new(KeychainSessionStore::new(keychain));

        let api_config = ApiClientConfig {
            base_url: config.backend.base_url.clone(),
            timeout: Duration::from_secs(config.backend.request_timeout_secs),
        };
        let client = ApiClient::new(api_config, credentials.clone())?;
        let gateway = Arc::new(BackendGateway::new(client, credentials.clone()));

        let consent = Arc::new(GoogleConsentClient::new(GoogleConsentSettings::new(
            &config.calendar,
        ))?);
        let calendar = Arc::new(CalendarLinkAdapter::new(
            consent,
            gateway.clone(),
            Duration::from_secs(config.calendar.readiness_timeout_secs),
        ));

        let chat = Arc::new(ChatSessionService::new(
            gateway.clone(),
            calendar,
            credentials.clone(),
        ));

        Ok(Self { config, credentials, gateway, chat })
    }
}
