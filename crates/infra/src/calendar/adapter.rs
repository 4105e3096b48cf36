//! Calendar link adapter
//!
//! Owns the connection state machine (`Unknown → Checking → {Connected,
//! Disconnected}`) and the SDK readiness gate. The two consent surfaces must
//! both initialize before any operation is valid; callers never observe that
//! sequencing — they see a single bounded wait that either succeeds or fails
//! with `CadenceError::NotReady`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::{CalendarLink, CalendarTokenRelay};
use cadence_domain::{CadenceError, ConnectionState, Result};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

use super::sdk::ConsentSdk;

/// Adapter between the chat session and the external consent SDK
pub struct CalendarLinkAdapter {
    sdk: Arc<dyn ConsentSdk>,
    relay: Arc<dyn CalendarTokenRelay>,
    readiness: OnceCell<()>,
    readiness_timeout: Duration,
    state: RwLock<ConnectionState>,
}

impl CalendarLinkAdapter {
    /// Create a new adapter
    ///
    /// # Arguments
    /// * `sdk` - External consent SDK surface
    /// * `relay` - Backend relay used to persist the calendar token
    /// * `readiness_timeout` - Bounded wait for both SDK surfaces to
    ///   initialize
    pub fn new(
        sdk: Arc<dyn ConsentSdk>,
        relay: Arc<dyn CalendarTokenRelay>,
        readiness_timeout: Duration,
    ) -> Self {
        Self {
            sdk,
            relay,
            readiness: OnceCell::new(),
            readiness_timeout,
            state: RwLock::new(ConnectionState::Unknown),
        }
    }

    /// Wait for both consent surfaces, resolving the readiness gate at most
    /// once. A failed attempt leaves the gate unresolved so a later call can
    /// retry.
    async fn ensure_ready(&self) -> Result<()> {
        let init = self.readiness.get_or_try_init(|| async {
            let (api, token) =
                tokio::join!(self.sdk.init_api_surface(), self.sdk.init_token_surface());
            api?;
            token?;
            debug!("Consent surfaces ready");
            Ok::<(), CadenceError>(())
        });

        match tokio::time::timeout(self.readiness_timeout, init).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(CadenceError::NotReady(e.to_string())),
            Err(_) => Err(CadenceError::NotReady(format!(
                "consent surfaces not ready within {:?}",
                self.readiness_timeout
            ))),
        }
    }

    /// The grant to probe: the locally held one, else the copy relayed to
    /// the backend (adopted locally when found).
    async fn current_grant(&self) -> Result<Option<String>> {
        if let Some(token) = self.sdk.cached_token().await {
            return Ok(Some(token));
        }

        let relayed = self.relay.fetch_calendar_token().await?;
        if let Some(token) = &relayed {
            debug!("Adopted calendar grant relayed from backend");
            self.sdk.set_cached_token(Some(token.clone())).await;
        }

        Ok(relayed)
    }

    async fn probe(&self) -> Result<ConnectionState> {
        self.ensure_ready().await?;

        let Some(token) = self.current_grant().await? else {
            return Ok(ConnectionState::Disconnected);
        };

        if self.sdk.probe_token(&token).await? {
            Ok(ConnectionState::Connected)
        } else {
            Ok(ConnectionState::Disconnected)
        }
    }

    async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl CalendarLink for CalendarLinkAdapter {
    /// Best-effort check: readiness failures, probe failures, and missing
    /// grants all degrade to `Disconnected`. Never errors.
    async fn check_connection(&self) -> ConnectionState {
        self.set_state(ConnectionState::Checking).await;

        let state = match self.probe().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Connection check failed; treating calendar as disconnected");
                ConnectionState::Disconnected
            }
        };

        self.set_state(state).await;
        state
    }

    async fn connect(&self) -> Result<()> {
        if let Err(e) = self.ensure_ready().await {
            self.set_state(ConnectionState::Disconnected).await;
            return Err(e);
        }

        let token = match self.sdk.request_access_token().await {
            Ok(token) => token,
            Err(e) => {
                // Cancellation or SDK failure: the link stays down.
                self.set_state(ConnectionState::Disconnected).await;
                return Err(e);
            }
        };

        if let Err(e) = self.relay.save_calendar_token(&token).await {
            self.set_state(ConnectionState::Disconnected).await;
            return Err(e);
        }

        self.set_state(ConnectionState::Connected).await;
        info!("Calendar connected");
        Ok(())
    }

    /// Fail-soft: revocation failures are logged, the local grant is dropped
    /// regardless, and a missing grant is a no-op.
    async fn disconnect(&self) -> Result<()> {
        let Some(token) = self.sdk.cached_token().await else {
            self.set_state(ConnectionState::Disconnected).await;
            return Ok(());
        };

        if let Err(e) = self.sdk.revoke(&token).await {
            warn!(error = %e, "Revocation failed; clearing the local grant anyway");
        }

        self.sdk.set_cached_token(None).await;
        self.set_state(ConnectionState::Disconnected).await;
        info!("Calendar disconnected");
        Ok(())
    }

    async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }
}
