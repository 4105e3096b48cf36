//! Chat session service - core business logic

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cadence_common::validation::validate_message_content;
use cadence_domain::{CadenceError, ConnectionState, Message, Result};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::ports::{CalendarLink, ChatGateway, CredentialStore};

/// Outcome of session initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// No credential is present; the caller must run the auth flow first.
    /// The redirect decision belongs to the caller, not this service.
    MustAuthenticate,
    /// History is loaded and the connection state has been checked.
    Ready,
}

/// Chat session service
///
/// Owns the message history (append-only, oldest first), the send-in-flight
/// flag, and a cached read-only view of the calendar connection state.
pub struct ChatSessionService {
    gateway: Arc<dyn ChatGateway>,
    calendar: Arc<dyn CalendarLink>,
    credentials: Arc<dyn CredentialStore>,
    history: RwLock<Vec<Message>>,
    connection: RwLock<ConnectionState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of `send`.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatSessionService {
    /// Create a new chat session service
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        calendar: Arc<dyn CalendarLink>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            gateway,
            calendar,
            credentials,
            history: RwLock::new(Vec::new()),
            connection: RwLock::new(ConnectionState::Unknown),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Initialize the session
    ///
    /// Requires an active credential; without one no further work is
    /// performed. Otherwise the history load and the connection check run
    /// concurrently with no ordering dependency between them. The connection
    /// result is always recorded, even when the history load fails.
    ///
    /// # Errors
    /// Returns the history-load error; the connection check is best-effort
    /// and degrades to `Disconnected` inside the calendar link.
    pub async fn initialize(&self) -> Result<InitOutcome> {
        if !self.credentials.is_authenticated().await {
            info!("No session credential present, authentication required");
            return Ok(InitOutcome::MustAuthenticate);
        }

        let (history, state) =
            tokio::join!(self.gateway.message_history(), self.calendar.check_connection());

        *self.connection.write().await = state;
        debug!(state = %state, "Calendar connection state recorded");

        let messages = history?;
        info!(count = messages.len(), "Message history loaded");
        *self.history.write().await = messages;

        Ok(InitOutcome::Ready)
    }

    /// Send a message and append the backend's reply to the history
    ///
    /// Rejected locally (no network traffic) when the content is empty or
    /// whitespace-only, when a send is already in flight, or when the
    /// calendar connection is not `Connected`. A concurrent second send is
    /// rejected rather than queued.
    ///
    /// # Errors
    /// Local rejections surface as `CadenceError::Validation`; gateway
    /// failures propagate unchanged with the history untouched. The in-flight
    /// flag is cleared on every path.
    pub async fn send(&self, content: &str) -> Result<Message> {
        validate_message_content(content).map_err(CadenceError::Validation)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Rejected send: another send is in flight");
            return Err(CadenceError::Validation("a send is already in flight".to_string()));
        }
        let _guard = InFlightGuard(&self.in_flight);

        if !self.connection.read().await.is_connected() {
            warn!("Rejected send: calendar is not connected");
            return Err(CadenceError::Validation("calendar is not connected".to_string()));
        }

        let message = self.gateway.send_message(content).await?;

        self.history.write().await.push(message.clone());
        debug!(id = %message.id, "Message appended to history");

        Ok(message)
    }

    /// End the session
    ///
    /// Delegates to the gateway's local-only logout, then drops the session
    /// view: history is cleared and the cached connection state resets to
    /// `Unknown`. Success means the session has ended.
    pub async fn logout(&self) -> Result<()> {
        self.gateway.logout().await?;

        self.history.write().await.clear();
        *self.connection.write().await = ConnectionState::Unknown;

        info!("Chat session ended");
        Ok(())
    }

    /// Toggle the calendar connection
    ///
    /// `Connected` delegates to `disconnect`, anything else to `connect`.
    /// The cached connection view is refreshed from the calendar link
    /// afterwards, on success and failure alike.
    pub async fn toggle_calendar(&self) -> Result<ConnectionState> {
        let current = *self.connection.read().await;

        let result = if current.is_connected() {
            self.calendar.disconnect().await
        } else {
            self.calendar.connect().await
        };

        let state = self.calendar.state().await;
        *self.connection.write().await = state;

        result?;
        Ok(state)
    }

    /// Re-run the connection check and update the cached view
    pub async fn refresh_connection(&self) -> ConnectionState {
        let state = self.calendar.check_connection().await;
        *self.connection.write().await = state;
        state
    }

    /// Snapshot of the message history, oldest first
    pub async fn history(&self) -> Vec<Message> {
        self.history.read().await.clone()
    }

    /// Cached connection state
    pub async fn connection_state(&self) -> ConnectionState {
        *self.connection.read().await
    }

    /// Whether a send is currently outstanding
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}
