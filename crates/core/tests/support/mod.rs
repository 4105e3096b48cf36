//! Shared test helpers for `cadence-core` integration tests.
//!
//! Lightweight port stubs so the chat session tests can focus on behaviour
//! instead of boilerplate. All stubs are deterministic and in-memory.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cadence_core::{CalendarLink, ChatGateway, CredentialStore};
use cadence_domain::{
    AuthResponse, CadenceError, ChatRole, ConnectionState, Message, Result, User,
};
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

/// Build a message with a fixed, parseable timestamp.
pub fn message(id: &str, content: &str, role: ChatRole, timestamp: &str) -> Message {
    let timestamp: DateTime<Utc> = timestamp.parse().expect("valid RFC 3339 timestamp");
    Message { id: id.to_string(), content: content.to_string(), role, timestamp }
}

/// In-memory credential stub.
#[derive(Default)]
pub struct StubCredentials {
    token: Mutex<Option<String>>,
}

impl StubCredentials {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self { token: Mutex::new(Some(token.to_string())) })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl CredentialStore for StubCredentials {
    async fn set_credential(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn credential(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    async fn clear_credential(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }
}

/// Scriptable gateway stub.
///
/// `send_message` pops queued responses in order. When a gate semaphore is
/// installed, each send waits for a permit first, which lets tests hold a
/// send in flight.
pub struct StubGateway {
    credentials: Arc<StubCredentials>,
    history_response: Mutex<Result<Vec<Message>>>,
    send_responses: Mutex<VecDeque<Result<Message>>>,
    gate: Option<Arc<Semaphore>>,
    pub send_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl StubGateway {
    pub fn new(credentials: Arc<StubCredentials>) -> Self {
        Self {
            credentials,
            history_response: Mutex::new(Ok(Vec::new())),
            send_responses: Mutex::new(VecDeque::new()),
            gate: None,
            send_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_history(self, history: Result<Vec<Message>>) -> Self {
        *self.history_response.lock().unwrap() = history;
        self
    }

    pub fn queue_send(&self, response: Result<Message>) {
        self.send_responses.lock().unwrap().push_back(response);
    }

    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl ChatGateway for StubGateway {
    async fn login(&self, username: &str, _password: &str) -> Result<AuthResponse> {
        let response = AuthResponse {
            user: User { id: "u1".to_string(), username: username.to_string(), email: None },
            token: "stub-token".to_string(),
        };
        self.credentials.set_credential(&response.token).await?;
        Ok(response)
    }

    async fn signup(
        &self,
        username: &str,
        password: &str,
        _email: Option<&str>,
    ) -> Result<AuthResponse> {
        self.login(username, password).await
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.credentials.clear_credential().await
    }

    async fn send_message(&self, _content: &str) -> Result<Message> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate semaphore closed");
            permit.forget();
        }

        self.send_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CadenceError::Internal("no queued send response".to_string())))
    }

    async fn message_history(&self) -> Result<Vec<Message>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.history_response.lock().unwrap().clone()
    }
}

/// Calendar link stub with scripted check results.
pub struct StubCalendar {
    check_result: Mutex<ConnectionState>,
    state: Mutex<ConnectionState>,
    connect_result: Mutex<Result<()>>,
    pub connect_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
}

impl StubCalendar {
    pub fn new(check_result: ConnectionState) -> Self {
        Self {
            check_result: Mutex::new(check_result),
            state: Mutex::new(check_result),
            connect_result: Mutex::new(Ok(())),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_connect_result(self, result: Result<()>) -> Self {
        *self.connect_result.lock().unwrap() = result;
        self
    }
}

#[async_trait]
impl CalendarLink for StubCalendar {
    async fn check_connection(&self) -> ConnectionState {
        let state = *self.check_result.lock().unwrap();
        *self.state.lock().unwrap() = state;
        state
    }

    async fn connect(&self) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.connect_result.lock().unwrap().clone();
        if result.is_ok() {
            *self.check_result.lock().unwrap() = ConnectionState::Connected;
            *self.state.lock().unwrap() = ConnectionState::Connected;
        }
        result
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        *self.check_result.lock().unwrap() = ConnectionState::Disconnected;
        *self.state.lock().unwrap() = ConnectionState::Disconnected;
        Ok(())
    }

    async fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }
}
