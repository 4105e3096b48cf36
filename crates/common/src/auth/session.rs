//! Session store for the bearer credential
//!
//! Holds the single bearer credential that proves authentication:
//! - In-memory copy for fast access
//! - Durable copy in the platform keychain
//! - Lazy hydration from the keychain, at most once per process
//!
//! At most one credential is active per profile; absence of a credential
//! means the user is unauthenticated. No network side effects.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::security::{KeychainError, SecretStore};

/// Error type for session store operations
#[derive(Debug)]
pub enum SessionError {
    /// Durable storage (keychain) failed
    Keychain(KeychainError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keychain(e) => write!(f, "Keychain error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<KeychainError> for SessionError {
    fn from(err: KeychainError) -> Self {
        Self::Keychain(err)
    }
}

/// Bearer credential store with keychain persistence
///
/// Invariant: after `clear_credential`, `credential()` returns `None` until
/// the next `set_credential`.
pub struct SessionStore<K: SecretStore> {
    keychain: Arc<K>,
    account: String,
    current: RwLock<Option<String>>,
    hydrated: AtomicBool,
}

impl<K: SecretStore> SessionStore<K> {
    /// Create a new session store
    ///
    /// # Arguments
    /// * `keychain` - Durable secret storage
    /// * `account` - Keychain account name the credential is stored under
    pub fn new(keychain: Arc<K>, account: impl Into<String>) -> Self {
        Self {
            keychain,
            account: account.into(),
            current: RwLock::new(None),
            hydrated: AtomicBool::new(false),
        }
    }

    /// Store a credential in memory and in the keychain
    ///
    /// # Errors
    /// Returns `SessionError::Keychain` if the durable write fails; the
    /// in-memory copy is not updated in that case.
    pub async fn set_credential(&self, token: &str) -> Result<(), SessionError> {
        self.keychain.set_secret(&self.account, token)?;

        *self.current.write().await = Some(token.to_string());
        self.hydrated.store(true, Ordering::SeqCst);

        info!("Session credential stored");
        Ok(())
    }

    /// Get the current credential
    ///
    /// Returns the in-memory copy when present. On the first miss the
    /// keychain is consulted exactly once; a missing entry is remembered so
    /// later calls stay in memory. A keychain access failure propagates and
    /// does not consume the hydration attempt.
    pub async fn credential(&self) -> Result<Option<String>, SessionError> {
        {
            let current = self.current.read().await;
            if current.is_some() {
                return Ok(current.clone());
            }
        }

        if self.hydrated.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let mut current = self.current.write().await;
        // Re-check under the write lock: another caller may have hydrated or
        // logged in while we waited.
        if current.is_some() || self.hydrated.load(Ordering::SeqCst) {
            return Ok(current.clone());
        }

        match self.keychain.get_secret(&self.account) {
            Ok(token) => {
                debug!("Session credential hydrated from keychain");
                *current = Some(token.clone());
                self.hydrated.store(true, Ordering::SeqCst);
                Ok(Some(token))
            }
            Err(KeychainError::NotFound) => {
                self.hydrated.store(true, Ordering::SeqCst);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the credential from memory and the keychain
    ///
    /// Idempotent: clearing an absent credential is not an error.
    pub async fn clear_credential(&self) -> Result<(), SessionError> {
        self.keychain.delete_secret(&self.account)?;

        *self.current.write().await = None;
        self.hydrated.store(true, Ordering::SeqCst);

        info!("Session credential cleared");
        Ok(())
    }

    /// Whether a credential is currently present
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.credential().await, Ok(Some(_)))
    }
}
