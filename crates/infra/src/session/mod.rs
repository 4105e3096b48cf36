//! Keychain-backed credential store
//!
//! Implements the core `CredentialStore` port over the common session store,
//! mapping module-local storage errors into the domain error type.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_common::auth::{SessionError, SessionStore};
use cadence_common::security::SecretStore;
use cadence_core::CredentialStore;
use cadence_domain::constants::SESSION_KEYCHAIN_ACCOUNT;
use cadence_domain::{CadenceError, Result};

/// Credential store persisting to the platform keychain
pub struct KeychainSessionStore<K: SecretStore + 'static> {
    inner: SessionStore<K>,
}

impl<K: SecretStore + 'static> KeychainSessionStore<K> {
    /// Create a new store over the given secret storage
    pub fn new(keychain: Arc<K>) -> Self {
        Self { inner: SessionStore::new(keychain, SESSION_KEYCHAIN_ACCOUNT) }
    }
}

fn map_session_error(err: SessionError) -> CadenceError {
    CadenceError::Storage(err.to_string())
}

#[async_trait]
impl<K: SecretStore + 'static> CredentialStore for KeychainSessionStore<K> {
    async fn set_credential(&self, token: &str) -> Result<()> {
        self.inner.set_credential(token).await.map_err(map_session_error)
    }

    async fn credential(&self) -> Result<Option<String>> {
        self.inner.credential().await.map_err(map_session_error)
    }

    async fn clear_credential(&self) -> Result<()> {
        self.inner.clear_credential().await.map_err(map_session_error)
    }

    async fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated().await
    }
}
