//! Secret storage trait
//!
//! Allows the session store to run against the real platform keychain or the
//! in-memory mock in tests.

use super::keychain::{KeychainError, KeychainProvider};

/// Trait for durable secret storage
pub trait SecretStore: Send + Sync {
    /// Persist a secret value under the given key
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// Retrieve a secret value, `KeychainError::NotFound` when absent
    fn get_secret(&self, key: &str) -> Result<String, KeychainError>;

    /// Delete a secret value (idempotent)
    fn delete_secret(&self, key: &str) -> Result<(), KeychainError>;

    /// Determine whether a secret exists
    fn secret_exists(&self, key: &str) -> bool;
}

impl SecretStore for KeychainProvider {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        KeychainProvider::set_secret(self, key, value)
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        KeychainProvider::get_secret(self, key)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        KeychainProvider::delete_secret(self, key)
    }

    fn secret_exists(&self, key: &str) -> bool {
        KeychainProvider::secret_exists(self, key)
    }
}
