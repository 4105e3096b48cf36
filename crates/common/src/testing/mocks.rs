//! In-memory mock implementations
//!
//! Deterministic stand-ins for platform services so tests never touch the
//! real keychain.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::security::{KeychainError, SecretStore};

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// In-memory keychain mock
#[derive(Clone)]
pub struct MockKeychainProvider {
    storage: StorageData,
    #[allow(dead_code)]
    _service_name: String,
}

impl MockKeychainProvider {
    /// Create a new mock keychain provider with a service name for namespacing.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { storage: Arc::new(Mutex::new(HashMap::new())), _service_name: service_name.into() }
    }

    /// Store an arbitrary secret value in memory.
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.storage.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Retrieve a secret value or return `KeychainError::NotFound`.
    pub fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.storage.lock().unwrap().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    /// Delete a secret value (idempotent).
    pub fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.storage.lock().unwrap().remove(key);
        Ok(())
    }

    /// Determine whether a secret exists.
    #[must_use]
    pub fn secret_exists(&self, key: &str) -> bool {
        self.storage.lock().unwrap().contains_key(key)
    }
}

impl Default for MockKeychainProvider {
    fn default() -> Self {
        Self::new("cadence-test")
    }
}

impl SecretStore for MockKeychainProvider {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        MockKeychainProvider::set_secret(self, key, value)
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        MockKeychainProvider::get_secret(self, key)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        MockKeychainProvider::delete_secret(self, key)
    }

    fn secret_exists(&self, key: &str) -> bool {
        MockKeychainProvider::secret_exists(self, key)
    }
}
