//! Durable storage for the remembered identity key.

use crate::errors::AppResult;
use std::sync::Mutex;

/// Fixed name under which the identity key is persisted.
pub const IDENTITY_KEY: &str = "password";

/// One optional string value that outlives the process.
pub trait IdentityStorage: Send + Sync {
    fn load(&self) -> AppResult<Option<String>>;
    fn save(&self, key: &str) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// Process-local storage, for tests and one-shot sessions.
#[derive(Default)]
pub struct MemoryIdentityStorage {
    value: Mutex<Option<String>>,
}

impl MemoryIdentityStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str) -> Self {
        Self {
            value: Mutex::new(Some(key.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IdentityStorage for MemoryIdentityStorage {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, key: &str) -> AppResult<()> {
        *self.slot() = Some(key.to_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
