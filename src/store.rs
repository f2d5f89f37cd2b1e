//! Preference store over browser persistent storage.
//!
//! Reads and writes never fail toward the caller: storage can be disabled,
//! full, or blocked by privacy settings, and none of that should break the
//! page. Failures are logged and a read falls back to `None`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::error::EnhanceError;

/// Raw string storage, e.g. `localStorage`.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns [`EnhanceError::Storage`] when storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, EnhanceError>;
    /// # Errors
    ///
    /// Returns [`EnhanceError::Storage`] when storage cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), EnhanceError>;
}

pub struct PreferenceStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Read `key`, returning `None` when absent or when storage fails.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("preference read for {key:?} failed: {err}");
                None
            }
        }
    }

    /// Write `key`; a storage failure is logged and otherwise ignored.
    pub fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.set_item(key, value) {
            log::warn!("preference write for {key:?} failed: {err}");
        }
    }
}
