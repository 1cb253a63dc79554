//! Durable key/value storage for store state.
//!
//! Stores persist their state as a JSON [`Persisted`] envelope under a fixed
//! key. The envelope carries an explicit schema version: on load, a missing
//! key, unparsable JSON, or a version other than the store's current one all
//! yield the default (empty) state. Old data is discarded, never migrated.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, lost on exit
//! - [`FileStorage`] - one `<key>.json` file per key in a data directory

mod file;
mod memory;

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Keys left behind by the earlier key-suffix versioning scheme.
pub const LEGACY_KEYS: &[&str] = &[
    "wishlist-storage-v1",
    "wishlist-storage-v2",
    "recently-viewed-products-v1",
    "recently-viewed-products-v2",
];

/// Synchronous string key/value storage.
///
/// Mirrors the browser `localStorage` contract: values are opaque strings,
/// writes are immediate, and there is no transaction across keys.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be listed.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// On-disk envelope wrapping a store's state with its schema version.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persisted<T> {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub state: T,
}

/// A typed, versioned view of one storage key.
pub(crate) struct Slot<T> {
    storage: Arc<dyn Storage>,
    key: &'static str,
    version: u32,
    _state: PhantomData<fn() -> T>,
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub(crate) fn new(storage: Arc<dyn Storage>, key: &'static str, version: u32) -> Self {
        Self {
            storage,
            key,
            version,
            _state: PhantomData,
        }
    }

    pub(crate) const fn key(&self) -> &'static str {
        self.key
    }

    /// Load the state, falling back to the default for anything unusable.
    pub(crate) fn load(&self) -> T {
        self.try_load().unwrap_or_default()
    }

    /// Load the state, or `None` if it is missing or was discarded.
    pub(crate) fn try_load(&self) -> Option<T> {
        let raw = match self.storage.get(self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Failed to read persisted state");
                return None;
            }
        };

        let envelope: Persisted<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Discarding unreadable persisted state");
                return None;
            }
        };

        if envelope.version != self.version {
            tracing::warn!(
                key = self.key,
                found = envelope.version,
                expected = self.version,
                "Discarding persisted state with mismatched schema version"
            );
            return None;
        }

        match serde_json::from_value(envelope.state) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Discarding malformed persisted state");
                None
            }
        }
    }

    /// Write the state.
    pub(crate) fn save(&self, state: &T) -> Result<(), StorageError> {
        let envelope = Persisted {
            version: self.version,
            saved_at: Some(Utc::now()),
            state,
        };
        let json = serde_json::to_string(&envelope)?;
        self.storage.set(self.key, &json)
    }

    /// Write the state, logging a failure before handing it back.
    pub(crate) fn save_or_warn(&self, state: &T) -> Result<(), StorageError> {
        self.save(state).inspect_err(|e| {
            tracing::warn!(key = self.key, error = %e, "Failed to persist state");
        })
    }
}

/// Remove keys orphaned by the old key-suffix versioning scheme.
///
/// Returns the keys that were actually present and removed.
///
/// # Errors
///
/// Returns `StorageError` if a key cannot be removed.
pub fn purge_legacy_keys(storage: &dyn Storage) -> Result<Vec<String>, StorageError> {
    let mut removed = Vec::new();
    for key in LEGACY_KEYS {
        if storage.remove(key)? {
            tracing::info!(key, "Removed legacy storage key");
            removed.push((*key).to_owned());
        }
    }
    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    fn slot(storage: &Arc<MemoryStorage>) -> Slot<Counter> {
        Slot::new(storage.clone(), "counter", 2)
    }

    #[test]
    fn test_load_missing_key_is_default() {
        let storage = Arc::new(MemoryStorage::new());
        assert_eq!(slot(&storage).load(), Counter::default());
    }

    #[test]
    fn test_save_then_load() {
        let storage = Arc::new(MemoryStorage::new());
        slot(&storage).save(&Counter { count: 3 }).unwrap();
        assert_eq!(slot(&storage).load(), Counter { count: 3 });

        let raw = storage.get("counter").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["state"]["count"], 3);
        assert!(value.get("savedAt").is_some());
    }

    #[test]
    fn test_try_load_distinguishes_missing_from_present() {
        let storage = Arc::new(MemoryStorage::new());
        assert!(slot(&storage).try_load().is_none());
        slot(&storage).save(&Counter::default()).unwrap();
        assert_eq!(slot(&storage).try_load(), Some(Counter::default()));
    }

    #[test]
    fn test_version_mismatch_discards_state() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set("counter", r#"{"version":1,"state":{"count":9}}"#)
            .unwrap();
        assert_eq!(slot(&storage).load(), Counter::default());
    }

    #[test]
    fn test_garbage_discards_state() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("counter", "not json").unwrap();
        assert_eq!(slot(&storage).load(), Counter::default());

        storage
            .set("counter", r#"{"version":2,"state":{"count":"nine"}}"#)
            .unwrap();
        assert_eq!(slot(&storage).load(), Counter::default());
    }

    #[test]
    fn test_purge_legacy_keys() {
        let storage = MemoryStorage::new();
        storage.set("wishlist-storage-v2", "{}").unwrap();
        storage.set("recently-viewed-products-v1", "{}").unwrap();
        storage.set("wishlist-storage", "{}").unwrap();

        let mut removed = purge_legacy_keys(&storage).unwrap();
        removed.sort();
        assert_eq!(
            removed,
            vec!["recently-viewed-products-v1", "wishlist-storage-v2"]
        );
        assert_eq!(storage.keys().unwrap(), vec!["wishlist-storage"]);
    }
}
