//! Key-value store trait definition.
//!
//! The `KeyValueStore` trait is the only path to the application's persisted
//! state. Values are stored as raw strings holding JSON text; the JSON-level
//! helpers live on [`KeyValueStoreExt`] so every backend gets the same
//! fallback semantics.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Synchronous key-value storage over string keys and raw string values.
///
/// Implementations must ensure:
/// - `get_raw` never fails; an unreadable value is reported as absent
/// - a successful `set_raw` is visible to the next `get_raw` on the same key
pub trait KeyValueStore: Send + Sync {
    /// Get the raw stored text for `key`, or `None` when the key is absent.
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Store raw text under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Storage` if the value cannot be persisted.
    fn set_raw(&self, key: &str, raw: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_raw(&self, key: &str) -> Result<()>;

    /// All keys currently present, in ascending order.
    fn keys(&self) -> Vec<String>;
}

/// JSON-level operations available on every [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Load and decode the value under `key`.
    ///
    /// Returns `fallback` when the key is missing, holds an empty string,
    /// fails to decode, or holds the literal JSON `null`.
    fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.get_raw(key) else {
            return fallback;
        };
        if raw.is_empty() {
            return fallback;
        }
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Null) => fallback,
            Ok(value) => match serde_json::from_value(value) {
                Ok(decoded) => decoded,
                Err(err) => {
                    tracing::warn!(key, error = %err, "stored value has unexpected shape");
                    fallback
                }
            },
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid JSON");
                fallback
            }
        }
    }

    /// Encode `value` as JSON and store it. Failures are logged, not returned.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to encode value");
                return;
            }
        };
        if let Err(err) = self.set_raw(key, &encoded) {
            tracing::warn!(key, error = %err, "failed to save value");
        }
    }

    /// Remove `key`. Failures are logged, not returned.
    fn remove(&self, key: &str) {
        if let Err(err) = self.remove_raw(key) {
            tracing::warn!(key, error = %err, "failed to remove value");
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
