//! Key-value store trait.

use async_trait::async_trait;

use crate::error::StoreResult;

/// A string key-value store.
///
/// Implementations must be thread-safe and support concurrent access.
/// Absence of a key is never an error: lookups return `None` and
/// deletes of missing keys succeed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`.
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Checks whether `key` exists.
    async fn contains(&self, key: &str) -> StoreResult<bool>;

    /// Stores `value` only if `key` is absent, atomically.
    ///
    /// Returns `true` if the value was written, `false` if the key already existed.
    async fn insert_if_absent(&self, key: &str, value: &str) -> StoreResult<bool>;
}
