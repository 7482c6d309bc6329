//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Trait for encrypting key-value storage backends
///
/// Implementations encrypt on [`set`](SecureStorage::set) and decrypt on
/// [`get`](SecureStorage::get); callers only ever see plaintext.
#[async_trait]
pub trait SecureStorage: Send + Sync {
    /// Store a value under the given key, overwriting any prior value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve and decrypt a value by key; `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove a value by key; no-op when absent
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Clear all stored data
    async fn clear(&self) -> Result<()>;
}
