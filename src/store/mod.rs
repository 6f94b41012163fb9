//! Key-Value Store Module
//!
//! The asynchronous string-keyed storage contract the persistent cache tier is
//! built on, plus the backends shipped with the crate.
//!
//! Stores have no TTL or size limits of their own; expiry lives in the cache
//! envelopes written on top of them.

use async_trait::async_trait;

use crate::error::StorageResult;

mod file;
mod memory;

#[cfg(test)]
pub(crate) mod testing;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Key Value Store ==
/// Durable string-keyed store shared by every persistent cache instance.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the stored string, or `None` if the key is absent.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Lists every key currently stored.
    async fn get_all_keys(&self) -> StorageResult<Vec<String>>;

    /// Removes all `keys` in one call.
    async fn multi_remove(&self, keys: &[String]) -> StorageResult<()>;
}
