//! Instrumented stores for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{KeyValueStore, MemoryStore};
use crate::error::{StorageError, StorageResult};

/// Memory store that counts reads and writes.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> StorageResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).await
    }

    async fn get_all_keys(&self) -> StorageResult<Vec<String>> {
        self.inner.get_all_keys().await
    }

    async fn multi_remove(&self, keys: &[String]) -> StorageResult<()> {
        self.inner.multi_remove(keys).await
    }
}

/// Store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStore;

fn unavailable<T>() -> StorageResult<T> {
    Err(StorageError::Backend("store unavailable".to_string()))
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        unavailable()
    }

    async fn set_item(&self, _key: &str, _value: String) -> StorageResult<()> {
        unavailable()
    }

    async fn remove_item(&self, _key: &str) -> StorageResult<()> {
        unavailable()
    }

    async fn get_all_keys(&self) -> StorageResult<Vec<String>> {
        unavailable()
    }

    async fn multi_remove(&self, _keys: &[String]) -> StorageResult<()> {
        unavailable()
    }
}
