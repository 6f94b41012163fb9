//! File-backed key-value store.
//!
//! The whole map lives in memory and is rewritten to a single JSON object file
//! after every mutation. Writes go to a sibling temp file that is then renamed
//! over the target, so a crash mid-write leaves the previous snapshot intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::KeyValueStore;
use crate::error::StorageResult;

/// Durable key-value store persisted as one JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading any existing snapshot.
    ///
    /// A missing file is an empty store. Parent directories are created.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let items = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), items = items.len(), "Opened file store");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, items: &HashMap<String, String>) -> StorageResult<()> {
        let bytes = serde_json::to_vec(items)?;
        let tmp = self.path.with_extension("tmp");

        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Persisted file store");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> StorageResult<()> {
        let mut items = self.items.lock().await;
        let previous = items.insert(key.to_string(), value);
        if let Err(e) = self.persist(&items).await {
            match previous {
                Some(old) => items.insert(key.to_string(), old),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self.items.lock().await;
        if let Some(old) = items.remove(key) {
            if let Err(e) = self.persist(&items).await {
                items.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }

    async fn get_all_keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items.lock().await.keys().cloned().collect())
    }

    async fn multi_remove(&self, keys: &[String]) -> StorageResult<()> {
        let mut items = self.items.lock().await;
        let removed: Vec<(String, String)> = keys
            .iter()
            .filter_map(|key| items.remove_entry(key))
            .collect();
        if removed.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.persist(&items).await {
            items.extend(removed);
            return Err(e);
        }
        Ok(())
    }
}
