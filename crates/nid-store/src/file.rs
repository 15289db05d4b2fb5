//! File-backed key-value store.
//!
//! The whole key space is kept in memory and written back to a JSON object
//! on every mutation. Writes go to a uniquely named sibling temp file which
//! is then renamed over the target, so a crash never leaves a half-written
//! store behind. A mutation becomes visible only once it is on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::provider::KeyValueStore;

/// Key-value store persisted as a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, creating an empty one if the file is missing.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of every entry.
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.read().await.clone()
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
        let tmp = PathBuf::from(tmp);

        let content = serde_json::to_vec_pretty(entries)?;
        let written = match tokio::fs::write(&tmp, content).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "temp file not removed");
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies `mutate` to a copy of the entries, persists the copy and only
    /// then makes it current.
    async fn commit<F>(&self, mutate: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool + Send,
    {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        if !mutate(&mut next) {
            return Ok(false);
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.commit(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
        .await
        .map(|_| ())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.commit(|entries| entries.remove(key).is_some())
            .await
            .map(|_| ())
    }

    async fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        self.commit(|entries| {
            if entries.contains_key(key) {
                return false;
            }
            entries.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }
}
