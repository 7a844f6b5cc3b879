//! Local filesystem storage implementation.
//!
//! Documents are JSON files under a root directory. Writes go to a temporary
//! sibling first and are then renamed over the target, so a concurrent reader
//! sees either the old or the new document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::PersistError;
use crate::models::{ChannelConfig, SentAlertSet};
use crate::storage::{ChannelConfigStore, PersistResult, SentAlertStore, keys};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PersistResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| PersistError::write(key, e))?;
        self.write_bytes(key, &bytes)
            .await
            .map_err(|e| PersistError::write(key, e))
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> PersistResult<Option<T>> {
        let bytes = self
            .read_bytes(key)
            .await
            .map_err(|e| PersistError::read(key, e))?;

        match bytes {
            // An empty file is what a fresh install leaves behind
            Some(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| PersistError::read(key, e)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SentAlertStore for LocalStorage {
    async fn load_sent(&self) -> PersistResult<SentAlertSet> {
        match self.read_json(keys::SENT_ALERTS).await? {
            Some(sent) => Ok(sent),
            None => {
                log::debug!("No {} found, starting empty", keys::SENT_ALERTS);
                Ok(SentAlertSet::new())
            }
        }
    }

    async fn save_sent(&self, sent: &SentAlertSet) -> PersistResult<()> {
        self.write_json(keys::SENT_ALERTS, sent).await?;
        log::debug!("Saved {} sent alert IDs", sent.len());
        Ok(())
    }
}

#[async_trait]
impl ChannelConfigStore for LocalStorage {
    async fn load_channels(&self) -> PersistResult<ChannelConfig> {
        match self.read_json(keys::CHANNELS).await? {
            Some(config) => Ok(config),
            None => {
                log::warn!("No {} found, all channels unset", keys::CHANNELS);
                Ok(ChannelConfig::default())
            }
        }
    }

    async fn save_channels(&self, config: &ChannelConfig) -> PersistResult<()> {
        self.write_json(keys::CHANNELS, config).await
    }
}
