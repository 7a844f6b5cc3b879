//! In-process storage backend.
//!
//! Useful when the relay is embedded in another process, and in tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::PersistError;
use crate::models::{ChannelConfig, SentAlertSet};
use crate::storage::{ChannelConfigStore, PersistResult, SentAlertStore, keys};

/// Memory-backed storage. Clones of the inner values are handed out.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    sent: Mutex<SentAlertSet>,
    channels: Mutex<ChannelConfig>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channels(channels: ChannelConfig) -> Self {
        Self {
            sent: Mutex::default(),
            channels: Mutex::new(channels),
        }
    }

    /// Current sent set, for inspection.
    pub fn sent(&self) -> SentAlertSet {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SentAlertStore for MemoryStorage {
    async fn load_sent(&self) -> PersistResult<SentAlertSet> {
        self.sent
            .lock()
            .map(|s| s.clone())
            .map_err(|e| PersistError::read(keys::SENT_ALERTS, e))
    }

    async fn save_sent(&self, sent: &SentAlertSet) -> PersistResult<()> {
        let mut guard = self
            .sent
            .lock()
            .map_err(|e| PersistError::write(keys::SENT_ALERTS, e))?;
        *guard = sent.clone();
        Ok(())
    }
}

#[async_trait]
impl ChannelConfigStore for MemoryStorage {
    async fn load_channels(&self) -> PersistResult<ChannelConfig> {
        self.channels
            .lock()
            .map(|c| c.clone())
            .map_err(|e| PersistError::read(keys::CHANNELS, e))
    }

    async fn save_channels(&self, config: &ChannelConfig) -> PersistResult<()> {
        let mut guard = self
            .channels
            .lock()
            .map_err(|e| PersistError::write(keys::CHANNELS, e))?;
        *guard = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.load_sent().await.unwrap().is_empty());

        storage
            .save_sent(&SentAlertSet::from_ids(["X1"]))
            .await
            .unwrap();
        assert!(storage.sent().contains("X1"));

        storage
            .save_channels(&ChannelConfig::new("t", "s", "w", "x"))
            .await
            .unwrap();
        assert_eq!(storage.load_channels().await.unwrap().sws.channel, "x");
    }
}
