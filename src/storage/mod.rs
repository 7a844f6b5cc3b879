//! Storage abstractions for relay state.
//!
//! Two small documents are persisted between cycles:
//!
//! ```text
//! {root}/
//! ├── channels.json         # Category -> channel routing (admin-written)
//! └── sent_alerts.json      # IDs already announced (cycle-written)
//! ```
//!
//! The cycle only talks to the traits below, so a backend can be swapped
//! (local files, memory, S3) without touching the pipeline.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::PersistError;
use crate::models::{ChannelConfig, SentAlertSet};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Storage keys, relative to the backend root.
pub mod keys {
    pub const SENT_ALERTS: &str = "sent_alerts.json";
    pub const CHANNELS: &str = "channels.json";
}

type PersistResult<T> = std::result::Result<T, PersistError>;

/// Persistence of the announced-alert set.
#[async_trait]
pub trait SentAlertStore: Send + Sync {
    /// Load the set. A missing document is an empty set, not an error.
    async fn load_sent(&self) -> PersistResult<SentAlertSet>;

    /// Replace the set. Readers never observe a partial write.
    async fn save_sent(&self, sent: &SentAlertSet) -> PersistResult<()>;
}

/// Persistence of the channel routing table.
#[async_trait]
pub trait ChannelConfigStore: Send + Sync {
    /// Load the routing table. A missing document means every channel is unset.
    async fn load_channels(&self) -> PersistResult<ChannelConfig>;

    /// Overwrite the routing table wholesale.
    async fn save_channels(&self, config: &ChannelConfig) -> PersistResult<()>;
}
