// src/pipeline/configure.rs

//! Administrative channel configuration.

use crate::error::Result;
use crate::models::{Category, ChannelConfig};
use crate::storage::ChannelConfigStore;

/// Replace the routing table with one channel per category.
///
/// The stored table is overwritten, not merged: a blank value unsets that
/// category.
pub async fn run_configure(
    store: &dyn ChannelConfigStore,
    tornado: &str,
    svrstorm: &str,
    winter: &str,
    sws: &str,
) -> Result<ChannelConfig> {
    let config = ChannelConfig::new(tornado.trim(), svrstorm.trim(), winter.trim(), sws.trim());
    store.save_channels(&config).await?;

    for category in Category::ALL {
        let channel = config.channel(category);
        if channel.is_empty() {
            log::info!("{} channel: (unset)", category);
        } else {
            log::info!("{} channel: {}", category, channel);
        }
    }

    Ok(config)
}
