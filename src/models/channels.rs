// src/models/channels.rs

//! Category to channel routing table.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Destination for a single category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelInfo {
    #[serde(default)]
    pub channel: String,
}

impl ChannelInfo {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

/// Persisted channel configuration.
///
/// Serialized as `{"tornado":{"channel":".."},"svrstorm":{..},"winter":{..},"sws":{..}}`.
/// Missing keys deserialize as unset channels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelConfig {
    #[serde(default)]
    pub tornado: ChannelInfo,

    #[serde(default)]
    pub svrstorm: ChannelInfo,

    #[serde(default)]
    pub winter: ChannelInfo,

    #[serde(default)]
    pub sws: ChannelInfo,
}

impl ChannelConfig {
    /// Build a configuration from one channel per category.
    pub fn new(
        tornado: impl Into<String>,
        svrstorm: impl Into<String>,
        winter: impl Into<String>,
        sws: impl Into<String>,
    ) -> Self {
        Self {
            tornado: ChannelInfo::new(tornado),
            svrstorm: ChannelInfo::new(svrstorm),
            winter: ChannelInfo::new(winter),
            sws: ChannelInfo::new(sws),
        }
    }

    /// Raw configured channel for a category (may be empty or decorated).
    pub fn channel(&self, category: Category) -> &str {
        match category {
            Category::Tornado => &self.tornado.channel,
            Category::SevereThunderstorm => &self.svrstorm.channel,
            Category::Winter => &self.winter.channel,
            Category::SpecialWeatherStatement => &self.sws.channel,
        }
    }

    /// Number of categories with a non-blank channel.
    pub fn configured_count(&self) -> usize {
        Category::ALL
            .iter()
            .filter(|c| !self.channel(**c).trim().is_empty())
            .count()
    }
}
