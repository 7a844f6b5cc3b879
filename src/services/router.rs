// src/services/router.rs

//! Category to channel resolution.

use crate::models::{Category, ChannelConfig};

/// Resolves categories against one cycle's snapshot of the routing table.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    config: ChannelConfig,
}

impl ChannelRouter {
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }

    /// Channel ID for a category, or `None` if it is not configured.
    pub fn resolve(&self, category: Category) -> Option<String> {
        normalize_channel_id(self.config.channel(category))
    }
}

/// Strip surrounding whitespace and `<`/`>` left over from pasted mentions.
///
/// Returns `None` when nothing is left.
pub fn normalize_channel_id(raw: &str) -> Option<String> {
    let id = raw.trim().trim_matches(|c| c == '<' || c == '>').trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
