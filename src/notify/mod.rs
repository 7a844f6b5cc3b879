//! Outbound messaging.
//!
//! The relay only builds [`Embed`] payloads and hands them to a
//! [`MessageSender`]; the transport behind it is pluggable.

pub mod discord;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SendError;

pub use discord::DiscordClient;

/// Rich message payload.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// Capability to deliver an embed to a channel.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), SendError>;
}
