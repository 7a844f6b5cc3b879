//! Discord REST message sender.
//!
//! Posts embeds as the bot user through
//! `POST {api_base}/channels/{channel_id}/messages`.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use url::Url;

use crate::error::{Result, SendError};
use crate::models::DiscordConfig;
use crate::notify::{Embed, MessageSender};
use crate::utils::http;

/// Timeout for a single message post.
const SEND_TIMEOUT_SECS: u64 = 15;

/// Discord bot client.
pub struct DiscordClient {
    client: reqwest::Client,
    api_base: Url,
    token: String,
}

impl DiscordClient {
    /// Build a client from settings, reading the token from the environment.
    pub fn from_config(config: &DiscordConfig) -> Result<Self> {
        Self::new(&config.api_base, config.token()?)
    }

    pub fn new(api_base: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::create_notify_client(SEND_TIMEOUT_SECS)?,
            api_base: Url::parse(api_base)?,
            token: token.into(),
        })
    }

    fn messages_url(&self, channel_id: &str) -> std::result::Result<Url, SendError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SendError::Other(format!("invalid API base {}", self.api_base)))?
            .pop_if_empty()
            .extend(["channels", channel_id, "messages"]);
        Ok(url)
    }
}

#[async_trait]
impl MessageSender for DiscordClient {
    async fn send_embed(
        &self,
        channel_id: &str,
        embed: &Embed,
    ) -> std::result::Result<(), SendError> {
        let url = self.messages_url(channel_id)?;
        let payload = MessagePayload {
            embeds: std::slice::from_ref(embed),
        };

        log::debug!("Posting embed '{}' to channel {}", embed.title, channel_id);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status.as_u16() == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<f64>().ok())
                .map(|v| v.ceil() as u64)
                .unwrap_or(5);

            log::warn!(
                "Rate limited by Discord on channel {} (retry after {}s)",
                channel_id,
                retry_after_secs
            );
            return Err(SendError::RateLimited { retry_after_secs });
        }

        let body = response.text().await.unwrap_or_default();
        Err(SendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    embeds: &'a [Embed],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::EmbedField;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_embed() -> Embed {
        Embed {
            title: "Tornado Warning - Extreme".to_string(),
            description: "Take cover".to_string(),
            color: 0xFF0000,
            fields: vec![EmbedField::block("Area", "Polk, IA")],
        }
    }

    #[test]
    fn test_messages_url() {
        let client = DiscordClient::new("https://discord.com/api/v10/", "t").unwrap();
        assert_eq!(
            client.messages_url("123").unwrap().as_str(),
            "https://discord.com/api/v10/channels/123/messages"
        );

        // A stray mention prefix must not turn into a URL fragment
        let url = client.messages_url("#123").unwrap();
        assert_eq!(url.fragment(), None);
        assert!(url.path().contains("%23123"));
    }

    #[tokio::test]
    async fn test_send_embed_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v10/channels/123/messages"))
            .and(header("authorization", "Bot secret"))
            .and(body_partial_json(serde_json::json!({
                "embeds": [{
                    "title": "Tornado Warning - Extreme",
                    "color": 0xFF0000,
                    "fields": [{"name": "Area", "value": "Polk, IA", "inline": false}]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordClient::new(&format!("{}/api/v10", server.uri()), "secret").unwrap();
        client.send_embed("123", &sample_embed()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_embed_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Missing Access"))
            .mount(&server)
            .await;

        let client = DiscordClient::new(&server.uri(), "secret").unwrap();
        let err = client.send_embed("123", &sample_embed()).await.unwrap_err();
        match err {
            SendError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "Missing Access");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_send_embed_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1.5"))
            .mount(&server)
            .await;

        let client = DiscordClient::new(&server.uri(), "secret").unwrap();
        let err = client.send_embed("123", &sample_embed()).await.unwrap_err();
        assert!(matches!(err, SendError::RateLimited { retry_after_secs: 2 }));
    }
}
