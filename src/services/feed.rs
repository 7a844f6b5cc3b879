// src/services/feed.rs

//! Alert feed client.
//!
//! One GET per cycle against the active-alerts endpoint. Retrying is left to
//! the scheduler: a failed fetch simply skips the cycle.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{AppError, FetchError, Result};
use crate::models::FeedConfig;
use crate::utils::http;

/// Anything that can hand the cycle a raw feed document.
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch(&self) -> std::result::Result<Vec<u8>, FetchError>;
}

/// HTTP client for the NWS active-alerts endpoint.
pub struct FeedClient {
    client: Client,
    url: Url,
}

impl FeedClient {
    /// Build a client from feed settings.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = http::create_async_client(config)?;
        let url = feed_url(&config.url, &config.events)?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl AlertSource for FeedClient {
    async fn fetch(&self) -> std::result::Result<Vec<u8>, FetchError> {
        log::debug!("Fetching alerts from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::BodyRead(e.to_string()))?;

        log::debug!("Fetched {} bytes of alert data", body.len());
        Ok(body.to_vec())
    }
}

/// Build the feed URL with an `event` filter.
///
/// Event names are percent-encoded with spaces as `%20` and joined with
/// literal commas, e.g. `?event=tornado%20warning,tornado%20watch`.
pub fn feed_url(base: &str, events: &[String]) -> Result<Url> {
    let mut url = Url::parse(base)?;

    let list = events
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| url::form_urlencoded::byte_serialize(e.as_bytes()).collect::<String>())
        .map(|e| e.replace('+', "%20"))
        .collect::<Vec<_>>()
        .join(",");

    if list.is_empty() {
        return Err(AppError::validation("no feed events configured"));
    }

    url.set_query(Some(&format!("event={}", list)));
    Ok(url)
}
