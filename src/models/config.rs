//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration, read from `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Alert feed endpoint and HTTP behavior
    #[serde(default)]
    pub feed: FeedConfig,

    /// Polling cadence and dispatch fan-out
    #[serde(default)]
    pub poll: PollConfig,

    /// Discord REST settings
    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.url.trim().is_empty() {
            return Err(AppError::validation("feed.url is empty"));
        }
        url::Url::parse(&self.feed.url)?;
        if self.feed.events.iter().all(|e| e.trim().is_empty()) {
            return Err(AppError::validation("feed.events is empty"));
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.poll.interval_secs == 0 {
            return Err(AppError::validation("poll.interval_secs must be > 0"));
        }
        if self.poll.max_concurrent_dispatches == 0 {
            return Err(AppError::validation(
                "poll.max_concurrent_dispatches must be > 0",
            ));
        }
        if self.discord.api_base.trim().is_empty() {
            return Err(AppError::validation("discord.api_base is empty"));
        }
        Ok(())
    }
}

/// Alert feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Active-alerts endpoint
    #[serde(default = "defaults::feed_url")]
    pub url: String,

    /// Event names requested through the `event` query parameter
    #[serde(default = "defaults::events")]
    pub events: Vec<String>,

    /// User-Agent header; the NWS API rejects requests without one
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: defaults::feed_url(),
            events: defaults::events(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Maximum in-flight sends within one cycle
    #[serde(default = "defaults::max_concurrent_dispatches")]
    pub max_concurrent_dispatches: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            max_concurrent_dispatches: defaults::max_concurrent_dispatches(),
        }
    }
}

/// Discord REST settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "defaults::discord_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the bot token
    #[serde(default = "defaults::token_env")]
    pub token_env: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::discord_api_base(),
            token_env: defaults::token_env(),
        }
    }
}

impl DiscordConfig {
    /// Read the bot token from the configured environment variable.
    pub fn token(&self) -> Result<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(AppError::config(format!(
                "Discord bot token not set (expected in ${})",
                self.token_env
            ))),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Feed defaults
    pub fn feed_url() -> String {
        "https://api.weather.gov/alerts/active".into()
    }
    pub fn events() -> Vec<String> {
        vec![
            "tornado warning".into(),
            "tornado watch".into(),
            "severe thunderstorm warning".into(),
            "severe thunderstorm watch".into(),
            "special weather statement".into(),
        ]
    }
    pub fn user_agent() -> String {
        "storm-relay/0.1 (github.com/storm-relay)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Poll defaults
    pub fn interval() -> u64 {
        60
    }
    pub fn max_concurrent_dispatches() -> usize {
        4
    }

    // Discord defaults
    pub fn discord_api_base() -> String {
        "https://discord.com/api/v10".into()
    }
    pub fn token_env() -> String {
        "DISCORD_TOKEN".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
