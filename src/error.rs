// src/error.rs

//! Unified error handling for the alert relay.
//!
//! Each pipeline stage has its own error enum so the cycle can decide how to
//! react (abort, fail open, log and continue). All of them convert into
//! [`AppError`] for callers that only need to propagate.

use std::fmt;

use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure while fetching the alert feed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure (DNS, connect, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Feed answered with something other than 200
    #[error("feed returned non-200 status: {0}")]
    BadStatus(u16),

    /// Response body could not be read to the end
    #[error("failed to read response body: {0}")]
    BodyRead(String),
}

/// Failure while decoding the alert feed.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed alert feed: {0}")]
    Malformed(String),
}

/// Failure while reading or writing persisted state.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to read {key}: {message}")]
    ReadFailure { key: String, message: String },

    #[error("failed to write {key}: {message}")]
    WriteFailure { key: String, message: String },
}

impl PersistError {
    pub fn read(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ReadFailure {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn write(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::WriteFailure {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Failure while delivering a single alert.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No channel configured for the alert's category
    #[error("no channel configured for {0}")]
    ChannelUnresolved(String),

    /// The messaging capability rejected or failed the send
    #[error("failed to send to channel {channel}: {message}")]
    SendFailure { channel: String, message: String },
}

impl DispatchError {
    pub fn send(channel: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::SendFailure {
            channel: channel.into(),
            message: message.to_string(),
        }
    }
}

/// Failure reported by a messaging backend.
#[derive(Error, Debug)]
pub enum SendError {
    /// Request never got a response
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend throttled the request
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Backend answered with a non-success status
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client setup failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
