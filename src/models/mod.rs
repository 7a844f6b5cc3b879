// src/models/mod.rs

//! Domain models for the alert relay.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod alert;
mod category;
mod channels;
mod config;
mod sent;

// Re-export all public types
pub use alert::AlertRecord;
pub use category::{Category, classify};
pub use channels::{ChannelConfig, ChannelInfo};
pub use config::{Config, DiscordConfig, FeedConfig, LoggingConfig, PollConfig};
pub use sent::SentAlertSet;
