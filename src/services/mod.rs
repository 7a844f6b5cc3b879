//! Service layer for the alert relay.
//!
//! This module contains the building blocks of a cycle:
//! - Feed fetching (`FeedClient`, `AlertSource`)
//! - Feed decoding (`parser::parse`)
//! - Channel resolution (`ChannelRouter`)
//! - Formatting and delivery (`Dispatcher`)

pub mod dispatcher;
pub mod feed;
pub mod parser;
pub mod router;

pub use dispatcher::Dispatcher;
pub use feed::{AlertSource, FeedClient};
pub use router::ChannelRouter;
