// src/lib.rs

//! storm-relay library
//!
//! Polls the NWS active-alerts feed, classifies alerts and relays new ones
//! to per-category Discord channels.

pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
