//! AWS Lambda entry point for storm-relay
//!
//! Deploy with `cargo lambda build --release --features lambda` and invoke on
//! a schedule (e.g. an EventBridge rule firing every minute). Each invocation
//! runs exactly one cycle against S3-backed state.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storm_relay::error::{AppError, Result};
use storm_relay::models::Config;
use storm_relay::notify::DiscordClient;
use storm_relay::pipeline::{CycleReport, Relay};
use storm_relay::services::{Dispatcher, FeedClient};
use storm_relay::storage::s3::S3Storage;

/// Level used when `RUST_LOG` is unset, blank or unparsable.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter from `RUST_LOG` directives, falling back to `default_level`.
fn env_filter(directives: Option<&str>, default_level: &str) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(env_filter(directives.as_deref(), DEFAULT_LOG_LEVEL))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("storm-relay Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for scheduled events.
#[instrument(skip(event))]
async fn handler(event: LambdaEvent<Value>) -> std::result::Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    match run_lambda_cycle().await {
        Ok(report) => {
            info!("Cycle complete: {}", report);
            Ok(serde_json::json!({
                "status": "success",
                "active": report.active,
                "dispatched": report.dispatched,
                "failed": report.failed,
                "pruned": report.pruned,
                "persisted": report.persisted,
            }))
        }
        Err(e) => {
            error!("Cycle aborted: {}", e);
            Ok(serde_json::json!({
                "status": "error",
                "message": e.to_string()
            }))
        }
    }
}

/// Load settings from S3 and run one cycle.
async fn run_lambda_cycle() -> Result<CycleReport> {
    let storage = Arc::new(S3Storage::from_env().await);

    let config = match storage.read_bytes_optional("settings.toml").await? {
        Some(bytes) => {
            let text = String::from_utf8(bytes)
                .map_err(|e| AppError::config(format!("settings.toml is not valid UTF-8: {e}")))?;
            Config::from_toml(&text)?
        }
        None => {
            info!("No settings.toml in S3, using defaults");
            Config::default()
        }
    };
    config.validate()?;

    let source = Arc::new(FeedClient::new(&config.feed)?);
    let sender = Arc::new(DiscordClient::from_config(&config.discord)?);
    let relay = Relay::new(source, storage.clone(), storage, Dispatcher::new(sender))
        .with_max_concurrent(config.poll.max_concurrent_dispatches);

    relay.run_cycle().await
}
