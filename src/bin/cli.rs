//! storm-relay CLI
//!
//! Local execution entry point. For AWS Lambda, use `storm-relay-lambda`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use storm_relay::{
    error::Result,
    models::{Category, Config},
    notify::DiscordClient,
    pipeline::{self, Orchestrator, Relay, TickOutcome},
    services::{Dispatcher, FeedClient},
    storage::{ChannelConfigStore, LocalStorage, SentAlertStore},
};

/// storm-relay - NWS severe weather alerts to Discord
#[derive(Parser, Debug)]
#[command(
    name = "storm-relay",
    version,
    about = "Relays NWS severe weather alerts to Discord channels"
)]
struct Cli {
    /// Directory holding settings.toml, channels.json and sent_alerts.json
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the feed until interrupted
    Run,

    /// Run a single cycle and exit
    Once,

    /// Set the channel for every category (overwrites the current table)
    Configure {
        /// Tornado warning/watch channel
        #[arg(long)]
        tornado: String,

        /// Severe thunderstorm warning/watch channel
        #[arg(long)]
        svrstorm: String,

        /// Winter weather channel
        #[arg(long)]
        winter: String,

        /// Special weather statement channel
        #[arg(long)]
        sws: String,
    },

    /// Validate settings
    Validate,

    /// Show configured channels and tracked alerts
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Wire the production collaborators into an orchestrator.
fn build_orchestrator(config: &Config, storage: Arc<LocalStorage>) -> Result<Orchestrator> {
    let source = Arc::new(FeedClient::new(&config.feed)?);
    let sender = Arc::new(DiscordClient::from_config(&config.discord)?);

    log::info!("Feed URL: {}", source.url());

    let relay = Relay::new(source, storage.clone(), storage, Dispatcher::new(sender))
        .with_max_concurrent(config.poll.max_concurrent_dispatches);
    Ok(Orchestrator::new(relay))
}

async fn show_info(storage: &LocalStorage) -> Result<()> {
    log::info!("Storage directory: {}", storage.root().display());

    let channels = storage.load_channels().await?;
    for category in Category::ALL {
        let channel = channels.channel(category);
        log::info!(
            "{:<26} {:<9} {}",
            category.display_name(),
            format!("[{}]", category.config_key()),
            if channel.is_empty() { "(unset)" } else { channel }
        );
    }

    let sent = storage.load_sent().await?;
    log::info!("Tracking {} announced alerts", sent.len());
    for id in sent.iter() {
        log::debug!("    {}", id);
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.storage_dir.join("settings.toml");
    let loaded = Config::load(&settings_path);
    let default_level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &default_level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            settings_path.display(),
            e
        );
        Config::default()
    });

    let storage = Arc::new(LocalStorage::new(&cli.storage_dir));

    match cli.command {
        Command::Run => {
            config.validate()?;
            let orchestrator = Arc::new(build_orchestrator(&config, Arc::clone(&storage))?);
            let period = Duration::from_secs(config.poll.interval_secs);

            log::info!("storm-relay starting, press Ctrl+C to exit");
            orchestrator
                .run(period, async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::error!("Failed to listen for Ctrl+C: {}", e);
                    }
                })
                .await;
        }

        Command::Once => {
            config.validate()?;
            let orchestrator = build_orchestrator(&config, Arc::clone(&storage))?;

            match orchestrator.tick().await {
                TickOutcome::Completed(report) => {
                    log::info!("Cycle complete: {}", report);
                    if !report.persisted {
                        log::warn!("Sent alert state was not saved");
                    }
                }
                TickOutcome::Failed(e) => return Err(e),
                TickOutcome::Skipped => log::warn!("Cycle skipped"),
            }
        }

        Command::Configure {
            tornado,
            svrstorm,
            winter,
            sws,
        } => {
            pipeline::run_configure(&*storage, &tornado, &svrstorm, &winter, &sws).await?;
            log::info!("Channels saved to {}", cli.storage_dir.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match config.discord.token() {
                Ok(_) => log::info!("✓ Discord token found in ${}", config.discord.token_env),
                Err(e) => log::warn!("{}", e),
            }

            let channels = storage.load_channels().await?;
            log::info!("✓ {}/4 channels configured", channels.configured_count());
        }

        Command::Info => show_info(&storage).await?,
    }

    Ok(())
}
