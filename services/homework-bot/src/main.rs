//! Homework bot CLI
//!
//! Command-line interface for the homework review status watcher.

use std::path::PathBuf;

use clap::Parser;
use homework_bot::{load_config, Config, HomeworkBotBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Watches homework review status and relays changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, once={}, log_level={:?}",
        args.config,
        args.once,
        args.log_level
    );

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Err(e) = config.resolve_secrets() {
        tracing::error!("Cannot start homework bot: {}", e);
        return Err(e.into());
    }

    tracing::info!("Starting homework bot");
    tracing::debug!(
        "Endpoint: {}, retry interval: {}s",
        config.practicum.endpoint,
        config.polling.retry_interval_seconds
    );

    let mut bot = HomeworkBotBuilder::new(config).build()?;

    if args.once {
        let outcome = bot.run_once().await;
        tracing::info!("Single cycle finished: {:?}", outcome);
        return Ok(());
    }

    bot.start().await?;

    Ok(())
}
