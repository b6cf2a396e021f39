//! CLI entry point for the gantry gateway.
//!
//! Loads environment configuration, initializes logging, and dispatches to
//! the selected command.

mod parser;

use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gantry_axum::{ServerConfig, start_server};
use gantry_core::classifier;
use gantry_core::config::DispatchMode;

use parser::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; -v overrides RUST_LOG's default level
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Serve { port, mode } => {
            let mut config = ServerConfig::from_env();
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(mode) = mode {
                let Some(parsed) = DispatchMode::parse(&mode) else {
                    bail!("unknown dispatch mode: {mode} (expected pre-dispatch or post-dispatch)");
                };
                config.gateway.dispatch_mode = parsed;
            }
            start_server(config).await?;
        }
        Commands::Classify { query } => {
            let services = classifier::classify(&query);
            if services.is_empty() {
                println!("(no services matched)");
            } else {
                for service in services {
                    println!("{service}");
                }
            }
        }
    }

    Ok(())
}
