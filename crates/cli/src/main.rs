//! CloudSearch command-line client.
//!
//! Searches a CloudSearch domain and submits document batches from the shell.

mod commands;
mod config;

use clap::Parser;
use cloudsearch_client::CloudSearchClient;
use tracing::{debug, info};

use crate::config::CliConfig;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cloudsearch_client={},cloudsearch_cli={}",
            level, level
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    init_logging(&cli.log_level);

    let config = cli.client_config()?;
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        domain = config.search_domain.as_deref().unwrap_or("-"),
        region = %config.aws_region,
        api_version = %config.api_version,
        mode = %config.mode,
        "Starting CloudSearch client"
    );
    debug!(command = ?cli.command, "Parsed command");

    let client = CloudSearchClient::new(config)?;
    commands::run(&client, &cli.command).await
}
