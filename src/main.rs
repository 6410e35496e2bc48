use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod canvas;
mod cli;
mod config;
mod error;
mod export;
mod mailer;
mod services;
mod sheets;

#[cfg(test)]
mod test_utils;

use cli::Cli;

/// Main entry point for the Gatevas course administration tool.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatevas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Gatevas starting up");

    let cli = Cli::parse();
    cli.run().await
}
