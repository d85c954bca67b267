//! Binary crate for the `weatherx` backend.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Serving the HTTP API

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weatherx=info,weatherx_core=info,tower_http=info".into()),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
