use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weatherx_core::Config;

use crate::http;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherx", version, about = "Weather proxy with cached AI reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP backend.
    Serve {
        /// Listen address; defaults to `server.bind` from config.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Resolve one location through the cache and print the JSON response.
    Report {
        /// Location name, e.g. "paris" or "40.71,-74.00".
        location: String,
    },

    /// Store credentials and endpoints in the config file.
    Configure,

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let config = Config::load()?;
                config.validate()?;
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                http::serve(&config, &bind).await?;
            }
            Command::Report { location } => {
                let config = Config::load()?;
                config.validate()?;
                let service = weatherx_core::service_from_config(&config)?;
                let report = service.full_data(&location).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Command::Configure => configure()?,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load_file()?;

    cfg.weather.api_key = ask_secret("Tomorrow.io API key:", cfg.weather.api_key.take())?;
    cfg.llm.api_key = ask_secret("Report backend API key:", cfg.llm.api_key.take())?;

    let cache_url = Text::new("Upstash Redis REST URL (blank for in-process cache):")
        .with_initial_value(cfg.cache.url.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read cache URL")?;
    cfg.cache.url = non_empty(cache_url);
    cfg.cache.token = if cfg.cache.url.is_some() {
        ask_secret("Upstash Redis REST token:", cfg.cache.token.take())?
    } else {
        None
    };

    cfg.server.frontend_url = Text::new("Allowed CORS origin:")
        .with_default(&cfg.server.frontend_url)
        .prompt()
        .context("Failed to read CORS origin")?;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Prompt for a secret; an empty answer keeps `current`.
fn ask_secret(label: &str, current: Option<String>) -> anyhow::Result<Option<String>> {
    let mut prompt = Password::new(label)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if current.is_some() {
        prompt = prompt.with_help_message("leave blank to keep the stored value");
    }

    let answer = prompt
        .prompt()
        .with_context(|| format!("Failed to read {label}"))?;

    Ok(non_empty(answer).or(current))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
