use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use cityweather_core::{Config, View, WeatherFetcher, app::FETCH_ERROR_MESSAGE, config::API_KEY_ENV};
use inquire::{Password, PasswordDisplayMode, Text};
use std::{path::PathBuf, sync::Arc};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the platform config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the weather provider host and API key.
    Configure,

    /// Show the weather for a city once and exit.
    Show {
        /// City name, e.g. "Paris".
        city: String,

        /// Print the normalized record as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },

    /// Search cities interactively (default).
    Interactive {
        /// City fetched on start; defaults to the configured default city.
        city: Option<String>,
    },
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match self.command.unwrap_or(Command::Interactive { city: None }) {
            Command::Configure => configure(config, self.config),
            Command::Show { city, json } => show(&config, &city, json).await,
            Command::Interactive { city } => {
                let fetcher = Arc::from(cityweather_core::fetcher_from_config(&config)?);
                let city = city.unwrap_or_else(|| config.default_city.clone());
                session::run(fetcher, city, &config.display).await
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_resolved(path),
            None => Config::load(),
        }
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let host = Text::new("Provider host (X-RapidAPI-Host):")
        .with_default(&config.provider.host)
        .prompt()
        .context("Configuration cancelled")?;

    let base_url = Text::new("Provider base URL:")
        .with_default(&config.provider.base_url)
        .prompt()
        .context("Configuration cancelled")?;

    let help = format!("Leave empty to read it from {API_KEY_ENV} at startup");
    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(&help)
        .prompt()
        .context("Configuration cancelled")?;

    config.provider.host = host;
    config.provider.base_url = base_url;
    config.set_api_key(api_key);

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

async fn show(config: &Config, city: &str, json: bool) -> anyhow::Result<()> {
    let fetcher = cityweather_core::fetcher_from_config(config)?;

    match fetcher.fetch_weather(city).await {
        Ok(data) if json => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        Ok(data) => {
            println!("{}", render::render_view(View::Success(&data), &config.display));
            Ok(())
        }
        Err(err) => {
            tracing::warn!(%city, kind = err.kind(), error = %err, "weather fetch failed");
            bail!(FETCH_ERROR_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive() {
        let cli = Cli::try_parse_from(["cityweather"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn verbosity_raises_log_level() {
        let cli = Cli::try_parse_from(["cityweather", "-vv", "show", "Paris"]).expect("parse");
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn show_takes_city_and_json_flag() {
        let cli =
            Cli::try_parse_from(["cityweather", "show", "New York", "--json"]).expect("parse");
        match cli.command {
            Some(Command::Show { city, json }) => {
                assert_eq!(city, "New York");
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_path_is_global() {
        let cli = Cli::try_parse_from(["cityweather", "interactive", "--config", "/tmp/cw.toml"])
            .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cw.toml")));
    }
}
