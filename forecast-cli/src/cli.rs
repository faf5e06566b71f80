use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, dispatch::dispatcher_from_config, fetch_comparison};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Compare today's forecast across eight Japanese weather providers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Gemini API key and model.
    Configure,

    /// Show today's forecasts for a location.
    Show {
        /// Place name (e.g. 渋谷) or a "lat, lon" pair.
        location: String,

        /// Print the parsed result as JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Model to use for this run instead of the configured one.
        #[arg(long)]
        model: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, json, model } => show(&location, json, model).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Gemini API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let model = Text::new("Model:")
        .with_default(config.model_name())
        .prompt()
        .context("Failed to read model name")?;
    config.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(location: &str, json: bool, model: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if model.is_some() {
        config.model = model;
    }

    let dispatcher = dispatcher_from_config(&config)?;
    let result = fetch_comparison(&dispatcher, location)
        .await
        .context("予報データの取得に失敗しました。もう一度お試しください。")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::Report(&result));
    }

    Ok(())
}
