//! InfraPilot CLI Application
//!
//! Command-line front end for requesting and executing infrastructure plans.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use infrapilot_core::{PilotClientBuilder, PilotConfig};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        backend_url,
        token,
        user_id,
        no_color,
        command,
    } = Args::parse();

    let mut config = PilotConfig::load(config.as_deref()).context("Failed to load configuration")?;
    if token.is_some() {
        config.auth.token = token;
    }
    if user_id.is_some() {
        config.auth.user_id = user_id;
    }

    let client = PilotClientBuilder::new()
        .with_config(config)
        .with_backend_url(backend_url)
        .build()
        .context("Failed to initialize client")?;

    let cli = Cli::new(client, TerminalRenderer::new(!no_color));

    info!("InfraPilot started");

    match command {
        Plan(args) => cli.plan(&args).await,
        Run(args) => cli.run(&args).await,
        Tools => {
            cli.tools();
            Ok(())
        }
    }
}
