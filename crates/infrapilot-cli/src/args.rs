use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Command-line client for the InfraPilot agent
///
/// InfraPilot turns a natural-language instruction into an execution plan
/// for cloud infrastructure, then runs that plan on the backend agent while
/// streaming step progress back to the terminal.
#[derive(Parser)]
#[command(version, about, name = "infrapilot")]
pub struct Args {
    /// Path to the configuration file. Defaults to
    /// $XDG_CONFIG_HOME/infrapilot/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the backend agent
    #[arg(long, global = true, env = "INFRAPILOT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Token presented to the backend
    #[arg(long, global = true, env = "INFRAPILOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// User id presented to the backend
    #[arg(long, global = true, env = "INFRAPILOT_USER_ID")]
    pub user_id: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Request a plan and print it without executing
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Request a plan, confirm it, and execute it
    #[command(alias = "r")]
    Run(RunArgs),
    /// Show the step name to tool mappings in use
    Tools,
}

#[derive(ClapArgs)]
pub struct PlanArgs {
    /// What to build, in plain language
    pub instruction: String,
    /// Plan for real changes instead of a dry run
    #[arg(long)]
    pub live: bool,
}

#[derive(ClapArgs)]
pub struct RunArgs {
    /// What to build, in plain language
    pub instruction: String,
    /// Apply changes to real infrastructure instead of a dry run
    #[arg(long)]
    pub live: bool,
    /// Execute without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
