//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod health;
mod run;

pub use run::RunArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a reel through the pipeline and print the step log
    Run(RunArgs),
    /// Check that the server is up
    Health,
}

/// Handle a CLI command
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run(args) => run::handle_run_command(args, config).await,
        Commands::Health => health::handle_health_command(config).await,
    }
}
