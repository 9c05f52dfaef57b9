//! Reelcast CLI
//!
//! Command-line client for a running Reelcast server.

mod api;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "reelcast")]
#[command(about = "Send Instagram reels to Canva", long_about = None)]
struct Cli {
    /// Reelcast server URL
    #[arg(long, env = "REELCAST_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "reelcast",
            "--server-url",
            "http://reelcast.internal:9000",
            "run",
            "https://www.instagram.com/reel/abc/",
            "--format",
            "gif",
            "--title",
            "Teaser",
        ])
        .unwrap();

        assert_eq!(cli.server_url, "http://reelcast.internal:9000");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let parsed = Cli::try_parse_from([
            "reelcast",
            "run",
            "https://www.instagram.com/reel/abc/",
            "--format",
            "avi",
        ]);
        assert!(parsed.is_err());
    }
}
