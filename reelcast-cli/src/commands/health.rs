//! Health command handler

use anyhow::Result;
use colored::*;

use crate::api::ApiClient;
use crate::config::Config;

pub async fn handle_health_command(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);
    let health = client.health().await?;

    let version = health["version"].as_str().unwrap_or("unknown");
    println!(
        "{} {} is up (version {})",
        "✓".green(),
        client.base_url().cyan(),
        version
    );

    Ok(())
}
