//! Run command handler
//!
//! Submits a reel to the server, then renders the step log and the
//! resulting identifiers.

use anyhow::Result;
use clap::Args;
use colored::*;
use reelcast_core::domain::log::{StepLog, StepStatus};
use reelcast_core::domain::request::ExportFormat;
use reelcast_core::dto::run::{RunRequest, RunResponse, RunSuccess};

use crate::api::ApiClient;
use crate::config::Config;

/// Arguments for `reelcast run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Instagram reel URL
    pub reel_url: String,

    /// Title for the new Canva design
    #[arg(long)]
    pub title: Option<String>,

    /// Export format (mp4, gif or mov)
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Instagram access token (server default when omitted)
    #[arg(long, env = "REELCAST_INSTAGRAM_TOKEN", hide_env_values = true)]
    pub instagram_token: Option<String>,

    /// Canva access token (server default when omitted)
    #[arg(long, env = "REELCAST_CANVA_TOKEN", hide_env_values = true)]
    pub canva_token: Option<String>,

    #[arg(long)]
    pub canva_team_id: Option<String>,

    /// Existing Canva design to place the video in
    #[arg(long)]
    pub canva_template_id: Option<String>,

    /// Page number the video goes on
    #[arg(long)]
    pub canva_page_id: Option<String>,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    fn to_request(&self) -> RunRequest {
        RunRequest {
            reel_url: self.reel_url.clone(),
            design_title: self.title.clone(),
            instagram_access_token: self.instagram_token.clone(),
            canva_access_token: self.canva_token.clone(),
            canva_team_id: self.canva_team_id.clone(),
            canva_template_id: self.canva_template_id.clone(),
            canva_page_id: self.canva_page_id.clone(),
            export_format: self.format,
        }
    }
}

/// Handle `reelcast run`
pub async fn handle_run_command(args: RunArgs, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    if !args.json {
        println!(
            "{}",
            format!("Running pipeline for {}...", args.reel_url).bold()
        );
    }

    let response = client.run(&args.to_request()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match response {
        RunResponse::Success(success) => {
            print_logs(&success.logs);
            print_result(&success);
            Ok(())
        }
        RunResponse::Failure(failure) => {
            println!("\n{}", "Error:".bold());
            println!("{}", failure.error.red());
            anyhow::bail!("pipeline run failed")
        }
    }
}

fn print_logs(logs: &[StepLog]) {
    println!("{}", "Execution log:".bold());
    println!("{}", "─".repeat(80).dimmed());
    for log in logs {
        print_log_entry(log);
    }
    println!("{}", "─".repeat(80).dimmed());
}

fn print_log_entry(log: &StepLog) {
    println!(
        "{} {:<28} [{}] {}",
        log.timestamp.format("%H:%M:%S").to_string().dimmed(),
        log.step.label(),
        colorize_status(log.status),
        log.message
    );

    if let Some(meta) = &log.meta {
        if let Ok(pretty) = serde_json::to_string(meta) {
            println!("         {}", pretty.dimmed());
        }
    }
}

fn print_result(result: &RunSuccess) {
    println!("\n{}", "Export ready:".bold());
    if let Some(url) = &result.download_url {
        println!("  Download:  {}", url.cyan());
    }
    if let Some(id) = &result.design_id {
        println!("  Design ID: {}", id);
    }
    if let Some(id) = &result.export_id {
        println!("  Export ID: {}", id);
    }
    if let Some(id) = &result.asset_id {
        println!("  Asset ID:  {}", id);
    }
}

fn colorize_status(status: StepStatus) -> colored::ColoredString {
    match status {
        StepStatus::Pending => "PENDING".dimmed(),
        StepStatus::Success => "SUCCESS".green(),
        StepStatus::Error => "ERROR".red(),
    }
}
