//! Reelcast Server
//!
//! HTTP service that turns an Instagram reel into an exported Canva design.
//!
//! Architecture:
//! - Configuration: settings and default credentials from the environment
//! - API: axum handlers for `/api/run` and `/health`
//! - Services: request/default merge, the pipeline runner and job polling
//!
//! Provider access goes through `reelcast-client`.

use std::sync::Arc;

use anyhow::Context;
use reelcast_client::{CanvaClient, InstagramClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod service;

use crate::api::AppState;
use crate::config::Settings;
use crate::service::PipelineRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelcast_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reelcast server...");

    let settings = Settings::from_env().context("Failed to load settings")?;
    settings.validate().context("Invalid settings")?;

    tracing::info!(
        "Instagram API: {}, Canva API: {}",
        settings.instagram_api_base,
        settings.canva_api_base
    );
    tracing::info!(
        "Default credentials: instagram={}, canva={}",
        settings.instagram_access_token.is_some(),
        settings.canva_access_token.is_some()
    );

    let http = reqwest::Client::builder()
        .timeout(settings.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let instagram = Arc::new(
        InstagramClient::with_client(settings.instagram_api_base.clone(), http.clone())
            .with_transfer_timeout(settings.transfer_timeout),
    );
    let canva = Arc::new(
        CanvaClient::with_client(settings.canva_api_base.clone(), http)
            .with_transfer_timeout(settings.transfer_timeout),
    );
    let runner = PipelineRunner::from_settings(&settings, instagram, canva);

    let addr = settings.bind_addr.clone();
    let app = api::create_router(AppState::new(settings, runner));

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
