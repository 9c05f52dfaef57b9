//! API Module
//!
//! HTTP API layer for the server.

pub mod error;
pub mod health;
pub mod run;

use std::any::Any;
use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::config::Settings;
use crate::service::{PipelineError, PipelineRunner};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub runner: Arc<PipelineRunner>,
}

impl AppState {
    pub fn new(settings: Settings, runner: PipelineRunner) -> Self {
        Self {
            settings: Arc::new(settings),
            runner: Arc::new(runner),
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/run", post(run::run_pipeline))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Answer a panicked request with the masked internal-error body
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::from(PipelineError::Internal(format!("request handler panicked: {}", detail)))
        .into_response()
}
