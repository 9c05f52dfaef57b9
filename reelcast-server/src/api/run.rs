//! Run API Handler
//!
//! `POST /api/run` parses the body, merges it with the server defaults and
//! runs the pipeline to completion before answering.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use reelcast_core::domain::request::AgentRequest;
use reelcast_core::dto::run::RunResponse;
use serde_json::Value;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::RunConfig;

/// POST /api/run
/// Run the reel-to-Canva pipeline once
pub async fn run_pipeline(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RunResponse>> {
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let request = AgentRequest::parse(&payload)?;
    let config = RunConfig::resolve(&request, &state.settings)?;

    tracing::info!(
        "Run requested for {} (format {}, page {})",
        config.reel_url,
        config.export_format,
        config.page
    );

    let result = state.runner.run(&config).await.map_err(|failure| {
        tracing::warn!(
            "Run failed after {} step(s): {}",
            failure.logs.len(),
            failure.error
        );
        for log in &failure.logs {
            tracing::warn!("  [{:?}] {} - {}", log.status, log.step, log.message);
        }
        ApiError::from(failure.error)
    })?;

    Ok(Json(RunResponse::from(result)))
}
