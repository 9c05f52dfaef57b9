//! API Error Handling
//!
//! Every failure of `/api/run` is reported as HTTP 400 with the body
//! `{ "success": false, "error": "..." }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reelcast_core::domain::request::ValidationError;
use reelcast_core::dto::run::RunResponse;

use crate::service::PipelineError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be read as JSON
    BadRequest(String),
    Pipeline(PipelineError),
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Pipeline(err) => err.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Pipeline(PipelineError::Internal(detail)) => {
                tracing::error!("Internal error: {}", detail);
            }
            other => tracing::debug!("Rejecting run: {}", other.message()),
        }

        (
            StatusCode::BAD_REQUEST,
            Json(RunResponse::failure(self.message())),
        )
            .into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Pipeline(PipelineError::Validation(err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
