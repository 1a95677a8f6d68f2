use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::AppError;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Startup could not build the agent runner.
    #[error("Agent not initialized")]
    AgentUnavailable,

    /// Anything that failed while running the turn.
    #[error(transparent)]
    App(#[from] AppError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AgentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::App(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::App(e) = &self {
            error!(error = %e, "Chat turn failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
