//! HTTP handlers for the chat frontend.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::ApiError;
use super::summary::{publish, QueryRecord, TurnSummary};
use super::SharedState;

/// Served when `index.html` is missing from the static directory.
pub const FRONTEND_NOT_FOUND: &str =
    "<h1>Frontend not found. Please ensure app/static/index.html exists.</h1>";

/// Session used when the client does not send one.
pub const DEFAULT_SESSION_ID: &str = "default_session";

/// Body of `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

/// Reply to `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub visualization_url: Option<String>,
    pub queries: Vec<QueryRecord>,
}

/// `GET /`
pub async fn index(State(state): State<SharedState>) -> Html<String> {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Frontend not found");
            Html(FRONTEND_NOT_FOUND.to_string())
        }
    }
}

/// `POST /chat`
pub async fn chat(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let runner = state.runner.as_ref().ok_or(ApiError::AgentUnavailable)?;

    info!(session_id = %request.session_id, "Chat request received");

    let events = runner
        .run_turn(&request.session_id, &request.message)
        .await?;

    let summary = TurnSummary::from_events(&events);

    let visualization_url = if summary.wants_visualization {
        match &summary.visualization {
            Some(viz) => publish(viz, &state.static_dir, state.static_max_files)
                .await
                .map_err(crate::error::AppError::from)?,
            None => {
                warn!(session_id = %request.session_id, "Graph tool ran but produced no visualization");
                None
            }
        }
    } else {
        None
    };

    Ok(Json(ChatResponse {
        response: summary.response,
        visualization_url,
        queries: summary.queries,
    }))
}
