//! HTTP surface of the assistant.
//!
//! This module provides:
//! - `GET /` serving the chat frontend
//! - `GET /static/*` serving frontend assets and published visualizations
//! - `POST /chat` running one agent turn
//! - Shared application state

mod error;
mod handlers;
mod summary;

pub use error::ApiError;
pub use handlers::{ChatRequest, ChatResponse, DEFAULT_SESSION_ID, FRONTEND_NOT_FOUND};
pub use summary::{publish, QueryRecord, TurnSummary, NO_RESPONSE};

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::agent::AgentRunner;
use crate::config::Config;
use crate::database;
use crate::error::{AppResult, LlmError};
use crate::llm::LlmClient;
use crate::tools::ToolBox;
use crate::visualization::VisualizationEmitter;

/// Application state shared across handlers.
pub struct AppState {
    /// `None` when startup could not build the agent; `/chat` then answers 503.
    pub runner: Option<AgentRunner>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Retention bound for visualizations copied into `static_dir`.
    pub static_max_files: usize,
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state around an already built runner
    pub fn new(config: &Config, runner: Option<AgentRunner>) -> Self {
        Self {
            runner,
            static_dir: config.server.static_dir.clone(),
            static_max_files: config.visualization.max_files,
        }
    }

    /// Build the runner from configuration.
    ///
    /// Failures are logged and leave the agent uninitialized instead of
    /// aborting startup.
    pub async fn initialize(config: &Config) -> Self {
        let runner = match build_runner(config).await {
            Ok(runner) => {
                info!(model = %config.llm.model, "Agent initialized");
                Some(runner)
            }
            Err(crate::error::AppError::Llm(LlmError::NotConfigured { message })) => {
                warn!(reason = %message, "Agent disabled");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize agent");
                None
            }
        };
        Self::new(config, runner)
    }
}

/// Wire the model client, query executor and tools into a runner.
pub async fn build_runner(config: &Config) -> AppResult<AgentRunner> {
    let model = LlmClient::new(&config.llm, config.request.clone())?;
    let executor = database::connect(&config.database).await?;
    let emitter = VisualizationEmitter::new(&config.visualization);
    let tools = ToolBox::new(executor, emitter);
    Ok(AgentRunner::new(Arc::new(model), tools, &config.agent))
}

/// Build the HTTP router
pub fn router(state: SharedState) -> Router {
    let assets = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(handlers::index))
        .route("/chat", post(handlers::chat))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn state_without_agent(static_dir: PathBuf) -> SharedState {
        Arc::new(AppState {
            runner: None,
            static_dir,
            static_max_files: 50,
        })
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_without_agent_is_503() {
        let dir = tempdir().unwrap();
        let app = router(state_without_agent(dir.path().to_path_buf()));

        let response = app
            .oneshot(
                Request::post("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"message": "hi"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({"detail": "Agent not initialized"}));
    }

    #[tokio::test]
    async fn test_index_fallback_when_frontend_missing() {
        let dir = tempdir().unwrap();
        let app = router(state_without_agent(dir.path().join("missing")));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, FRONTEND_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_and_static_files_are_served() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("index.html"), "<h1>Logistics</h1>")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("graph_1a2b3c4d.html"), "<svg></svg>")
            .await
            .unwrap();
        let app = router(state_without_agent(dir.path().to_path_buf()));

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "<h1>Logistics</h1>");

        let response = app
            .oneshot(
                Request::get("/static/graph_1a2b3c4d.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<svg></svg>");
    }
}
