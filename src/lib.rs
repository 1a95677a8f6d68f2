//! # Logistics Chat
//!
//! A conversational HTTP service that answers natural-language logistics
//! questions against Cloud Spanner. A router agent hands each question to a
//! SQL specialist for tabular answers or a graph specialist that renders the
//! matched network as an interactive HTML visualization.
//!
//! ## Architecture
//!
//! ```text
//! Browser → POST /chat → AgentRunner (router → sql_agent | gql_agent)
//!                              ↓                     ↓
//!                     LLM (chat completions)   Tools → QueryExecutor (Spanner / SQLite)
//!                                                  ↓
//!                                     Graph interpreter → Visualization emitter
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use logistics_chat::{Config, AppState};
//! use logistics_chat::server::router;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let state = Arc::new(AppState::initialize(&config).await);
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_addr()?).await?;
//!     axum::serve(listener, router(state).into_make_service()).await?;
//!     Ok(())
//! }
//! ```

/// Router and specialist agents, turn events and session memory.
pub mod agent;
/// Configuration management.
pub mod config;
/// Read-only query execution against Spanner or SQLite.
pub mod database;
/// Error types and result aliases for the application.
pub mod error;
/// Graph reconstruction from query rows.
pub mod graph;
/// Chat-completions client and wire types.
pub mod llm;
/// System prompts for the agents.
pub mod prompts;
/// HTTP server, handlers and shared state.
pub mod server;
/// Tools callable by the agents.
pub mod tools;
/// HTML rendering and retention of graph visualizations.
pub mod visualization;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
