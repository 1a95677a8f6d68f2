use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::agent::{EventPart, EventRole, TurnEvent};
use crate::error::{VisualizationError, VisualizationResult};
use crate::tools::{GRAPH_TOOL, SQL_TOOL};
use crate::visualization::{prune, Visualization};

/// Text returned when the agents produced no prose.
pub const NO_RESPONSE: &str = "No response from agent.";

/// One executed query, as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub tool: String,
    pub query: String,
}

/// What the endpoint extracts from a completed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSummary {
    /// Model text in event order, or [`NO_RESPONSE`].
    pub response: String,
    /// The graph tool was called at least once.
    pub wants_visualization: bool,
    pub queries: Vec<QueryRecord>,
    /// Last visualization written during the turn.
    pub visualization: Option<Visualization>,
}

impl TurnSummary {
    /// Fold a turn's events into the response pieces
    pub fn from_events(events: &[TurnEvent]) -> Self {
        let mut response = String::new();
        let mut wants_visualization = false;
        let mut queries = Vec::new();
        let mut visualization = None;

        for event in events {
            match &event.part {
                EventPart::Text { text } if event.role == EventRole::Model => {
                    response.push_str(text);
                }
                EventPart::FunctionCall { name, args } if is_query_tool(name) => {
                    if name == GRAPH_TOOL {
                        wants_visualization = true;
                    }
                    if let Some(query) = args.get("query").and_then(Value::as_str) {
                        queries.push(QueryRecord {
                            tool: name.clone(),
                            query: query.to_string(),
                        });
                    }
                }
                EventPart::FunctionResponse {
                    name,
                    visualization: Some(viz),
                    ..
                } if name == GRAPH_TOOL => {
                    visualization = Some(viz.clone());
                }
                _ => {}
            }
        }

        if response.is_empty() {
            response = NO_RESPONSE.to_string();
        }

        Self {
            response,
            wants_visualization,
            queries,
            visualization,
        }
    }
}

fn is_query_tool(name: &str) -> bool {
    name == SQL_TOOL || name == GRAPH_TOOL
}

/// Copy a visualization into the static directory and return its public URL.
///
/// Returns `Ok(None)` when the source file is gone. The static directory is
/// pruned with the same retention as the output directory.
pub async fn publish(
    visualization: &Visualization,
    static_dir: &Path,
    max_files: usize,
) -> VisualizationResult<Option<String>> {
    if !tokio::fs::try_exists(&visualization.path).await.unwrap_or(false) {
        warn!(
            path = %visualization.path.display(),
            "Visualization file missing, omitting URL"
        );
        return Ok(None);
    }

    tokio::fs::create_dir_all(static_dir).await?;
    let destination = static_dir.join(&visualization.file_name);

    if is_same_file(&visualization.path, static_dir, &visualization.file_name).await {
        // Copying a file onto itself truncates it
        info!(file = %visualization.file_name, "Visualization already in static directory");
    } else {
        tokio::fs::copy(&visualization.path, &destination)
            .await
            .map_err(|source| VisualizationError::Write {
                path: destination.display().to_string(),
                source,
            })?;

        info!(file = %visualization.file_name, "Visualization published");
    }

    prune(static_dir, max_files).await?;

    Ok(Some(format!("/static/{}", visualization.file_name)))
}

async fn is_same_file(source: &Path, static_dir: &Path, file_name: &str) -> bool {
    match (
        tokio::fs::canonicalize(source).await,
        tokio::fs::canonicalize(static_dir).await,
    ) {
        (Ok(source), Ok(dir)) => source == dir.join(file_name),
        _ => false,
    }
}
