//! Tools the specialist agents can call.
//!
//! `run_sql_query` returns rows for the model to summarize.
//! `run_graph_query_viz` rebuilds a graph from the rows and writes an HTML
//! visualization; the resulting artifact travels back in [`ToolOutput`].

mod definitions;

pub use definitions::{graph_tool, sql_tool, transfer_tool};

use serde_json::Value;
use tracing::{info, warn};

use crate::database::{Row, SharedExecutor};
use crate::error::{AgentError, AgentResult, AppResult};
use crate::graph::{interpret, GraphOutcome};
use crate::llm::ToolDefinition;
use crate::visualization::{Visualization, VisualizationEmitter};

/// Tabular query tool name.
pub const SQL_TOOL: &str = "run_sql_query";

/// Graph query and visualization tool name.
pub const GRAPH_TOOL: &str = "run_graph_query_viz";

/// Agent hand-off function name.
pub const TRANSFER_TOOL: &str = "transfer_to_agent";

/// Domain tools backed by the query executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Sql,
    Graph,
}

impl ToolKind {
    /// Name the model calls the tool by
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Sql => SQL_TOOL,
            ToolKind::Graph => GRAPH_TOOL,
        }
    }

    /// Look up a domain tool by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            SQL_TOOL => Some(ToolKind::Sql),
            GRAPH_TOOL => Some(ToolKind::Graph),
            _ => None,
        }
    }

    /// Function definition offered to the model
    pub fn definition(self) -> ToolDefinition {
        match self {
            ToolKind::Sql => sql_tool(),
            ToolKind::Graph => graph_tool(),
        }
    }
}

/// What a tool invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Rows from `run_sql_query`.
    Rows(Vec<Row>),
    /// A visualization was written.
    Visualization {
        message: String,
        visualization: Visualization,
    },
    /// The graph query matched nothing drawable.
    NoGraph { message: String },
}

impl ToolOutput {
    /// Structured response recorded on the turn's event
    pub fn response(&self) -> Value {
        match self {
            ToolOutput::Rows(rows) => Value::Array(rows.iter().cloned().map(Value::Object).collect()),
            ToolOutput::Visualization { message, .. } | ToolOutput::NoGraph { message } => {
                Value::String(message.clone())
            }
        }
    }

    /// Content of the tool message sent back to the model
    pub fn model_content(&self) -> String {
        match self.response() {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }

    /// Artifact written by the graph tool, if any
    pub fn visualization(&self) -> Option<&Visualization> {
        match self {
            ToolOutput::Visualization { visualization, .. } => Some(visualization),
            _ => None,
        }
    }
}

/// Extract the `query` string from a tool call's JSON arguments.
pub fn query_argument(tool_name: &str, arguments: &str) -> AgentResult<String> {
    let invalid = |message: String| AgentError::InvalidArguments {
        tool_name: tool_name.to_string(),
        message,
    };

    let args: Value = serde_json::from_str(arguments)
        .map_err(|e| invalid(format!("arguments are not valid JSON: {}", e)))?;

    args.get("query")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid("missing string field 'query'".to_string()))
}

/// Executes domain tools against the configured database.
#[derive(Clone)]
pub struct ToolBox {
    executor: SharedExecutor,
    emitter: VisualizationEmitter,
}

impl ToolBox {
    /// Create a tool box
    pub fn new(executor: SharedExecutor, emitter: VisualizationEmitter) -> Self {
        Self { executor, emitter }
    }

    /// Run a domain tool with its query
    pub async fn execute(&self, kind: ToolKind, query: &str) -> AppResult<ToolOutput> {
        match kind {
            ToolKind::Sql => self.run_sql_query(query).await,
            ToolKind::Graph => self.run_graph_query_viz(query).await,
        }
    }

    /// Execute a tabular query and return its rows
    pub async fn run_sql_query(&self, query: &str) -> AppResult<ToolOutput> {
        let rows = self.executor.execute(query).await?;
        info!(tool = SQL_TOOL, rows = rows.len(), "Tool completed");
        Ok(ToolOutput::Rows(rows))
    }

    /// Execute a graph query and render its elements
    pub async fn run_graph_query_viz(&self, query: &str) -> AppResult<ToolOutput> {
        let rows = self.executor.execute(query).await?;

        match interpret(&rows) {
            GraphOutcome::Graph(graph) => {
                let visualization = self.emitter.emit(&graph).await?;
                info!(
                    tool = GRAPH_TOOL,
                    file = %visualization.file_name,
                    "Tool completed"
                );
                Ok(ToolOutput::Visualization {
                    message: visualization.message(),
                    visualization,
                })
            }
            empty => {
                let message = empty.empty_message().unwrap_or_default();
                warn!(tool = GRAPH_TOOL, rows = rows.len(), "No graph elements in result");
                Ok(ToolOutput::NoGraph { message })
            }
        }
    }
}
