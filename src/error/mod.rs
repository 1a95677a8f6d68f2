use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Visualization error: {0}")]
    Visualization(#[from] VisualizationError),
}

/// Query execution errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database configuration error: {message}")]
    Configuration { message: String },

    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {status} - {message}")]
    Query { status: u16, message: String },

    #[error("Invalid result set: {message}")]
    InvalidResultSet { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Hosted language model errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM not configured: {message}")]
    NotConfigured { message: String },

    #[error("LLM unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while driving an agent turn
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid arguments for {tool_name}: {message}")]
    InvalidArguments { tool_name: String, message: String },

    #[error("Model returned no choices")]
    EmptyResponse,

    #[error("Turn exceeded {max_steps} model steps without a final answer")]
    StepLimitExceeded { max_steps: u32 },
}

/// Rendering and file handling errors for graph visualizations
#[derive(Debug, Error)]
pub enum VisualizationError {
    #[error("Cannot render an empty graph")]
    EmptyGraph,

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for query execution
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Result type alias for model calls
pub type LlmResult<T> = Result<T, LlmError>;

/// Result type alias for agent turns
pub type AgentResult<T> = Result<T, AgentError>;

/// Result type alias for visualization output
pub type VisualizationResult<T> = Result<T, VisualizationError>;
