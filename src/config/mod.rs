use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{AppError, DatabaseError};

/// Spanner instance holding the logistics database.
pub const SPANNER_INSTANCE_ID: &str = "tlvinst";

/// Logistics database inside [`SPANNER_INSTANCE_ID`].
pub const SPANNER_DATABASE_ID: &str = "tlvlog";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub request: RequestConfig,
    pub agent: AgentConfig,
    pub server: ServerConfig,
    pub visualization: VisualizationConfig,
    pub logging: LoggingConfig,
}

/// Which query backend the tools talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Spanner,
    Sqlite,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub spanner: SpannerConfig,
    pub sqlite_path: PathBuf,
    pub max_connections: u32,
}

/// Cloud Spanner connection settings.
///
/// The project is optional here; a missing project only fails once a
/// query is actually issued.
#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub project_id: Option<String>,
    pub instance_id: String,
    pub database_id: String,
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Re-read on every query so an external refresher can rotate the token.
    pub access_token_file: Option<PathBuf>,
}

/// Hosted language model configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// HTTP request configuration for model calls
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Agent turn limits
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_steps: u32,
    pub history_limit: usize,
}

/// HTTP listener and static file settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

/// Where rendered graphs go and how many are kept
#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    pub dir: PathBuf,
    pub max_files: usize,
    pub height_px: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from `.env` in the working directory and the process environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::load(None)
    }

    /// Load configuration, reading the given env file instead of `./.env`
    pub fn from_env_file(path: &Path) -> Result<Self, AppError> {
        Self::load(Some(path))
    }

    fn load(env_file: Option<&Path>) -> Result<Self, AppError> {
        // A missing env file is fine; real environment variables still apply
        match env_file {
            Some(path) => {
                let _ = dotenvy::from_path(path);
            }
            None => {
                let _ = dotenvy::dotenv();
            }
        }

        let backend = match env::var("DATABASE_BACKEND")
            .unwrap_or_else(|_| "spanner".to_string())
            .to_lowercase()
            .as_str()
        {
            "spanner" => DatabaseBackend::Spanner,
            "sqlite" => DatabaseBackend::Sqlite,
            other => {
                return Err(AppError::Config {
                    message: format!("Unknown DATABASE_BACKEND '{}' (expected spanner or sqlite)", other),
                })
            }
        };

        let database = DatabaseConfig {
            backend,
            spanner: SpannerConfig {
                project_id: non_empty_var("GOOGLE_CLOUD_PROJECT"),
                instance_id: SPANNER_INSTANCE_ID.to_string(),
                database_id: SPANNER_DATABASE_ID.to_string(),
                endpoint: env::var("SPANNER_ENDPOINT")
                    .unwrap_or_else(|_| "https://spanner.googleapis.com".to_string()),
                access_token: non_empty_var("GOOGLE_OAUTH_ACCESS_TOKEN"),
                access_token_file: non_empty_var("GOOGLE_OAUTH_ACCESS_TOKEN_FILE").map(PathBuf::from),
            },
            sqlite_path: PathBuf::from(
                env::var("SQLITE_PATH").unwrap_or_else(|_| "./data/logistics.db".to_string()),
            ),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5),
        };

        let llm = LlmConfig {
            api_key: non_empty_var("LLM_API_KEY").or_else(|| non_empty_var("GOOGLE_API_KEY")),
            base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
            }),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-3-pro-preview".to_string()),
        };

        let request = RequestConfig {
            timeout_ms: parse_var("REQUEST_TIMEOUT_MS", 60000),
            max_retries: parse_var("MAX_RETRIES", 0),
            retry_delay_ms: parse_var("RETRY_DELAY_MS", 1000),
        };

        let agent = AgentConfig {
            max_steps: parse_var::<u32>("AGENT_MAX_STEPS", 8).max(1),
            history_limit: parse_var("SESSION_HISTORY_LIMIT", 20),
        };

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000),
            static_dir: PathBuf::from(
                env::var("STATIC_DIR").unwrap_or_else(|_| "app/static".to_string()),
            ),
        };

        let visualization = VisualizationConfig {
            dir: PathBuf::from(
                env::var("VISUALIZATION_DIR").unwrap_or_else(|_| "visualizations".to_string()),
            ),
            max_files: parse_var("VISUALIZATION_MAX_FILES", 50),
            height_px: 600,
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            database,
            llm,
            request,
            agent,
            server,
            visualization,
            logging,
        })
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config {
                message: format!("Invalid listen address {}:{}: {}", self.host, self.port, e),
            })
    }
}

impl SpannerConfig {
    /// Resource path of the database, e.g. `projects/p/instances/i/databases/d`.
    ///
    /// Fails when `GOOGLE_CLOUD_PROJECT` was never provided.
    pub fn database_path(&self) -> Result<String, DatabaseError> {
        let project = self.project_id.as_deref().ok_or_else(|| DatabaseError::Configuration {
            message: "GOOGLE_CLOUD_PROJECT environment variable not set".to_string(),
        })?;

        Ok(format!(
            "projects/{}/instances/{}/databases/{}",
            project, self.instance_id, self.database_id
        ))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60000,
            max_retries: 0,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 8,
            history_limit: 20,
        }
    }
}

impl Default for SpannerConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            instance_id: SPANNER_INSTANCE_ID.to_string(),
            database_id: SPANNER_DATABASE_ID.to_string(),
            endpoint: "https://spanner.googleapis.com".to_string(),
            access_token: None,
            access_token_file: None,
        }
    }
}
