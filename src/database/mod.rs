//! Read-only query execution against the logistics database.
//!
//! Every call opens its own snapshot, runs one query, and returns the rows
//! as column-ordered JSON mappings. Nothing is shared between calls and
//! nothing is retried.

mod spanner;
mod sqlite;

pub use spanner::SpannerExecutor;
pub use sqlite::SqliteExecutor;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::error::DatabaseResult;

/// One result row: column name to decoded value, in declared column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Executes a single query string inside a read-only snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `query` and return every row. Errors are fatal for the caller.
    async fn execute(&self, query: &str) -> DatabaseResult<Vec<Row>>;
}

/// Shared executor handle used by the tools.
pub type SharedExecutor = Arc<dyn QueryExecutor>;

/// Build the executor selected by `DATABASE_BACKEND`.
pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<SharedExecutor> {
    match config.backend {
        DatabaseBackend::Spanner => {
            let executor = SpannerExecutor::new(&config.spanner)?;
            info!(endpoint = %config.spanner.endpoint, "Spanner executor ready");
            Ok(Arc::new(executor))
        }
        DatabaseBackend::Sqlite => {
            let executor = SqliteExecutor::open(&config.sqlite_path, config.max_connections).await?;
            info!(path = %config.sqlite_path.display(), "SQLite executor ready");
            Ok(Arc::new(executor))
        }
    }
}
