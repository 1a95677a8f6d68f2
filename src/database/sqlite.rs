use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};
use tracing::info;

use super::{QueryExecutor, Row};
use crate::error::{DatabaseError, DatabaseResult};

/// Read-only executor over a local SQLite copy of the logistics tables.
#[derive(Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Open an existing database file in read-only mode
    pub async fn open(path: &Path, max_connections: u32) -> DatabaseResult<Self> {
        if !path.exists() {
            return Err(DatabaseError::Configuration {
                message: format!("SQLite database not found at {}", path.display()),
            });
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Failed to open {}: {}", path.display(), e),
            })?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute(&self, query: &str) -> DatabaseResult<Vec<Row>> {
        let start = Instant::now();

        // The transaction is the snapshot; it is never committed
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(query).fetch_all(&mut *tx).await?;
        tx.rollback().await?;

        let decoded = rows.iter().map(decode_row).collect::<DatabaseResult<Vec<_>>>()?;

        info!(
            rows = decoded.len(),
            latency_ms = start.elapsed().as_millis(),
            "SQLite query completed"
        );

        Ok(decoded)
    }
}

fn decode_row(row: &SqliteRow) -> DatabaseResult<Row> {
    let mut map = Row::new();

    for (idx, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            map.insert(column.name().to_string(), Value::Null);
            continue;
        }

        // Storage class of this value, not the declared column type
        let storage = raw.type_info().name().to_string();

        let value = match storage.as_str() {
            "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
            "REAL" => serde_json::Number::from_f64(row.try_get::<f64, _>(idx)?)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            "BLOB" => {
                let bytes = row.try_get::<Vec<u8>, _>(idx)?;
                Value::String(format!("<{} bytes>", bytes.len()))
            }
            _ => decode_text(row.try_get::<String, _>(idx)?),
        };

        map.insert(column.name().to_string(), value);
    }

    Ok(map)
}

/// Text holding a JSON object or array becomes a structure, so that
/// `json_object(...)` projections look like `TO_JSON(...)` results.
fn decode_text(text: String) -> Value {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Value>(&text) {
            return parsed;
        }
    }
    Value::String(text)
}
