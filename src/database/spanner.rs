use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{QueryExecutor, Row};
use crate::config::SpannerConfig;
use crate::error::{DatabaseError, DatabaseResult};

/// Cloud Spanner executor speaking the REST API.
///
/// Each query creates a session, runs `executeSql` in a single-use strong
/// read-only transaction and deletes the session again.
#[derive(Clone)]
pub struct SpannerExecutor {
    client: Client,
    config: SpannerConfig,
    endpoint: String,
}

/// Spanner `ResultSet` as returned by `executeSql`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default)]
    pub metadata: Option<ResultSetMetadata>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetMetadata {
    #[serde(default)]
    pub row_type: Option<StructType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructType {
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: SpannerType,
}

/// Column type as described in result metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpannerType {
    pub code: String,
    #[serde(default)]
    pub array_element_type: Option<Box<SpannerType>>,
    #[serde(default)]
    pub struct_type: Option<StructType>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    name: String,
}

impl SpannerExecutor {
    /// Create an executor. The project is checked lazily on first query.
    pub fn new(config: &SpannerConfig) -> DatabaseResult<Self> {
        let client = Client::builder().build().map_err(DatabaseError::Http)?;

        Ok(Self {
            client,
            config: config.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Bearer token for one query. A token file takes precedence over the
    /// static token and is read fresh each time.
    async fn access_token(&self) -> DatabaseResult<Option<String>> {
        let Some(path) = &self.config.access_token_file else {
            return Ok(self.config.access_token.clone());
        };

        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DatabaseError::Configuration {
                    message: format!("Failed to read access token file {}: {}", path.display(), e),
                })?;

        let token = contents.trim();
        if token.is_empty() {
            return Err(DatabaseError::Configuration {
                message: format!("Access token file {} is empty", path.display()),
            });
        }
        Ok(Some(token.to_string()))
    }

    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> DatabaseResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                DatabaseError::Connection {
                    message: e.to_string(),
                }
            } else {
                DatabaseError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatabaseError::Query {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(response)
    }

    async fn create_session(&self, database: &str, token: Option<&str>) -> DatabaseResult<String> {
        let url = format!("{}/v1/{}/sessions", self.endpoint, database);
        let response = self
            .send(self.request(Method::POST, &url, token).json(&json!({})))
            .await?;

        let session: SessionResponse =
            response
                .json()
                .await
                .map_err(|e| DatabaseError::InvalidResultSet {
                    message: format!("Failed to parse session response: {}", e),
                })?;

        debug!(session = %session.name, "Spanner session created");
        Ok(session.name)
    }

    async fn execute_sql(
        &self,
        session: &str,
        query: &str,
        token: Option<&str>,
    ) -> DatabaseResult<ResultSet> {
        let url = format!("{}/v1/{}:executeSql", self.endpoint, session);
        let body = json!({
            "sql": query,
            "transaction": {
                "singleUse": {
                    "readOnly": { "strong": true }
                }
            }
        });

        let response = self
            .send(self.request(Method::POST, &url, token).json(&body))
            .await?;

        response
            .json()
            .await
            .map_err(|e| DatabaseError::InvalidResultSet {
                message: format!("Failed to parse result set: {}", e),
            })
    }

    async fn delete_session(&self, session: &str, token: Option<&str>) {
        let url = format!("{}/v1/{}", self.endpoint, session);
        if let Err(e) = self.send(self.request(Method::DELETE, &url, token)).await {
            warn!(session = %session, error = %e, "Failed to delete Spanner session");
        }
    }
}

#[async_trait]
impl QueryExecutor for SpannerExecutor {
    async fn execute(&self, query: &str) -> DatabaseResult<Vec<Row>> {
        let database = self.config.database_path()?;
        let token = self.access_token().await?;
        let token = token.as_deref();
        let start = Instant::now();

        let session = self.create_session(&database, token).await?;
        let result = self.execute_sql(&session, query, token).await;
        self.delete_session(&session, token).await;

        let rows = decode_result_set(result?)?;

        info!(
            rows = rows.len(),
            latency_ms = start.elapsed().as_millis(),
            "Spanner query completed"
        );

        Ok(rows)
    }
}

/// Turn a raw result set into column-ordered rows.
pub fn decode_result_set(result_set: ResultSet) -> DatabaseResult<Vec<Row>> {
    let fields = result_set
        .metadata
        .and_then(|m| m.row_type)
        .map(|t| t.fields)
        .unwrap_or_default();

    result_set
        .rows
        .into_iter()
        .map(|values| {
            if values.len() != fields.len() {
                return Err(DatabaseError::InvalidResultSet {
                    message: format!(
                        "Row has {} values but metadata declares {} columns",
                        values.len(),
                        fields.len()
                    ),
                });
            }

            let row: Row = fields
                .iter()
                .zip(values)
                .map(|(field, value)| (field.name.clone(), decode_value(&field.field_type, value)))
                .collect();
            Ok(row)
        })
        .collect()
}

/// Decode one wire value according to its declared type.
pub fn decode_value(ty: &SpannerType, value: Value) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    match ty.code.as_str() {
        // INT64 is transported as a decimal string
        "INT64" => match value {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::String(s)),
            other => other,
        },
        "JSON" => match value {
            Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
            other => other,
        },
        "ARRAY" => match (value, ty.array_element_type.as_deref()) {
            (Value::Array(items), Some(element)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| decode_value(element, item))
                    .collect(),
            ),
            (other, _) => other,
        },
        "STRUCT" => match (value, ty.struct_type.as_ref()) {
            (Value::Array(items), Some(struct_type)) => Value::Object(
                struct_type
                    .fields
                    .iter()
                    .zip(items)
                    .map(|(field, item)| (field.name.clone(), decode_value(&field.field_type, item)))
                    .collect(),
            ),
            (other, _) => other,
        },
        _ => value,
    }
}

/// Pull `error.message` out of a Google API error body when present.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
