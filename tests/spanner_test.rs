//! Integration tests for the Spanner REST executor
//!
//! Uses wiremock to stand in for the Spanner API: session creation,
//! `executeSql` and session deletion.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use logistics_chat::config::SpannerConfig;
use logistics_chat::database::{QueryExecutor, SpannerExecutor};
use logistics_chat::error::DatabaseError;

const DATABASE: &str = "projects/acme/instances/tlvinst/databases/tlvlog";
const SESSION: &str = "projects/acme/instances/tlvinst/databases/tlvlog/sessions/s-1";

fn create_executor(endpoint: &str, project: Option<&str>) -> SpannerExecutor {
    let config = SpannerConfig {
        project_id: project.map(String::from),
        endpoint: endpoint.to_string(),
        access_token: Some("token-123".to_string()),
        ..SpannerConfig::default()
    };
    SpannerExecutor::new(&config).expect("Failed to create executor")
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/sessions", DATABASE)))
        .and(header("Authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": SESSION})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1/{}", SESSION)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_query_runs_in_single_use_read_only_snapshot() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}:executeSql", SESSION)))
        .and(body_json(json!({
            "sql": "SELECT WarehouseId, Name FROM Warehouses ORDER BY WarehouseId",
            "transaction": {"singleUse": {"readOnly": {"strong": true}}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"rowType": {"fields": [
                {"name": "WarehouseId", "type": {"code": "INT64"}},
                {"name": "Name", "type": {"code": "STRING"}}
            ]}},
            "rows": [["1", "Central"], ["2", "North"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = create_executor(&server.uri(), Some("acme"));
    let rows = executor
        .execute("SELECT WarehouseId, Name FROM Warehouses ORDER BY WarehouseId")
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(
        serde_json::Value::Object(rows[0].clone()),
        json!({"WarehouseId": 1, "Name": "Central"})
    );
    let columns: Vec<&String> = rows[1].keys().collect();
    assert_eq!(columns, vec!["WarehouseId", "Name"]);
}

#[tokio::test]
async fn test_graph_projection_decodes_json_columns() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}:executeSql", SESSION)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"rowType": {"fields": [
                {"name": "s_node", "type": {"code": "JSON"}}
            ]}},
            "rows": [[
                "{\"identifier\":\"mUZpbkdyYXBoLldhcmVob3VzZXMAeJEC\",\"kind\":\"node\",\"labels\":[\"Warehouses\"],\"properties\":{\"Name\":\"Central\",\"WarehouseId\":1}}"
            ]]
        })))
        .mount(&server)
        .await;

    let executor = create_executor(&server.uri(), Some("acme"));
    let rows = executor
        .execute("GRAPH LogisticsGraph MATCH (s:Warehouses) RETURN TO_JSON(s) AS s_node")
        .await
        .unwrap();

    assert_eq!(rows[0]["s_node"]["labels"], json!(["Warehouses"]));
    assert_eq!(rows[0]["s_node"]["properties"]["Name"], "Central");
}

#[tokio::test]
async fn test_query_error_propagates_and_session_is_deleted() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/{}:executeSql", SESSION)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Table not found: Shipment [at 1:15]",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = create_executor(&server.uri(), Some("acme"));
    let result = executor.execute("SELECT * FROM Shipment").await;

    match result {
        Err(DatabaseError::Query { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Table not found: Shipment [at 1:15]");
        }
        other => panic!("expected query error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_project_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let executor = create_executor(&server.uri(), None);
    let result = executor.execute("SELECT 1").await;

    match result {
        Err(DatabaseError::Configuration { message }) => {
            assert_eq!(message, "GOOGLE_CLOUD_PROJECT environment variable not set");
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_token_file_is_read_for_each_query() {
    let server = MockServer::start().await;
    let token_dir = tempfile::tempdir().unwrap();
    let token_path = token_dir.path().join("token");

    for token in ["first-token", "second-token"] {
        let bearer = format!("Bearer {}", token);
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}/sessions", DATABASE)))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": SESSION})))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}:executeSql", SESSION)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/{}", SESSION)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let config = SpannerConfig {
        project_id: Some("acme".to_string()),
        endpoint: server.uri(),
        access_token: Some("token-123".to_string()),
        access_token_file: Some(token_path.clone()),
        ..SpannerConfig::default()
    };
    let executor = SpannerExecutor::new(&config).unwrap();

    std::fs::write(&token_path, "first-token\n").unwrap();
    executor.execute("SELECT 1").await.unwrap();

    std::fs::write(&token_path, "second-token\n").unwrap();
    executor.execute("SELECT 1").await.unwrap();
}

#[tokio::test]
async fn test_missing_token_file_is_configuration_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = SpannerConfig {
        project_id: Some("acme".to_string()),
        endpoint: server.uri(),
        access_token_file: Some("/nonexistent/spanner-token".into()),
        ..SpannerConfig::default()
    };
    let executor = SpannerExecutor::new(&config).unwrap();

    let result = executor.execute("SELECT 1").await;
    assert!(matches!(result, Err(DatabaseError::Configuration { .. })));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_connection_error() {
    // Nothing listens on port 9 locally
    let executor = create_executor("http://127.0.0.1:9", Some("acme"));
    let result = executor.execute("SELECT 1").await;

    assert!(matches!(result, Err(DatabaseError::Connection { .. })));
}
