//! Config environment variable tests
//!
//! These tests verify that Config::from_env() reads and applies environment
//! variable overrides. Config::from_env() also loads a .env file via dotenvy,
//! which never overrides variables that are already set.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use logistics_chat::config::{Config, DatabaseBackend, LogFormat};
use serial_test::serial;
use std::env;
use std::io::Write;

#[test]
#[serial]
fn test_config_from_env_loads_successfully() {
    env::remove_var("DATABASE_BACKEND");
    let result = Config::from_env();
    assert!(result.is_ok(), "Config::from_env() should succeed without a backend override");
}

#[test]
#[serial]
fn test_config_spanner_settings() {
    env::set_var("GOOGLE_CLOUD_PROJECT", "acme-logistics");
    env::set_var("SPANNER_ENDPOINT", "http://localhost:9020");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database.backend, DatabaseBackend::Spanner);
    assert_eq!(
        config.database.spanner.database_path().unwrap(),
        "projects/acme-logistics/instances/tlvinst/databases/tlvlog"
    );
    assert_eq!(config.database.spanner.endpoint, "http://localhost:9020");

    env::remove_var("GOOGLE_CLOUD_PROJECT");
    env::remove_var("SPANNER_ENDPOINT");
}

#[test]
#[serial]
fn test_config_blank_project_is_unset() {
    env::set_var("GOOGLE_CLOUD_PROJECT", "  ");

    let config = Config::from_env().unwrap();
    assert!(config.database.spanner.project_id.is_none());
    assert!(config.database.spanner.database_path().is_err());

    env::remove_var("GOOGLE_CLOUD_PROJECT");
}

#[test]
#[serial]
fn test_config_sqlite_backend() {
    env::set_var("DATABASE_BACKEND", "SQLite");
    env::set_var("SQLITE_PATH", "/custom/logistics.db");
    env::set_var("DATABASE_MAX_CONNECTIONS", "10");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
    assert_eq!(
        config.database.sqlite_path.to_str().unwrap(),
        "/custom/logistics.db"
    );
    assert_eq!(config.database.max_connections, 10);

    env::remove_var("DATABASE_BACKEND");
    env::remove_var("SQLITE_PATH");
    env::remove_var("DATABASE_MAX_CONNECTIONS");
}

#[test]
#[serial]
fn test_config_unknown_backend_is_an_error() {
    env::set_var("DATABASE_BACKEND", "postgres");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("Unknown DATABASE_BACKEND 'postgres'"));

    env::remove_var("DATABASE_BACKEND");
}

#[test]
#[serial]
fn test_config_llm_key_fallback() {
    env::remove_var("LLM_API_KEY");
    env::set_var("GOOGLE_API_KEY", "google-key");

    let config = Config::from_env().unwrap();
    assert_eq!(config.llm.api_key.as_deref(), Some("google-key"));

    env::set_var("LLM_API_KEY", "primary-key");
    let config = Config::from_env().unwrap();
    assert_eq!(config.llm.api_key.as_deref(), Some("primary-key"));

    env::remove_var("LLM_API_KEY");
    env::remove_var("GOOGLE_API_KEY");
}

#[test]
#[serial]
fn test_config_llm_model_override() {
    env::set_var("LLM_MODEL", "gemini-2.5-flash");
    env::set_var("LLM_BASE_URL", "http://localhost:4000/v1");

    let config = Config::from_env().unwrap();
    assert_eq!(config.llm.model, "gemini-2.5-flash");
    assert_eq!(config.llm.base_url, "http://localhost:4000/v1");

    env::remove_var("LLM_MODEL");
    env::remove_var("LLM_BASE_URL");
}

#[test]
#[serial]
fn test_config_from_env_custom_request() {
    env::set_var("REQUEST_TIMEOUT_MS", "30000");
    env::set_var("MAX_RETRIES", "2");
    env::set_var("RETRY_DELAY_MS", "250");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 30000);
    assert_eq!(config.request.max_retries, 2);
    assert_eq!(config.request.retry_delay_ms, 250);

    env::remove_var("REQUEST_TIMEOUT_MS");
    env::remove_var("MAX_RETRIES");
    env::remove_var("RETRY_DELAY_MS");
}

#[test]
#[serial]
fn test_config_agent_and_visualization() {
    env::set_var("AGENT_MAX_STEPS", "4");
    env::set_var("SESSION_HISTORY_LIMIT", "6");
    env::set_var("VISUALIZATION_DIR", "/tmp/viz");
    env::set_var("VISUALIZATION_MAX_FILES", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.agent.max_steps, 4);
    assert_eq!(config.agent.history_limit, 6);
    assert_eq!(config.visualization.dir.to_str().unwrap(), "/tmp/viz");
    assert_eq!(config.visualization.max_files, 0);
    assert_eq!(config.visualization.height_px, 600);

    env::remove_var("AGENT_MAX_STEPS");
    env::remove_var("SESSION_HISTORY_LIMIT");
    env::remove_var("VISUALIZATION_DIR");
    env::remove_var("VISUALIZATION_MAX_FILES");
}

#[test]
#[serial]
fn test_config_invalid_number_uses_default() {
    env::set_var("PORT", "not-a-number");
    env::set_var("AGENT_MAX_STEPS", "-1");

    let config = Config::from_env().unwrap();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.agent.max_steps, 8);

    env::remove_var("PORT");
    env::remove_var("AGENT_MAX_STEPS");
}

#[test]
#[serial]
fn test_config_zero_max_steps_is_clamped() {
    env::set_var("AGENT_MAX_STEPS", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.agent.max_steps, 1);

    env::remove_var("AGENT_MAX_STEPS");
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    env::set_var("LOG_FORMAT", "JSON");
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "debug");

    env::remove_var("LOG_FORMAT");
    env::remove_var("LOG_LEVEL");
}

#[test]
#[serial]
fn test_config_from_env_file() {
    env::remove_var("STATIC_DIR");
    env::remove_var("HOST");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "STATIC_DIR=/srv/logistics/static").unwrap();
    writeln!(file, "HOST=127.0.0.1").unwrap();

    let config = Config::from_env_file(file.path()).unwrap();
    assert_eq!(
        config.server.static_dir.to_str().unwrap(),
        "/srv/logistics/static"
    );
    assert_eq!(config.server.bind_addr().unwrap().to_string(), "127.0.0.1:8000");

    env::remove_var("STATIC_DIR");
    env::remove_var("HOST");
}
