//! Integration tests for the `research` binary.
//! Runs the binary with assert_cmd against a real temp config and an
//! in-process axum backend. No mocks.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};

/// Serve `router` from a background thread; returns the base URL.
/// The listener is bound before the thread starts, so no startup race.
fn spawn_backend(router: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    format!("http://{}", addr)
}

fn research_router() -> Router {
    Router::new().route(
        "/research",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "topic": format!("Topic: {}", body["query"].as_str().unwrap_or_default()),
                "summary": "Test summary.",
                "sources": ["/docs/a.md", "/docs/b.md"],
                "tools_used": ["search"]
            }))
        }),
    )
}

/// Write a minimal YAML config to a temp file pointing at `endpoint`.
fn write_config(dir: &tempfile::TempDir, endpoint: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, format!("client:\n  endpoint: {}\n", endpoint)).unwrap();
    path
}

#[test]
fn cli_prints_result_for_positional_query() {
    let base = spawn_backend(research_router());
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, &base);

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config").arg(&config_path).arg("mars rovers");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Topic: mars rovers"))
        .stdout(predicate::str::contains("Test summary."))
        .stdout(predicate::str::contains("/docs/a.md"))
        .stdout(predicate::str::contains("/docs/b.md"))
        .stdout(predicate::str::contains("Tools used:"));
}

#[test]
fn cli_reads_query_from_stdin_with_env_config() {
    let base = spawn_backend(research_router());
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, &base);

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.env("RESEARCH_UI_CONFIG", &config_path)
        .write_stdin("deep sea vents\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Topic: deep sea vents"));
}

#[test]
fn cli_endpoint_flag_overrides_config() {
    let base = spawn_backend(research_router());
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, "http://127.0.0.1:9");

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config")
        .arg(&config_path)
        .arg("--endpoint")
        .arg(&base)
        .arg("override");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Topic: override"));
}

#[test]
fn cli_server_error_exits_nonzero_with_status() {
    let router = Router::new().route(
        "/research",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model quota exhausted") }),
    );
    let base = spawn_backend(router);
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, &base);

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config").arg(&config_path).arg("q");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Server error 503: model quota exhausted"));
}

#[test]
fn cli_backend_down_shows_connect_hint() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, &format!("http://127.0.0.1:{}", port));

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config").arg(&config_path).write_stdin("hello\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Could not connect to"))
        .stderr(predicate::str::contains(format!("127.0.0.1:{}/research", port)));
}

#[test]
fn cli_empty_query_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, "http://127.0.0.1:9");

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config").arg(&config_path).write_stdin("\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::is_match("(?i)no query").unwrap());
}

#[test]
fn cli_health_prints_backend_status() {
    let router = Router::new().route(
        "/",
        get(|| async { Json(json!({"status": "ok", "message": "running"})) }),
    );
    let base = spawn_backend(router);
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, &base);

    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config").arg(&config_path).arg("--health");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ok: running"));
}

#[test]
fn cli_missing_explicit_config_fails() {
    let mut cmd = Command::from(cargo_bin_cmd!("research"));
    cmd.arg("--config")
        .arg("/tmp/does-not-exist-ever/config.yaml")
        .arg("q");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
