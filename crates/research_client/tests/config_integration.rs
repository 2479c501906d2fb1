//! Integration tests for config load/save against real files in a temp dir.

use research_client::config::{self, ConfigLocation};
use research_client::{Config, DEFAULT_ENDPOINT};
use predicates::prelude::*;

#[test]
fn load_existing_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        r#"
client:
  endpoint: "http://research.internal:8080"
"#,
    )
    .unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(
        cfg.client.endpoint.as_deref(),
        Some("http://research.internal:8080")
    );
    assert_eq!(cfg.endpoint(), "http://research.internal:8080");
}

#[test]
fn empty_file_uses_default_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "{}\n").unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);
}

#[test]
fn save_creates_directory_and_file_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("research-ui");
    let config_path = config_dir.join("config.yaml");
    assert!(!config_dir.exists(), "config dir should not exist yet");

    let mut cfg = Config::default();
    cfg.set_endpoint("http://127.0.0.1:8123");

    config::save(&config_path, &cfg).expect("save should succeed");
    let pred = predicates::path::exists();
    assert!(pred.eval(&config_path), "config file should exist after save");

    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(predicates::str::contains("client:").eval(&contents));
    assert!(predicates::str::contains("http://127.0.0.1:8123").eval(&contents));

    let reloaded = config::load(&config_path).expect("reload should succeed");
    assert_eq!(reloaded, cfg);
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "client: [unterminated\n").unwrap();

    let err = config::load(&config_path).expect_err("load should fail");
    assert!(predicate::str::starts_with("invalid config").eval(&err.to_string()));
}

#[test]
fn missing_default_file_yields_defaults_but_explicit_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let implicit = ConfigLocation {
        path: path.clone(),
        explicit: false,
    };
    let cfg = config::load_or_default(&implicit).expect("defaults for implicit path");
    assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);

    let explicit = ConfigLocation {
        path,
        explicit: true,
    };
    let err = config::load_or_default(&explicit).expect_err("explicit path must exist");
    assert!(predicate::str::is_match("(?i)io error").unwrap().eval(&err.to_string()));
}

/// Config path resolves to `~/.research-ui/config.yaml` using the current platform's home dir.
/// HOME is pointed at a temp dir to verify the resolution.
#[test]
fn default_config_path_uses_home_directory() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap().to_string();

    let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let original = std::env::var(key).ok();

    std::env::set_var(key, &home);
    let path = config::default_config_path();
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }

    let path = path.expect("should resolve a config path");
    let expected = dir.path().join(".research-ui").join("config.yaml");
    assert_eq!(path, expected);
}
