//! Tests for configuration resolution
//!
//! Environment-variable tiers are not exercised here to keep tests
//! independent of ambient process state; precedence is covered through
//! CLI overrides, TOML files, and compiled defaults.

use minbar_common::config::{load_toml_config, Config, ConfigOverrides};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write");
    file
}

#[test]
fn test_compiled_defaults() {
    let config = Config::resolve(&ConfigOverrides::default()).unwrap();

    assert_eq!(config.port, 5730);
    assert_eq!(config.public_dir.to_str().unwrap(), "public");
    assert_eq!(config.probe_timeout_ms, 5000);
    assert_eq!(config.login_url, "/login");
    assert!(config.payment_api_url.starts_with("https://"));
}

#[test]
fn test_toml_file_overrides_defaults() {
    let file = write_toml(
        r#"
port = 8080
public_dir = "www"
probe_timeout_ms = 1500
payment_api_key = "sk_test_abc"
"#,
    );

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = Config::resolve(&overrides).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.public_dir.to_str().unwrap(), "www");
    assert_eq!(config.probe_timeout_ms, 1500);
    assert_eq!(config.payment_api_key.as_deref(), Some("sk_test_abc"));
    // Untouched fields keep their defaults
    assert_eq!(config.host, "127.0.0.1");
}

#[test]
fn test_cli_override_beats_toml() {
    let file = write_toml("port = 8080");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        port: Some(9999),
        ..Default::default()
    };
    let config = Config::resolve(&overrides).unwrap();

    assert_eq!(config.port, 9999);
}

#[test]
fn test_explicit_config_file_must_parse() {
    let file = write_toml("port = \"not a number\"");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(Config::resolve(&overrides).is_err());
}

#[test]
fn test_explicit_config_file_must_exist() {
    let overrides = ConfigOverrides {
        config_file: Some("/nonexistent/minbar.toml".into()),
        ..Default::default()
    };
    assert!(Config::resolve(&overrides).is_err());
}

#[test]
fn test_load_toml_config_partial() {
    let file = write_toml("geoip_api_url = \"http://geo.example/json\"");

    let parsed = load_toml_config(file.path()).unwrap();
    assert_eq!(
        parsed.geoip_api_url.as_deref(),
        Some("http://geo.example/json")
    );
    assert!(parsed.port.is_none());
}
