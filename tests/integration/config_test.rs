//! Configuration loading and override precedence.

use db_sqltool::cli::Cli;
use db_sqltool::config::{ConnectionConfig, ConnectionOverrides, DEFAULT_PORT};
use clap::Parser;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_json_descriptor_with_cli_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"host": "db.internal", "user": "reader", "password": "s3cret", "database": "shop"}"#,
    )
    .unwrap();

    let cli = Cli::parse_from(["sqltool", "--config", path.to_str().unwrap(), "-d", "archive"]);
    let mut config = ConnectionConfig::load_from_file(
        &ConnectionConfig::resolve_path(cli.config_path()),
    )
    .unwrap();
    config.apply(&cli.overrides().unwrap());

    assert_eq!(config.host, "db.internal");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.user, "reader");
    assert_eq!(config.password, "s3cret");
    assert_eq!(config.database(), Some("archive"));
}

#[test]
fn test_toml_descriptor() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sqltool.toml");
    fs::write(&path, "host = \"127.0.0.1\"\nport = 3307\nuser = \"app\"\n").unwrap();

    let config = ConnectionConfig::load_from_file(&path).unwrap();
    assert_eq!(config.port, 3307);
    assert_eq!(config.database(), None);
    assert_eq!(config.display_string(), "app@127.0.0.1:3307");
}

#[test]
fn test_missing_descriptor_is_config_error() {
    let dir = tempdir().unwrap();
    let err = ConnectionConfig::load_from_file(&dir.path().join("absent.json")).unwrap_err();

    assert_eq!(err.category(), "Configuration Error");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_url_fills_what_flags_leave_unset() {
    let overrides = ConnectionOverrides {
        user: Some("flag-user".to_string()),
        ..ConnectionOverrides::default()
    }
    .or(ConnectionOverrides::from_connection_string("mysql://url-user:pw@h:3308/db").unwrap());

    let mut config = ConnectionConfig::default();
    config.apply(&overrides);

    assert_eq!(config.user, "flag-user");
    assert_eq!(config.host, "h");
    assert_eq!(config.port, 3308);
    assert_eq!(config.database(), Some("db"));
}
