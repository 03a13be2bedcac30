//! Tests against a live MySQL server.
//!
//! Skipped unless DATABASE_URL is set, e.g.
//! `DATABASE_URL=mysql://root:pw@localhost:3306/test cargo test --test integration_tests`

use db_sqltool::config::{ConnectionConfig, ConnectionOverrides};
use db_sqltool::db::{Connector, DatabaseClient, MySqlConnector, Value};
use db_sqltool::shell::Shell;

fn live_config() -> Option<ConnectionConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let overrides = ConnectionOverrides::from_connection_string(&url).ok()?;
    let mut config = ConnectionConfig::default();
    config.apply(&overrides);
    Some(config)
}

#[tokio::test]
async fn test_live_select_literal() {
    let Some(config) = live_config() else {
        eprintln!("Skipping: DATABASE_URL not set");
        return;
    };

    let client = MySqlConnector.connect(&config).await.unwrap();
    let result = client.execute_query("SELECT 1 AS one, NULL AS nothing").await.unwrap();
    client.close().await.unwrap();

    assert_eq!(result.column_names(), vec!["one", "nothing"]);
    assert_eq!(result.rows, vec![vec![Value::Int(1), Value::Null]]);
}

#[tokio::test]
async fn test_live_use_persists_in_session() {
    let Some(config) = live_config() else {
        eprintln!("Skipping: DATABASE_URL not set");
        return;
    };

    let client = MySqlConnector.connect(&config).await.unwrap();
    let used = client.execute_query("USE information_schema").await.unwrap();
    assert!(used.is_command());

    let current = client.execute_query("SELECT DATABASE()").await.unwrap();
    client.close().await.unwrap();

    assert_eq!(
        current.rows[0][0],
        Value::String("information_schema".to_string())
    );
}

#[tokio::test]
async fn test_live_unknown_table_is_query_error() {
    let Some(config) = live_config() else {
        eprintln!("Skipping: DATABASE_URL not set");
        return;
    };

    let connector = MySqlConnector;
    let mut shell = Shell::new(config, &connector);
    let mut out = Vec::new();

    let err = shell
        .run_once("SELECT * FROM sqltool_no_such_table", &mut out)
        .await
        .unwrap_err();

    assert!(!err.is_connection_error());
    assert!(String::from_utf8(out).unwrap().contains("ERROR 1146"));
}
