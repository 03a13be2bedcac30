//! End-to-end shell sessions against mock connectors.

use db_sqltool::config::ConnectionConfig;
use db_sqltool::db::{ColumnInfo, MockConnector, MockDatabaseClient, QueryResult, Value};
use db_sqltool::error::SqlToolError;
use db_sqltool::shell::{Shell, FAREWELL, PROMPT};
use pretty_assertions::assert_eq;
use std::future::pending;

fn shop() -> MockDatabaseClient {
    MockDatabaseClient::new()
        .with_result(
            "SHOW TABLES",
            QueryResult::with_data(
                vec![ColumnInfo::new("Tables_in_shop", "VARCHAR")],
                vec![vec![Value::from("users")]],
            ),
        )
        .with_result(
            "SELECT id, total FROM orders WHERE id = 0",
            QueryResult::with_data(
                vec![ColumnInfo::new("id", "INT"), ColumnInfo::new("total", "DECIMAL")],
                vec![],
            ),
        )
        .with_result(
            "SELECT id, total FROM orders",
            QueryResult::with_data(
                vec![ColumnInfo::new("id", "INT"), ColumnInfo::new("total", "DECIMAL")],
                vec![
                    vec![Value::Int(1), Value::Decimal("9.50".to_string())],
                    vec![Value::Int(2), Value::Null],
                ],
            ),
        )
        .with_error(
            "SELECT * FROM missing",
            "ERROR 1146 (42S02): Table 'shop.missing' doesn't exist",
        )
}

fn shop_config() -> ConnectionConfig {
    ConnectionConfig {
        database: "shop".to_string(),
        ..ConnectionConfig::default()
    }
}

async fn single_shot(connector: &MockConnector, sql: &str) -> (String, Result<(), SqlToolError>) {
    let mut shell = Shell::new(shop_config(), connector);
    let mut out = Vec::new();
    let result = shell.run_once(sql, &mut out).await;
    (String::from_utf8(out).unwrap(), result)
}

#[tokio::test]
async fn test_single_shot_show_tables() {
    let connector = MockConnector::new(shop());
    let (output, result) = single_shot(&connector, "SHOW TABLES").await;

    assert!(result.is_ok());
    let table: Vec<&str> = output.lines().take(5).collect();
    assert_eq!(
        table,
        vec![
            "+----------------+",
            "| Tables_in_shop |",
            "+================+",
            "| users          |",
            "+----------------+",
        ]
    );
    assert!(output.contains("1 row returned"));
}

#[tokio::test]
async fn test_single_shot_table_alignment_and_null() {
    let connector = MockConnector::new(shop());
    let (output, _) = single_shot(&connector, "SELECT id, total FROM orders").await;

    assert!(output.contains("|  1 |  9.50 |"));
    assert!(output.contains("|  2 | NULL  |"));
    assert!(output.contains("2 rows returned"));
}

#[tokio::test]
async fn test_single_shot_empty_set_names_columns() {
    let connector = MockConnector::new(shop());
    let (output, result) =
        single_shot(&connector, "SELECT id, total FROM orders WHERE id = 0").await;

    assert!(result.is_ok());
    assert!(output.starts_with("Query OK, but no rows were returned (columns: id, total)"));
}

#[tokio::test]
async fn test_single_shot_rejections_exit_with_policy_status() {
    for sql in ["DROP TABLE t", "DELETE FROM t WHERE id=1", "select * from t where created_at > 0"] {
        let connector = MockConnector::new(shop());
        let (output, result) = single_shot(&connector, sql).await;

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 2, "{sql}");
        assert!(output.starts_with("Rejected: "), "{sql}");
        assert_eq!(connector.log().connects(), 0, "{sql}");
    }
}

#[tokio::test]
async fn test_single_shot_server_error_is_reported() {
    let connector = MockConnector::new(shop());
    let (output, result) = single_shot(&connector, "SELECT * FROM missing").await;

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(output.contains("ERROR 1146 (42S02)"));
    assert_eq!(connector.log().closes(), 1);
}

#[tokio::test]
async fn test_interactive_session_transcript() {
    let connector = MockConnector::new(shop());
    let mut shell = Shell::new(shop_config(), &connector);
    let mut out = Vec::new();

    let input = "\
SHOW TABLES
UPDATE users SET name = 'x'
SELECT * FROM missing

SELECT id, total FROM orders WHERE id = 0
EXIT
SHOW TABLES
";
    shell
        .run_interactive(input.as_bytes(), &mut out, pending())
        .await
        .unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("Target: localhost:3306"));
    assert!(output.contains("Tables_in_shop"));
    assert!(output.contains("Rejected: only read-only statements are permitted"));
    assert!(output.contains("Error: Query error: ERROR 1146"));
    assert!(output.contains("Query OK, but no rows were returned"));
    assert!(output.trim_end().ends_with(FAREWELL));

    // Four statements, the blank line and EXIT each follow a prompt.
    assert_eq!(output.matches(PROMPT).count(), 6);

    let log = connector.log();
    assert_eq!(
        log.executed(),
        vec![
            "SHOW TABLES",
            "SELECT * FROM missing",
            "SELECT id, total FROM orders WHERE id = 0",
        ]
    );
    assert_eq!(log.connects(), 1);
    assert_eq!(log.closes(), 1);
}

#[tokio::test]
async fn test_interactive_only_rejections_never_connect() {
    let connector = MockConnector::new(shop());
    let mut shell = Shell::new(shop_config(), &connector);
    let mut out = Vec::new();

    shell
        .run_interactive(
            "TRUNCATE t\nGRANT ALL ON *.* TO x\nhelp\n".as_bytes(),
            &mut out,
            pending(),
        )
        .await
        .unwrap();

    assert_eq!(connector.log().connects(), 0);
    assert!(!shell.is_connected());
}
