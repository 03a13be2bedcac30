//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient` trait
//! for MySQL-compatible servers using sqlx.

use crate::config::{ConnectionConfig, CHARSET};
use crate::db::{ColumnInfo, Connector, DatabaseClient, QueryResult, Row, Value};
use crate::error::{Result, SqlToolError};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError, MySqlRow};
use sqlx::{
    Column as SqlxColumn, ConnectOptions, Connection, Either, Executor, Row as SqlxRow, Statement,
    TypeInfo,
};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Connector that opens real MySQL sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
        let client = MySqlClient::connect(config).await?;
        Ok(Box::new(client))
    }
}

/// MySQL database client.
///
/// Holds a single connection rather than a pool so that session state
/// (the database selected with `USE`) carries over between statements.
#[derive(Debug)]
pub struct MySqlClient {
    conn: Mutex<Option<MySqlConnection>>,
}

impl MySqlClient {
    /// Opens a connection using the given descriptor.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .charset(CHARSET);
        if let Some(database) = config.database() {
            options = options.database(database);
        }

        debug!("Connecting to {}", config.display_string());
        let conn = options
            .connect()
            .await
            .map_err(|e| map_connection_error(e, config))?;
        debug!("Successfully connected to database");

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Recovers column metadata for a statement that returned no rows.
    ///
    /// Preparing the statement is the only way to see its projection without
    /// data. Returns `None` when the server refuses to prepare it, as for
    /// `USE` or a multi-statement batch.
    async fn describe_columns(conn: &mut MySqlConnection, sql: &str) -> Option<Vec<ColumnInfo>> {
        match (&mut *conn).prepare(sql).await {
            Ok(statement) => Some(
                statement
                    .columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect(),
            ),
            Err(e) => {
                debug!("Statement cannot be described: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| SqlToolError::connection("Connection is closed"))?;

        let start = Instant::now();

        // Text protocol: also runs statements MySQL refuses to prepare.
        let mut stream = sqlx::raw_sql(sql).fetch_many(&mut *conn);
        let mut mysql_rows: Vec<MySqlRow> = Vec::new();
        let mut rows_affected = 0;
        let mut result_sets = 0usize;

        while let Some(item) = stream
            .try_next()
            .await
            .map_err(classify_execution_error)?
        {
            match item {
                Either::Left(done) => {
                    if result_sets == 0 {
                        rows_affected = done.rows_affected();
                    }
                    result_sets += 1;
                }
                Either::Right(row) if result_sets == 0 => mysql_rows.push(row),
                Either::Right(_) => {}
            }
        }
        drop(stream);

        if result_sets > 1 {
            warn!(
                "Statement produced {} result sets; only the first is shown",
                result_sets
            );
        }

        let execution_time = start.elapsed();

        let mut result = match mysql_rows.first() {
            Some(first_row) => {
                let columns = first_row
                    .columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect();
                let rows: Vec<Row> = mysql_rows.iter().map(convert_row).collect();
                QueryResult::with_data(columns, rows)
            }
            None => {
                let described = Self::describe_columns(conn, sql).await;
                rowless_result(sql, described, rows_affected)
            }
        };
        result.rows_affected = rows_affected;

        debug!(
            "Query returned {} rows and {} columns in {:?}",
            result.row_count,
            result.columns.len(),
            execution_time
        );

        Ok(result.with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        if let Some(conn) = self.conn.lock().await.take() {
            conn.close()
                .await
                .map_err(|e| SqlToolError::connection(e.to_string()))?;
            debug!("Connection closed");
        }
        Ok(())
    }
}

/// Statements whose first result set is a table even when it has no rows.
const ROW_PRODUCING: &[&str] = &["SELECT", "SHOW", "DESC", "EXPLAIN"];

fn yields_rows(sql: &str) -> bool {
    let upper = sql.trim_start().to_uppercase();
    ROW_PRODUCING.iter().any(|keyword| upper.starts_with(keyword))
}

/// Shapes the result of a statement whose first result set had no rows.
///
/// Described columns make an empty result set and an empty description makes
/// a command. A statement the server would not describe is still an empty
/// result set, with unknown columns, if it starts with a row-producing
/// keyword.
fn rowless_result(
    sql: &str,
    described: Option<Vec<ColumnInfo>>,
    rows_affected: u64,
) -> QueryResult {
    match described {
        Some(columns) if !columns.is_empty() => QueryResult::with_data(columns, Vec::new()),
        None if yields_rows(sql) => QueryResult::with_data(Vec::new(), Vec::new()),
        _ => QueryResult::command(rows_affected),
    }
}

/// Converts a MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a text-protocol row.
///
/// Text-protocol values arrive as the server's textual rendering, so the raw
/// bytes are read once and interpreted according to the column type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let bytes = match row.try_get_unchecked::<Option<Vec<u8>>, _>(index) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Value::Null,
        Err(e) => {
            warn!("Failed to read column {index}: {e}");
            return Value::Null;
        }
    };

    value_from_text(bytes, type_name)
}

/// Interprets a textual column value according to its MySQL type name.
fn value_from_text(bytes: Vec<u8>, type_name: &str) -> Value {
    let type_name = type_name.to_uppercase();

    match type_name.as_str() {
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT"
        | "GEOMETRY" => return Value::Bytes(bytes),
        _ => {}
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => return Value::Bytes(e.into_bytes()),
    };

    match type_name.as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" | "BOOLEAN" => text
            .parse()
            .map(Value::Int)
            .unwrap_or(Value::String(text)),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => text
            .parse()
            .map(Value::UInt)
            .unwrap_or(Value::String(text)),

        "FLOAT" | "DOUBLE" => text
            .parse()
            .map(Value::Float)
            .unwrap_or(Value::String(text)),

        "DECIMAL" => Value::Decimal(text),

        "DATE" | "TIME" | "DATETIME" | "TIMESTAMP" => Value::Temporal(text),

        _ => Value::String(text),
    }
}

/// Maps sqlx connection errors to user-friendly messages.
///
/// The driver's own text is always kept so nothing the server said is lost.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> SqlToolError {
    let host = &config.host;
    let port = config.port;
    let raw = error.to_string();
    let lower = raw.to_lowercase();

    if lower.contains("connection refused") || lower.contains("error connecting") {
        SqlToolError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running. ({raw})"
        ))
    } else if lower.contains("access denied") {
        SqlToolError::connection(format!(
            "Access denied for user '{}'. Check your credentials. ({raw})",
            config.user
        ))
    } else if lower.contains("unknown database") {
        SqlToolError::connection(format!(
            "Database '{}' does not exist. ({raw})",
            config.database
        ))
    } else {
        SqlToolError::connection(raw)
    }
}

/// Sorts an execution failure into a connection, query, or unexpected error.
fn classify_execution_error(error: sqlx::Error) -> SqlToolError {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => {
            SqlToolError::connection(error.to_string())
        }
        sqlx::Error::Database(_) => SqlToolError::query(format_query_error(error)),
        other => SqlToolError::internal(format!("Unexpected driver error: {other}")),
    }
}

/// Formats a query error the way the mysql command-line client does.
fn format_query_error(error: sqlx::Error) -> String {
    if let Some(db_error) = error.as_database_error() {
        if let Some(mysql_error) = db_error.try_downcast_ref::<MySqlDatabaseError>() {
            return match mysql_error.code() {
                Some(state) => format!(
                    "ERROR {} ({}): {}",
                    mysql_error.number(),
                    state,
                    mysql_error.message()
                ),
                None => format!("ERROR {}: {}", mysql_error.number(), mysql_error.message()),
            };
        }
        return db_error.message().to_string();
    }

    error.to_string()
}
