//! Mock database clients for testing.
//!
//! Provide in-memory implementations that record what they were asked to do,
//! so tests can assert which statements reached the database and whether the
//! session was released.

use super::{ColumnInfo, Connector, DatabaseClient, QueryResult, Value};
use crate::config::ConnectionConfig;
use crate::error::{Result, SqlToolError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared record of what mock clients have done.
#[derive(Debug, Default)]
pub struct MockLog {
    executed: Mutex<Vec<String>>,
    connects: AtomicUsize,
    closes: AtomicUsize,
}

impl MockLog {
    /// Statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }

    /// Number of sessions opened.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of sessions closed.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn record(&self, sql: &str) {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }
    }
}

/// A canned answer for one statement.
#[derive(Debug, Clone)]
enum MockResponse {
    Result(QueryResult),
    Error(String),
}

/// A mock database client that returns predefined results.
///
/// Statements without a scripted response get a default: one text column for
/// `SELECT`, `SHOW`, `DESC`, `DESCRIBE` and `EXPLAIN`, a command result for
/// anything else.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    responses: HashMap<String, MockResponse>,
    log: Arc<MockLog>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result for an exact statement.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.responses
            .insert(sql.into(), MockResponse::Result(result));
        self
    }

    /// Scripts a database error for an exact statement.
    pub fn with_error(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(sql.into(), MockResponse::Error(message.into()));
        self
    }

    /// Returns the log shared with this client.
    pub fn log(&self) -> Arc<MockLog> {
        Arc::clone(&self.log)
    }

    fn default_response(sql: &str) -> QueryResult {
        let sql_upper = sql.trim().to_uppercase();
        let has_projection = ["SELECT", "SHOW", "DESC", "EXPLAIN"]
            .iter()
            .any(|prefix| sql_upper.starts_with(prefix));

        let result = if has_projection {
            QueryResult::with_data(
                vec![ColumnInfo::new("result", "TEXT")],
                vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            )
        } else {
            QueryResult::command(0)
        };
        result.with_execution_time(Duration::from_millis(1))
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.log.record(sql);

        match self.responses.get(sql) {
            Some(MockResponse::Result(result)) => Ok(result.clone()),
            Some(MockResponse::Error(message)) => Err(SqlToolError::query(message.clone())),
            None => Ok(Self::default_response(sql)),
        }
    }

    async fn close(&self) -> Result<()> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A database client whose every statement fails.
#[derive(Debug)]
pub struct FailingDatabaseClient {
    message: String,
    connection_lost: bool,
    log: Arc<MockLog>,
}

impl FailingDatabaseClient {
    /// Creates a client that fails every statement with a query error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            connection_lost: false,
            log: Arc::default(),
        }
    }

    /// Creates a client that fails every statement with a connection error.
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            connection_lost: true,
            ..Self::new(message)
        }
    }

    /// Returns the log shared with this client.
    pub fn log(&self) -> Arc<MockLog> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.log.record(sql);
        if self.connection_lost {
            Err(SqlToolError::connection(self.message.clone()))
        } else {
            Err(SqlToolError::query(self.message.clone()))
        }
    }

    async fn close(&self) -> Result<()> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// What a `MockConnector` hands out.
#[derive(Debug, Clone)]
enum ConnectBehavior {
    Mock(HashMap<String, MockResponse>),
    FailQueries { message: String, connection_lost: bool },
    Refuse(String),
}

/// Connector producing mock clients that all share one `MockLog`.
#[derive(Debug)]
pub struct MockConnector {
    behavior: ConnectBehavior,
    log: Arc<MockLog>,
}

impl MockConnector {
    /// Hands out clients scripted like `template`.
    pub fn new(template: MockDatabaseClient) -> Self {
        Self {
            behavior: ConnectBehavior::Mock(template.responses),
            log: template.log,
        }
    }

    /// Hands out clients that fail every statement with a query error.
    pub fn failing_queries(message: impl Into<String>) -> Self {
        Self {
            behavior: ConnectBehavior::FailQueries {
                message: message.into(),
                connection_lost: false,
            },
            log: Arc::default(),
        }
    }

    /// Hands out clients whose connection drops on every statement.
    pub fn dropping_connections(message: impl Into<String>) -> Self {
        Self {
            behavior: ConnectBehavior::FailQueries {
                message: message.into(),
                connection_lost: true,
            },
            log: Arc::default(),
        }
    }

    /// Refuses every connection attempt.
    pub fn refusing(message: impl Into<String>) -> Self {
        Self {
            behavior: ConnectBehavior::Refuse(message.into()),
            log: Arc::default(),
        }
    }

    /// Returns the log shared by every client this connector opens.
    pub fn log(&self) -> Arc<MockLog> {
        Arc::clone(&self.log)
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new(MockDatabaseClient::new())
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
        let log = Arc::clone(&self.log);
        match &self.behavior {
            ConnectBehavior::Refuse(message) => Err(SqlToolError::connection(message.clone())),
            ConnectBehavior::Mock(responses) => {
                log.connects.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(MockDatabaseClient {
                    responses: responses.clone(),
                    log,
                }))
            }
            ConnectBehavior::FailQueries {
                message,
                connection_lost,
            } => {
                log.connects.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(FailingDatabaseClient {
                    message: message.clone(),
                    connection_lost: *connection_lost,
                    log,
                }))
            }
        }
    }
}
