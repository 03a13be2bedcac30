//! Database abstraction layer for sqltool.
//!
//! Provides a trait-based interface for database operations so the executor
//! and the shell can run against MySQL or an in-memory mock interchangeably.

mod mock;
mod mysql;
mod types;

pub use mock::{FailingDatabaseClient, MockConnector, MockDatabaseClient, MockLog};
pub use mysql::{MySqlClient, MySqlConnector};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// A client wraps exactly one live session; statements such as `USE db`
/// affect every later statement run through the same client.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement and returns its result.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

/// Opens database clients from a connection descriptor.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a new client session.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>>;
}
