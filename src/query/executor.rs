//! Query execution behind the admission filter.
//!
//! Provides isolated query execution that can be tested independently
//! of the shell.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::db::{DatabaseClient, QueryResult};
use crate::error::SqlToolError;
use crate::safety::{AdmissionFilter, Classification, Rejection};

/// Query executor that classifies SQL and runs only what the filter admits.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
    filter: AdmissionFilter,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self {
            db,
            filter: AdmissionFilter::new(),
        }
    }

    /// Classifies and, if admitted, executes a query.
    ///
    /// The text is sent to the database unmodified. A rejected query
    /// never touches the client.
    pub async fn execute(&self, sql: &str) -> ExecutionResult {
        if let Classification::Rejected(reason) = self.filter.classify(sql) {
            debug!("Rejected query: {reason}");
            return ExecutionResult::Rejected {
                sql: sql.to_string(),
                reason,
            };
        }

        let start = Instant::now();
        match self.db.execute_query(sql).await {
            Ok(result) => ExecutionResult::Success(QueryOutcome {
                result,
                execution_time: start.elapsed(),
            }),
            Err(e) => {
                warn!("Query failed: {e}");
                ExecutionResult::Error(e)
            }
        }
    }
}

/// Result of executing a query.
#[derive(Debug)]
pub enum ExecutionResult {
    /// Query executed successfully.
    Success(QueryOutcome),
    /// Query refused by the admission filter.
    Rejected { sql: String, reason: Rejection },
    /// Query execution failed.
    Error(SqlToolError),
}

impl ExecutionResult {
    /// Converts the result into a plain `Result`.
    pub fn into_result(self) -> crate::error::Result<QueryOutcome> {
        match self {
            Self::Success(outcome) => Ok(outcome),
            Self::Rejected { reason, .. } => Err(SqlToolError::Rejected(reason)),
            Self::Error(e) => Err(e),
        }
    }
}

/// Successful query execution outcome.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The query result.
    pub result: QueryResult,
    /// Wall-clock time including the round trip.
    pub execution_time: Duration,
}
