//! Error types for sqltool.
//!
//! Defines the main error enum used throughout the application.

use crate::safety::Rejection;
use thiserror::Error;

/// Main error type for sqltool operations.
#[derive(Error, Debug)]
pub enum SqlToolError {
    /// Configuration errors (missing config file, malformed content, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection errors (host unreachable, access denied, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors reported by the database.
    #[error("Query error: {0}")]
    Query(String),

    /// Query refused by the admission filter before reaching the database.
    #[error("Query rejected: {0}")]
    Rejected(Rejection),

    /// Terminal input/output failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SqlToolError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Rejected(_) => "Policy Rejection",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if the error means the current connection is unusable.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Process exit status used when this error ends a single-shot run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Rejected(_) => 2,
            _ => 1,
        }
    }
}

impl From<Rejection> for SqlToolError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// Result type alias using SqlToolError.
pub type Result<T> = std::result::Result<T, SqlToolError>;
