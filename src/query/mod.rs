//! Query execution for sqltool.
//!
//! This module isolates classification-gated SQL execution from the shell.

pub mod executor;

pub use executor::{ExecutionResult, QueryExecutor, QueryOutcome};
