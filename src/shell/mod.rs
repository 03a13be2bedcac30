//! Single-shot and interactive front ends.
//!
//! Both modes classify a query before any connection exists, so a rejected
//! statement never opens a session. Single-shot mode opens one session per
//! run and ends on the first failure; interactive mode opens a session on the
//! first admitted query, keeps it for the rest of the run, and reports
//! failures without leaving the loop.

mod command;
mod help;
mod table;

pub use command::InputCommand;
pub use help::{banner, rejection_notice, FAREWELL, HELP_TEXT, PROMPT};
pub use table::{format_result, ResultTable};

use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::db::{Connector, DatabaseClient};
use crate::error::{Result, SqlToolError};
use crate::query::{ExecutionResult, QueryExecutor};
use crate::safety::{AdmissionFilter, Classification};

/// Drives queries from the command line or a prompt to the database.
pub struct Shell<'c> {
    config: ConnectionConfig,
    connector: &'c dyn Connector,
    filter: AdmissionFilter,
    client: Option<Box<dyn DatabaseClient>>,
}

impl<'c> Shell<'c> {
    /// Creates a shell that opens sessions through `connector`.
    pub fn new(config: ConnectionConfig, connector: &'c dyn Connector) -> Self {
        Self {
            config,
            connector,
            filter: AdmissionFilter::new(),
            client: None,
        }
    }

    /// Returns true while an interactive session holds a connection.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Runs one query and reports the outcome.
    ///
    /// Any rejection or failure is printed and then returned, so the caller
    /// can end the process with a matching status. The session is closed
    /// before anything is printed.
    pub async fn run_once<W: Write>(&mut self, sql: &str, out: &mut W) -> Result<()> {
        if let Classification::Rejected(reason) = self.filter.classify(sql) {
            info!("Rejected single-shot query: {reason}");
            writeln!(out, "{}", rejection_notice(&reason))?;
            return Err(reason.into());
        }

        let client = match self.connector.connect(&self.config).await {
            Ok(client) => client,
            Err(e) => {
                writeln!(out, "Error: {e}")?;
                return Err(e);
            }
        };

        let execution = QueryExecutor::new(&*client).execute(sql).await;
        release(client).await;

        report(&execution, out)?;
        execution.into_result().map(|_| ())
    }

    /// Runs the read-evaluate-print loop until `exit`/`quit`, end of input,
    /// or `interrupt` resolves.
    ///
    /// The session is closed however the loop ends, including when the
    /// terminal itself fails.
    pub async fn run_interactive<R, W, I>(
        &mut self,
        input: R,
        out: &mut W,
        interrupt: I,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        I: Future<Output = ()>,
    {
        let outcome = self.prompt_loop(input, out, interrupt).await;
        self.disconnect().await;
        outcome
    }

    async fn prompt_loop<R, W, I>(&mut self, mut input: R, out: &mut W, interrupt: I) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        I: Future<Output = ()>,
    {
        writeln!(out, "{}", banner(&self.config))?;

        let mut buf = Vec::new();
        tokio::pin!(interrupt);

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            buf.clear();
            let read = tokio::select! {
                read = input.read_until(b'\n', &mut buf) => read?,
                _ = &mut interrupt => {
                    debug!("Interrupted at the prompt");
                    writeln!(out)?;
                    writeln!(out, "{FAREWELL}")?;
                    return Ok(());
                }
            };

            if read == 0 {
                debug!("End of input");
                writeln!(out)?;
                writeln!(out, "{FAREWELL}")?;
                return Ok(());
            }

            // A line that is not UTF-8 is never guessed at or sent.
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Discarding input line: {e}");
                    writeln!(out, "Error: input line is not valid UTF-8 ({e})")?;
                    writeln!(out)?;
                    continue;
                }
            };

            match InputCommand::parse(line) {
                InputCommand::Empty => continue,
                InputCommand::Exit => {
                    writeln!(out, "{FAREWELL}")?;
                    return Ok(());
                }
                InputCommand::Help => writeln!(out, "{HELP_TEXT}")?,
                InputCommand::Query(sql) => {
                    self.handle_query(&sql, out).await?;
                    writeln!(out)?;
                }
            }
        }
    }

    /// Runs one interactive query, reporting every failure in place.
    async fn handle_query<W: Write>(&mut self, sql: &str, out: &mut W) -> Result<()> {
        if let Classification::Rejected(reason) = self.filter.classify(sql) {
            info!("Rejected interactive query: {reason}");
            writeln!(out, "{}", rejection_notice(&reason))?;
            return Ok(());
        }

        let client = match self.session().await {
            Ok(client) => client,
            Err(e) => {
                writeln!(out, "Error: {e}")?;
                return Ok(());
            }
        };

        let execution = QueryExecutor::new(client).execute(sql).await;
        if let ExecutionResult::Error(e) = &execution {
            if e.is_connection_error() {
                warn!("Dropping session after connection failure");
                self.disconnect().await;
            }
        }

        report(&execution, out)
    }

    /// Returns the open session, connecting first if there is none.
    async fn session(&mut self) -> Result<&dyn DatabaseClient> {
        let client = match self.client.take() {
            Some(client) => client,
            None => {
                let client = self.connector.connect(&self.config).await?;
                info!("Connected to {}", self.config.display_string());
                client
            }
        };
        Ok(&**self.client.insert(client))
    }

    /// Closes the open session, if any.
    async fn disconnect(&mut self) {
        if let Some(client) = self.client.take() {
            release(client).await;
        }
    }
}

/// Closes a session; failure to close is logged, never surfaced.
async fn release(client: Box<dyn DatabaseClient>) {
    if let Err(e) = client.close().await {
        warn!("Failed to close connection: {e}");
    }
}

/// Prints the outcome of an execution.
fn report<W: Write>(execution: &ExecutionResult, out: &mut W) -> Result<()> {
    match execution {
        ExecutionResult::Success(outcome) => {
            writeln!(
                out,
                "{}",
                format_result(&outcome.result, outcome.execution_time)
            )?;
        }
        ExecutionResult::Rejected { reason, .. } => {
            writeln!(out, "{}", rejection_notice(reason))?;
        }
        ExecutionResult::Error(SqlToolError::Internal(msg)) => {
            writeln!(out, "Unexpected error: {msg}")?;
        }
        ExecutionResult::Error(e) => {
            writeln!(out, "Error: {e}")?;
        }
    }
    Ok(())
}
