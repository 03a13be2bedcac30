//! Tracing setup for the two run modes.
//!
//! Single-shot runs keep stdout for the result and log quietly to stderr.
//! Interactive runs log to a file, since stderr shares the terminal with the
//! prompt.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

impl LogSink {
    /// Picks the sink for a run: stderr with a query, the log file without.
    pub fn for_run(single_shot: bool) -> Self {
        if single_shot {
            Self::Stderr
        } else {
            Self::File(log_file_path())
        }
    }

    /// Level used when `RUST_LOG` is unset.
    pub fn default_level(&self) -> &'static str {
        match self {
            Self::Stderr => "warn",
            Self::File(_) => "info",
        }
    }
}

/// Installs the global subscriber.
///
/// If the log file cannot be opened, a warning goes to stderr and the run
/// continues without logging.
pub fn init(sink: &LogSink) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(sink.default_level()));

    match sink {
        LogSink::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
        LogSink::File(path) => match open_log_file(path) {
            Ok(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init(),
            Err(e) => eprintln!("Warning: logging disabled, cannot open {}: {e}", path.display()),
        },
    }
}

/// Creates the log file and its directory, truncating earlier runs.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    File::create(path)
}

/// `sqltool/sqltool.log` under the state directory, else the config
/// directory, else the temp directory.
pub fn log_file_path() -> PathBuf {
    match dirs::state_dir().or_else(dirs::config_dir) {
        Some(base) => base.join("sqltool").join("sqltool.log"),
        None => std::env::temp_dir().join("sqltool.log"),
    }
}
