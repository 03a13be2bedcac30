//! sqltool - a guarded, read-only SQL client.

use db_sqltool::cli::Cli;
use db_sqltool::config::ConnectionConfig;
use db_sqltool::db::MySqlConnector;
use db_sqltool::error::{Result, SqlToolError};
use db_sqltool::logging::{self, LogSink};
use db_sqltool::shell::Shell;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();
    let query = cli.query_text();

    logging::init(&LogSink::for_run(query.is_some()));

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    let connector = MySqlConnector;
    let mut shell = Shell::new(config, &connector);
    let mut out = std::io::stdout().lock();

    let result = match query {
        Some(sql) => shell.run_once(&sql, &mut out).await,
        None => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let interrupt = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            shell.run_interactive(input, &mut out, interrupt).await
        }
    };

    // The shell prints everything except failures of its own output.
    if let Err(e) = result {
        error!("{}: {}", e.category(), e);
        if let SqlToolError::Io(_) = e {
            eprintln!("{e}");
        }
        std::process::exit(e.exit_code());
    }
}

/// Loads the config file and applies command-line overrides.
fn load_config(cli: &Cli) -> Result<ConnectionConfig> {
    let path = ConnectionConfig::resolve_path(cli.config_path());
    info!("Loading config from: {}", path.display());

    let mut config = ConnectionConfig::load_from_file(&path)?;
    config.apply(&cli.overrides()?);
    Ok(config)
}
