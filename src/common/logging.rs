//! Logging and tracing configuration
//!
//! Console logs go to stderr so stdout stays clean for reports (and for
//! `--json` output). A file log can be enabled in the config.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// File name of the run log inside the log directory
const LOG_FILE_NAME: &str = "webscenario.log";

/// Keeps the file writer alive; logs are flushed when this is dropped
pub struct LogGuard {
    _file: Option<WorkerGuard>,
    pub log_path: Option<PathBuf>,
}

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate (DEBUG with `verbose`), WARN for dependencies.
pub fn init_cli(verbose: bool, to_file: bool) -> LogGuard {
    let default_directive = if verbose {
        "webscenario=debug,warn"
    } else {
        "webscenario=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if to_file {
        match paths::ensure_log_dir() {
            Ok(Some(log_dir)) => {
                let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(stderr_layer)
                    .with(file_layer)
                    .init();

                return LogGuard {
                    _file: Some(guard),
                    log_path: Some(log_dir.join(LOG_FILE_NAME)),
                };
            }
            Ok(None) => eprintln!("Warning: no data directory available for log file"),
            Err(e) => eprintln!("Warning: Could not create log directory: {}", e),
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    LogGuard {
        _file: None,
        log_path: None,
    }
}
