//! File logging for the CLI.
//!
//! Logs go to a daily-rolling file so the chat output stays clean.

use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter (e.g. `debug`, `studymate_core=trace`).
pub const LOG_ENV: &str = "STUDYMATE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber writing to `<logs_dir>/studymate.log.YYYY-MM-DD`.
///
/// Keep the returned guard alive until exit; dropping it flushes the writer.
pub fn init(logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, "studymate.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::debug!("Logging to {:?}", logs_dir);
    Ok(guard)
}
