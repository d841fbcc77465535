//! Log file setup
//!
//! Logs go to a file in the data directory so that stdout only carries the
//! rendered report. `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Level used when `--verbose` is passed
const VERBOSE_LEVEL: &str = "debug";

/// Install the global subscriber writing to `log_path`.
///
/// The returned guard flushes buffered lines on drop and must be kept alive
/// for the lifetime of the program.
pub fn init_logging(
    config: &LogConfig,
    verbose: bool,
    log_path: &Path,
) -> anyhow::Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .context("log path has no parent directory")?;
    let file_name = log_path
        .file_name()
        .context("log path has no file name")?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = env_filter(config, verbose);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}

fn env_filter(config: &LogConfig, verbose: bool) -> EnvFilter {
    let level = if verbose {
        VERBOSE_LEVEL
    } else {
        config.level.as_str()
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
