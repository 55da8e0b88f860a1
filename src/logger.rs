//! Debug logging support for revar
//!
//! Debug mode (`--debug` or `logging.debug` in the config file) installs a
//! tracing subscriber. Logs go to stderr, or are appended to `logging.file`
//! when one is configured. Without debug mode nothing is installed and the
//! tracing macros are no-ops.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

const LOG_FILTER: &str = "revar=debug";

/// Initialize the debug logging system
///
/// Returns the log file path when logs go to a file, `None` otherwise.
pub fn init_logging(debug_enabled: bool, log_file: Option<&Path>) -> Result<Option<PathBuf>> {
    if !debug_enabled {
        return Ok(None);
    }

    let Some(log_path) = log_file else {
        let subscriber = registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .with(EnvFilter::new(LOG_FILTER));
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;
        return Ok(None);
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()));

    match file {
        Ok(log_file) => {
            let subscriber = registry()
                .with(
                    fmt::layer()
                        .with_writer(log_file)
                        .with_ansi(false)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .with(EnvFilter::new(LOG_FILTER));

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

            Ok(Some(log_path.to_path_buf()))
        }
        Err(e) => {
            // Logging must never stop a run
            eprintln!("Warning: Could not create log file: {:#}", e);
            Ok(None)
        }
    }
}
