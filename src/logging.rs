//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so without a log file it runs with no
//! subscriber at all; the line-oriented commands log to stderr.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, DEFAULT_LOG_FILTER};
use crate::error::AppError;

/// Where log lines may go for the current command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Interactive screen: only a log file is acceptable.
    Interactive,
    /// Line-oriented output: stderr is fine.
    Stderr,
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(config: &AppConfig, target: LogTarget) -> Result<(), AppError> {
    let filter = build_filter(&config.log_filter);

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
        return Ok(());
    }

    if target == LogTarget::Stderr {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    Ok(())
}

/// Parse a filter directive, falling back to the default on syntax errors.
fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
