//! Structured logging using tracing.
//!
//! Events go to stderr (pretty or JSON) so that stdout stays free for program
//! output, plus an optional daily-rotated JSON file.

use anyhow::Context;
use std::path::Path;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::MonitoringConfig;

/// Initialize structured logging. Fails if a global subscriber is already set.
pub fn init_logging(config: &MonitoringConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter: {}", config.log_filter))?;

    let json_layer = config.enable_json_logging.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
    });

    let pretty_layer = (!config.enable_json_logging).then(|| {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    let file_layer = config.log_file.as_deref().map(|log_file| {
        let path = Path::new(log_file);
        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let prefix = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "boardsense.log".to_string());

        fmt::layer()
            .json()
            .with_current_span(true)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(RollingFileAppender::new(Rotation::DAILY, directory, prefix))
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber).context("Failed to set global default subscriber")?;

    info!(
        service_name = %config.service_name,
        log_format = if config.enable_json_logging { "json" } else { "pretty" },
        log_file = ?config.log_file,
        "Logging initialized"
    );

    Ok(())
}

/// Logs the outcome of a per-board step with the board recorded as a field,
/// so lines from concurrent boards can be told apart.
pub trait BoardLogExt<T, E> {
    /// `error!` with `board`, `step` and the error when the step failed
    fn log_board_err(self, board: &str, step: &str) -> Result<T, E>;

    /// `debug!` with `board` and `step` when the step succeeded
    fn log_board_ok(self, board: &str, step: &str) -> Result<T, E>;
}

impl<T, E: std::fmt::Display> BoardLogExt<T, E> for Result<T, E> {
    fn log_board_err(self, board: &str, step: &str) -> Result<T, E> {
        if let Err(ref e) = self {
            tracing::error!(board, step, error = %e, "Board step failed");
        }
        self
    }

    fn log_board_ok(self, board: &str, step: &str) -> Result<T, E> {
        if self.is_ok() {
            tracing::debug!(board, step, "Board step succeeded");
        }
        self
    }
}

/// Install a test-friendly subscriber once per process; later calls are no-ops
pub fn init_test_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_test_writer()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
