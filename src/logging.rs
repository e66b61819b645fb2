//! File-based logging.
//!
//! The TUI owns the terminal, so tracing output goes to a daily rolling file
//! under the configured directory instead of stdout.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingSettings;

const LOG_FILE_PREFIX: &str = "encore";

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over `logging.filter`. The returned guard
/// flushes buffered lines when dropped and must live until shutdown.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(&settings.directory)?;

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, &settings.directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("encore=debug,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(directory = %settings.directory, "logging initialized");

    Ok(guard)
}
