use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

/// Daily files are named `estate-core.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "estate-core.log";

/// Install stdout + rolling-file subscribers.
///
/// The returned guard flushes the file writer on drop; keep it alive in `main`.
pub fn init(config: &AppConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir).with_context(|| {
        format!("Failed to create log directory {}", config.log_dir.display())
    })?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
