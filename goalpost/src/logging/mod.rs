//! Structured logging for Goalpost.
//!
//! Installs a global `tracing` subscriber configured from [`LoggingConfig`]:
//! one of four output formats, a maximum level, and stdout and/or a log file
//! written through a non-blocking `tracing-appender` worker.


use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Flushes the file writer on drop; lives as long as the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Subscriber error: {0}")]
    SubscriberError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("{0}")]
    Other(String),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

// The fmt builders for each format are distinct types, so the writer
// selection is shared through a macro rather than a function.
macro_rules! install {
    ($builder:expr, $config:expr) => {{
        let builder = $builder;
        match (&$config.file, $config.stdout) {
            (Some(path), true) => {
                let writer = create_non_blocking_file(path)?;
                builder.with_writer(writer.and(std::io::stdout)).try_init()
            }
            (Some(path), false) => {
                let writer = create_non_blocking_file(path)?;
                builder.with_ansi(false).with_writer(writer).try_init()
            }
            (None, true) => builder.try_init(),
            (None, false) => Ok(()),
        }
    }};
}

/// Initialize the logging system with the given configuration.
///
/// Calling it again once a global subscriber is installed is not an error.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let base = tracing_subscriber::fmt()
        .with_max_level(Level::from(config.level))
        .with_level(true)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => install!(base.json().with_line_number(true), config),
        LogFormat::Compact => install!(base.compact(), config),
        LogFormat::Pretty => install!(base.pretty().with_line_number(true), config),
        LogFormat::Default => install!(base, config),
    };

    match result {
        Ok(()) => Ok(()),
        Err(_) if tracing::dispatcher::has_been_set() => Ok(()),
        Err(e) => Err(LogError::SubscriberError(e)),
    }
}

/// Create a non-blocking file writer.
///
/// Only the first writer's guard is retained; later calls are ignored by
/// the already-installed subscriber anyway.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<NonBlocking> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| LogError::Other(format!("Log path {} has no file name", path.display())))?;

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        file_name,
    );

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    Ok(non_blocking)
}
