//! Structured logging infrastructure for Mailmine.
//!
//! This module provides a configurable logging system based on the tracing crate,
//! supporting different output formats, log levels and an optional log file.


use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Keeps the non-blocking file writer alive for the lifetime of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Error in subscriber setup
    #[error("Subscriber error: {0}")]
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level when set. Calling
/// this after a global subscriber is installed is a no-op.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let writer = make_writer(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_line_number(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Default => builder.try_init(),
    };

    result.map_err(LogError::SubscriberError)
}

/// Build the writer for the configured sinks (stdout, file, both or neither).
fn make_writer(config: &LoggingConfig) -> Result<BoxMakeWriter> {
    let file = match &config.file {
        Some(path) => Some(create_non_blocking_file(path)?),
        None => None,
    };

    let writer = match (file, config.stdout) {
        (Some(file), true) => BoxMakeWriter::new(std::io::stdout.and(file)),
        (Some(file), false) => BoxMakeWriter::new(file),
        (None, true) => BoxMakeWriter::new(std::io::stdout),
        (None, false) => BoxMakeWriter::new(std::io::sink),
    };

    Ok(writer)
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(
    path: impl AsRef<Path>,
) -> Result<tracing_appender::non_blocking::NonBlocking> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name().unwrap_or_default(),
    );

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Only the first subscriber ever installs a file writer.
    let _ = FILE_GUARD.set(guard);

    Ok(non_blocking)
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level.parse::<LogLevel>().map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}

/// Convert a tracing::Level to a LogLevel enum.
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Convert a LogLevel into the matching tracing::Level.
pub fn log_level_to_level(level: &LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}
