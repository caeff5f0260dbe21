//! Tracing subscriber setup
//!
//! The host starts plugins without a console, so a configured log
//! directory gets a daily rolling file through a non-blocking writer.
//! Without one, logs go to stderr. `RUST_LOG` takes precedence over the
//! configured level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use toggldeck_domain::{DeckError, LogFormat, LoggingConfig, Result};

const LOG_FILE_PREFIX: &str = "toggldeck.log";

/// Keeps the background log writer alive; flushes on drop.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `DeckError::Config` for an invalid filter directive or when a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_filter(&config.level)?;

    let (writer, worker, ansi) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| DeckError::Config(format!("Failed to install logger: {e}")))?;

    Ok(LoggingGuard { _worker: worker })
}

/// `RUST_LOG` when set, the configured directive otherwise.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| DeckError::Config(format!("Invalid log filter '{level}': {e}")))
}
