use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::MemoError;

/// Installs the global subscriber; `RUST_LOG` takes precedence over the configured level
///
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), MemoError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| MemoError::configuration(format!("Invalid log level: {}", e)))?;

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    installed.map_err(|e| MemoError::configuration(format!("Logging already initialized: {}", e)))?;

    tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}
