//! `tracing` subscriber set-up.

use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {source}")]
    InvalidDirective {
        directive: String,
        source: ParseError,
    },
    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// `RUST_LOG` when it is set and valid, the configured level otherwise.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => filter_from_directive(&config.level),
    }
}

fn filter_from_directive(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidDirective {
        directive: directive.to_string(),
        source,
    })
}

/// Installs the global subscriber: an `EnvFilter` plus one fmt layer in
/// the configured format.
///
/// Fails instead of panicking when a subscriber is already installed, so
/// hosts and tests may call it more than once.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.ansi))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(config.ansi))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_ansi(false),
            )
            .try_init()?,
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = ?config.format,
        "logging initialised"
    );
    Ok(())
}
