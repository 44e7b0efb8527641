//! # Structured Logging
//!
//! Subscriber setup for the deployed function. The library itself only
//! emits `tracing` events; installing a subscriber is the binary's job.

use std::env;

use serde::{Deserialize, Serialize};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::error::{NotifierError, Result};

/// SDK crates that are chatty at debug level
const QUIET_TARGETS: &[&str] = &["aws_config", "aws_smithy_runtime", "hyper", "h2", "rustls"];

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// The log level to use (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to use JSON formatting
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
        }
    }
}

impl LoggingConfig {
    /// Read `LOG_LEVEL` and `LOG_FORMAT` from the environment
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let level = env::var("LOG_LEVEL")
            .ok()
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or(defaults.level);

        let json_format = env::var("LOG_FORMAT")
            .map(|format| !format.trim().eq_ignore_ascii_case("text"))
            .unwrap_or(defaults.json_format);

        Self { level, json_format }
    }

    /// Filter directives for this level; SDK internals stay at warn
    pub fn directives(&self) -> String {
        let mut directives = self.level.to_lowercase();
        for target in QUIET_TARGETS {
            directives.push_str(&format!(",{}=warn", target));
        }
        directives
    }
}

/// Initializes the global subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directives()))
        .map_err(|e| NotifierError::configuration(format!("Invalid log level: {}", e)))?;

    let registry = Registry::default().with(filter);

    // Lambda stamps every line itself
    let result = if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(true)
                    .with_ansi(false)
                    .without_time(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .without_time(),
            )
            .try_init()
    };

    result.map_err(|e| {
        NotifierError::configuration(format!("Failed to set global subscriber: {}", e))
    })?;

    tracing::info!(
        level = %config.level,
        json = config.json_format,
        "Structured logging initialized"
    );

    Ok(())
}
