//! Logging configuration and initialization
//!
//! Console output through `tracing-subscriber`, filtered by `EVLOAD_LOG`
//! (falling back to the configured level), plus optional hourly rolling
//! JSON files.

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter};

use crate::config::LoggingConfig;

/// Environment variable holding a filter directive, e.g. `evl_ts=debug`.
pub const LOG_ENV: &str = "EVLOAD_LOG";

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed or `default_level` is not a
/// valid filter directive.
pub fn init_logging(log_dir: Option<&Path>, default_level: &str) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let registry = Registry::default().with(env_filter).with(console_layer);

    if let Some(log_dir) = log_dir {
        let file_appender = rolling::hourly(log_dir, "evload.log");
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()?;
    } else {
        registry.try_init()?;
    }

    Ok(())
}

pub fn init_from_config(config: &LoggingConfig) -> anyhow::Result<()> {
    init_logging(config.log_dir.as_deref(), &config.level)
}

/// Log a user-facing action with context
pub fn log_user_action(action: &str, details: &str) {
    tracing::info!(action = action, details = details, "user action");
}

/// Log an operation completion
pub fn log_operation_complete(operation: &str, duration_ms: u128) {
    tracing::debug!(
        operation = operation,
        duration_ms = duration_ms as u64,
        "operation completed"
    );
}

/// Log an error with context
pub fn log_error(context: &str, error: &dyn std::error::Error) {
    tracing::error!(context = context, error = %error, "error occurred");
}
