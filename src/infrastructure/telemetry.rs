//! Log setup. The terminal belongs to the UI, so events go to a file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use super::config::LogConfig;

const FALLBACK_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to open log file: {0}")]
    Open(#[from] std::io::Error),
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Parses `directives`, falling back to `info` with a warning when they are invalid.
pub fn filter_from(directives: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new(FALLBACK_FILTER),
            Some(format!(
                "ignoring log filter {directives:?} ({e}), using {FALLBACK_FILTER:?}"
            )),
        ),
    }
}

/// Installs the file subscriber. Returns the warning for an ignored filter,
/// which is also written to the log once the subscriber is live.
pub fn init(config: &LogConfig) -> Result<Option<String>, TelemetryError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;
    let (filter, warning) = filter_from(&config.filter);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| TelemetryError::Install(e.to_string()))?;

    if let Some(warning) = &warning {
        tracing::warn!("{warning}");
    }
    Ok(warning)
}
