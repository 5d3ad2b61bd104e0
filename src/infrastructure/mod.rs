//! Infrastructure layer providing external service integrations.
//!
//! This module contains the persistence gateways, configuration loading,
//! logging setup, and the sharing, clipboard and CSV export helpers.

pub mod persistence;
pub mod rest;
pub mod config;
pub mod telemetry;
pub mod share;
pub mod clipboard;
pub mod export;

pub use persistence::*;
pub use rest::*;
pub use config::{Config, ConfigError, LogConfig, RemoteConfig, StoreConfig};
pub use share::*;
pub use clipboard::*;
pub use export::*;

/// Picks the hosted store when one is configured, the local file otherwise.
pub fn open_gateway(config: &StoreConfig) -> GatewayResult<Box<dyn BouquetGateway>> {
    match &config.remote {
        Some(remote) => {
            tracing::info!(url = %remote.url, table = %remote.table, "using hosted bouquet store");
            Ok(Box::new(RestGateway::new(remote)?))
        }
        None => {
            tracing::info!(path = %config.path.display(), "using local bouquet store");
            Ok(Box::new(FileGateway::new(&config.path)))
        }
    }
}
