//! Runtime configuration: an optional TOML file overlaid with `BLOOMY_*`
//! environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::DEFAULT_MODE;

pub const DEFAULT_CONFIG_FILE: &str = "bloomy.toml";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TABLE: &str = "bouquets";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display mode new bouquets start in.
    pub mode: String,
    /// Origin that viewing links are built on.
    pub share_base_url: String,
    pub store: StoreConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            share_base_url: DEFAULT_BASE_URL.to_string(),
            store: StoreConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Local JSON store used when no remote table is configured.
    pub path: PathBuf,
    pub remote: Option<RemoteConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bouquets.json"),
            remote: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("bloomy.log"),
            filter: "info".to_string(),
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

pub fn parse(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `path` when given, otherwise `bloomy.toml` in the working directory
/// if it exists, then applies environment overrides.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            parse(&contents, &path)?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `BLOOMY_*` overrides looked up through `var`.
pub fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    let value = |key: &str| {
        var(key)
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty())
    };

    if let Some(mode) = value("BLOOMY_MODE") {
        config.mode = mode;
    }
    if let Some(base_url) = value("BLOOMY_BASE_URL") {
        config.share_base_url = base_url;
    }
    if let Some(path) = value("BLOOMY_STORE_PATH") {
        config.store.path = PathBuf::from(path);
    }
    if let Some(filter) = value("BLOOMY_LOG") {
        config.log.filter = filter;
    }

    match (value("BLOOMY_SUPABASE_URL"), value("BLOOMY_SUPABASE_KEY")) {
        (Some(url), Some(api_key)) => {
            let table = config
                .store
                .remote
                .as_ref()
                .map(|remote| remote.table.clone())
                .unwrap_or_else(default_table);
            config.store.remote = Some(RemoteConfig { url, api_key, table });
        }
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!("BLOOMY_SUPABASE_URL and BLOOMY_SUPABASE_KEY must be set together, ignoring");
        }
        (None, None) => {}
    }

    if let Some(table) = value("BLOOMY_TABLE") {
        match config.store.remote.as_mut() {
            Some(remote) => remote.table = table,
            None => tracing::warn!("BLOOMY_TABLE set without a remote store, ignoring"),
        }
    }
}
