//! Configuration loading and resolution
//!
//! Priority order for every setting:
//! 1. Command-line argument or environment variable (highest priority)
//! 2. TOML config file
//! 3. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Settings read from `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub seed: Option<bool>,
}

/// Values supplied on the command line (or through their environment fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub seed: bool,
}

/// Fully resolved server configuration, injected into the HTTP layer
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub log_file: Option<PathBuf>,
    /// Insert sample venues/artists/shows when the database is empty
    pub seed: bool,
}

impl ServerConfig {
    /// Resolve the configuration from overrides, the TOML file and compiled defaults
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match overrides.config_file.as_deref() {
            Some(path) => load_toml_config(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => load_toml_config(&path)?,
                _ => TomlConfig::default(),
            },
        };

        Self::merge(overrides, toml_config)
    }

    /// Merge overrides on top of an already loaded TOML config
    pub fn merge(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let bind_raw = overrides
            .bind_addr
            .or(toml_config.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_raw, e)))?;

        let database_path = overrides
            .database_path
            .or(toml_config.database_path)
            .unwrap_or_else(default_database_path);

        Ok(Self {
            bind_addr,
            database_path,
            log_file: overrides.log_file.or(toml_config.log_file),
            seed: overrides.seed || toml_config.seed.unwrap_or(false),
        })
    }
}

/// Load and parse a TOML config file
///
/// A missing file is not fatal: a warning is logged and defaults are used.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file not found: {} (using defaults)", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Platform config file location (`~/.config/fyyur/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fyyur").join("config.toml"))
}

/// Platform default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fyyur"))
        .unwrap_or_else(|| PathBuf::from("./fyyur_data"))
        .join("fyyur.db")
}
