use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::index::updater::UpdateOptions;
use crate::path::is_valid_segment;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CortexConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Named stores with explicit locations. Unlisted names live under
    /// `<data_dir>/stores/<name>`.
    pub stores: BTreeMap<String, StoreEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub default_store: String,
    /// Create missing index records during incremental updates.
    pub create_when_missing: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreEntry {
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for CortexConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            stores: BTreeMap::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 7410,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_cortex_dir().to_string_lossy().into_owned(),
            default_store: "default".into(),
            create_when_missing: true,
        }
    }
}

/// Returns `~/.cortex/`
pub fn default_cortex_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cortex")
}

/// Returns the default config file path: `~/.cortex/config.toml`
pub fn default_config_path() -> PathBuf {
    default_cortex_dir().join("config.toml")
}

impl CortexConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CortexConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (CORTEX_DATA_DIR, CORTEX_STORE, CORTEX_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CORTEX_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("CORTEX_STORE") {
            self.storage.default_store = val;
        }
        if let Ok(val) = std::env::var("CORTEX_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the data directory, expanding `~` if needed.
    pub fn resolved_data_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.data_dir)
    }

    /// Store name to use when the caller did not pick one.
    pub fn store_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        name.unwrap_or(&self.storage.default_store)
    }

    /// Root directory of the named store (or the default store).
    pub fn resolve_store(&self, name: Option<&str>) -> crate::Result<PathBuf> {
        let name = self.store_name(name);
        if let Some(entry) = self.stores.get(name) {
            return Ok(expand_tilde(&entry.path));
        }
        if !is_valid_segment(name) {
            return Err(crate::Error::UnknownStore(name.to_string()));
        }
        Ok(self.resolved_data_dir().join("stores").join(name))
    }

    /// Options for incremental index updates.
    pub fn update_options(&self) -> UpdateOptions {
        UpdateOptions {
            create_when_missing: self.storage.create_when_missing,
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}
