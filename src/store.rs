//! Named stores.
//!
//! A store is a directory of memory files with its own category index. Stores
//! are either listed in the config (`[stores.<name>]`) or live under
//! `<data_dir>/stores/<name>`. [`StoreRegistry`] hands out one shared
//! repository per store so a long-running server has a single writer each.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::CortexConfig;
use crate::error::Result;
use crate::memory::repository::MemoryRepository;
use crate::path::is_valid_segment;

/// A store known to the config or found on disk.
#[derive(Debug, Clone, Serialize)]
pub struct StoreInfo {
    pub name: String,
    pub path: PathBuf,
    pub description: Option<String>,
    pub exists: bool,
    pub is_default: bool,
}

/// Every configured store plus any store directory under `<data_dir>/stores`.
pub fn list_stores(config: &CortexConfig) -> Vec<StoreInfo> {
    let mut found: BTreeMap<String, StoreInfo> = BTreeMap::new();
    let default = config.store_name(None);

    for (name, entry) in &config.stores {
        let path = crate::config::expand_tilde(&entry.path);
        found.insert(
            name.clone(),
            StoreInfo {
                name: name.clone(),
                exists: path.is_dir(),
                path,
                description: entry.description.clone(),
                is_default: name == default,
            },
        );
    }

    let stores_dir = config.resolved_data_dir().join("stores");
    if let Ok(read_dir) = std::fs::read_dir(&stores_dir) {
        for entry in read_dir.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !entry.path().is_dir() || !is_valid_segment(&name) || found.contains_key(&name) {
                continue;
            }
            found.insert(
                name.clone(),
                StoreInfo {
                    path: entry.path(),
                    description: None,
                    exists: true,
                    is_default: name == default,
                    name,
                },
            );
        }
    }

    found.into_values().collect()
}

/// Lazily opened repositories, one per store name.
pub struct StoreRegistry {
    config: Arc<CortexConfig>,
    open: Mutex<HashMap<String, Arc<Mutex<MemoryRepository>>>>,
}

impl StoreRegistry {
    pub fn new(config: Arc<CortexConfig>) -> Self {
        Self {
            config,
            open: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    /// The shared repository for `name` (or the default store).
    pub fn get(&self, name: Option<&str>) -> Result<Arc<Mutex<MemoryRepository>>> {
        let name = self.config.store_name(name).to_string();
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(repo) = open.get(&name) {
            return Ok(Arc::clone(repo));
        }

        let root = self.config.resolve_store(Some(&name))?;
        tracing::info!(store = %name, root = %root.display(), "store opened");
        let repo = Arc::new(Mutex::new(MemoryRepository::open(
            root,
            self.config.update_options(),
        )));
        open.insert(name, Arc::clone(&repo));
        Ok(repo)
    }
}
