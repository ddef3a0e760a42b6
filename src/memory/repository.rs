//! Memory file storage for one store, with index maintenance.
//!
//! [`MemoryRepository`] is the write path used by the CLI and the MCP tools.
//! Every mutation writes the memory file first and then runs the incremental
//! [`IndexUpdater`]. If the index update fails the file change stands and the
//! error is returned; `reindex` repairs the index from the files.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::index::reindex::{Reindexer, MEMORY_EXTENSION};
use crate::index::store::CategoryIndexStore;
use crate::index::token::{CharRatioEstimator, TokenEstimator};
use crate::index::updater::{IndexUpdater, UpdateOptions};
use crate::index::{MemoryEntry, ReindexResult, SubcategoryEntry};
use crate::memory::format::{parse_memory, serialize_memory};
use crate::memory::types::{Memory, MemoryMetadata};
use crate::path::{CategoryPath, MemoryPath};

/// Optional fields for a new memory.
#[derive(Debug, Clone, Default)]
pub struct NewMemory {
    pub tags: Vec<String>,
    /// Defaults to `"user"`.
    pub source: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub citations: Vec<String>,
}

/// Changes to an existing memory. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct MemoryUpdate {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Remove any expiry. Takes precedence over `expires_at`.
    pub clear_expiry: bool,
    pub citations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub include_expired: bool,
}

/// Direct contents of one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub category: CategoryPath,
    pub memories: Vec<MemoryEntry>,
    pub subcategories: Vec<SubcategoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PruneResult {
    pub pruned: Vec<MemoryPath>,
    pub dry_run: bool,
}

/// Differences between the stored index and a fresh scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexCheck {
    /// Categories with memories but no stored record.
    pub missing: Vec<CategoryPath>,
    /// Stored records whose content differs from the scan.
    pub stale: Vec<CategoryPath>,
    /// Stored records for categories that no longer hold memories.
    pub orphaned: Vec<CategoryPath>,
    /// Slug warnings the scan produced.
    pub warnings: Vec<String>,
}

impl IndexCheck {
    pub fn is_healthy(&self) -> bool {
        self.missing.is_empty() && self.stale.is_empty() && self.orphaned.is_empty()
    }
}

/// Memory files plus their category index, for one store root.
#[derive(Clone)]
pub struct MemoryRepository {
    fs: Arc<dyn FileSystem>,
    index: CategoryIndexStore,
    updater: IndexUpdater,
    reindexer: Reindexer,
    options: UpdateOptions,
}

impl MemoryRepository {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        estimator: Arc<dyn TokenEstimator>,
        options: UpdateOptions,
    ) -> Self {
        let index = CategoryIndexStore::new(fs.clone());
        let updater = IndexUpdater::new(index.clone(), estimator.clone());
        let reindexer = Reindexer::new(fs.clone(), index.clone(), estimator);
        Self {
            fs,
            index,
            updater,
            reindexer,
            options,
        }
    }

    /// Open a store rooted at a local directory with the default estimator.
    pub fn open(root: impl Into<PathBuf>, options: UpdateOptions) -> Self {
        Self::new(
            Arc::new(LocalFileSystem::new(root)),
            Arc::new(CharRatioEstimator::default()),
            options,
        )
    }

    /// Read-only access to the category index.
    pub fn index(&self) -> &CategoryIndexStore {
        &self.index
    }

    /// Store-relative file holding the memory at `path`.
    pub fn file_path(path: &MemoryPath) -> String {
        format!("{path}{MEMORY_EXTENSION}")
    }

    /// Create a memory. Fails with `MemoryExists` if the path is taken.
    pub fn add(&self, path: &MemoryPath, content: &str, new: NewMemory) -> Result<Memory> {
        if content.trim().is_empty() {
            return Err(Error::InvalidMemory {
                path: path.to_string(),
                message: "content must not be empty".into(),
            });
        }
        if self.fs.exists(&Self::file_path(path)) {
            return Err(Error::MemoryExists(path.to_string()));
        }

        let mut metadata = MemoryMetadata::new(Utc::now());
        metadata.tags = clean_tags(new.tags);
        if let Some(source) = new.source {
            metadata.source = source;
        }
        metadata.expires_at = new.expires_at;
        metadata.citations = new.citations;

        let memory = Memory {
            path: path.clone(),
            content: content.to_string(),
            metadata,
        };
        self.write_file(&memory)?;
        self.updater
            .update_after_memory_write(&memory, self.options)
            .inspect_err(|e| stale_index(path, e))?;

        info!(memory = %path, "memory added");
        Ok(memory)
    }

    /// Load a memory. Expired memories are `MemoryNotFound` unless requested.
    pub fn get(&self, path: &MemoryPath, include_expired: bool) -> Result<Memory> {
        let memory = self.load(path)?;
        if !include_expired && memory.is_expired(Utc::now()) {
            return Err(Error::MemoryNotFound(path.to_string()));
        }
        Ok(memory)
    }

    /// Apply `update` to an existing memory and bump `updated_at`.
    pub fn update(&self, path: &MemoryPath, update: MemoryUpdate) -> Result<Memory> {
        let mut memory = self.load(path)?;

        if let Some(content) = update.content {
            if content.trim().is_empty() {
                return Err(Error::InvalidMemory {
                    path: path.to_string(),
                    message: "content must not be empty".into(),
                });
            }
            memory.content = content;
        }
        if let Some(tags) = update.tags {
            memory.metadata.tags = clean_tags(tags);
        }
        if update.clear_expiry {
            memory.metadata.expires_at = None;
        } else if update.expires_at.is_some() {
            memory.metadata.expires_at = update.expires_at;
        }
        if let Some(citations) = update.citations {
            memory.metadata.citations = citations;
        }
        memory.metadata.updated_at = Utc::now();

        self.write_file(&memory)?;
        self.updater
            .update_after_memory_write(&memory, self.options)
            .inspect_err(|e| stale_index(path, e))?;

        info!(memory = %path, "memory updated");
        Ok(memory)
    }

    pub fn remove(&self, path: &MemoryPath) -> Result<()> {
        let file = Self::file_path(path);
        if !self.fs.exists(&file) {
            return Err(Error::MemoryNotFound(path.to_string()));
        }
        self.fs
            .delete_file(&file)
            .map_err(|e| Error::io_write(&file, e))?;
        self.updater
            .remove_memory(path, self.options)
            .inspect_err(|e| stale_index(path, e))?;

        info!(memory = %path, "memory removed");
        Ok(())
    }

    /// Move a memory to a new path. Fails with `MemoryExists` if `to` is taken.
    pub fn move_memory(&self, from: &MemoryPath, to: &MemoryPath) -> Result<Memory> {
        let mut memory = self.load(from)?;
        if from == to {
            return Ok(memory);
        }

        let to_file = Self::file_path(to);
        if self.fs.exists(&to_file) {
            return Err(Error::MemoryExists(to.to_string()));
        }
        let from_file = Self::file_path(from);
        self.fs
            .rename(&from_file, &to_file)
            .map_err(|e| Error::io_write(&from_file, e))?;

        memory.path = to.clone();
        self.updater
            .move_memory(from, &memory, self.options)
            .inspect_err(|e| stale_index(to, e))?;

        info!(from = %from, to = %to, "memory moved");
        Ok(memory)
    }

    /// List the direct memories and subcategories of `category` from the index.
    pub fn list(&self, category: &CategoryPath, options: ListOptions) -> Result<CategoryListing> {
        let record = self.index.read(category)?.unwrap_or_default();

        let memories = if options.include_expired {
            record.memories
        } else {
            let now = Utc::now();
            record
                .memories
                .into_iter()
                .filter(|entry| match self.load(&entry.path) {
                    Ok(memory) => !memory.is_expired(now),
                    Err(e) => {
                        warn!(memory = %entry.path, error = %e, "indexed memory could not be loaded");
                        true
                    }
                })
                .collect()
        };

        Ok(CategoryListing {
            category: category.clone(),
            memories,
            subcategories: record.subcategories,
        })
    }

    /// Remove every memory that expired at or before `now`.
    pub fn prune(&self, now: DateTime<Utc>, dry_run: bool) -> Result<PruneResult> {
        let mut expired = Vec::new();
        for category in self.index.list_categories()? {
            let Some(record) = self.index.read(&category)? else {
                continue;
            };
            for entry in record.memories {
                match self.load(&entry.path) {
                    Ok(memory) if memory.is_expired(now) => expired.push(entry.path),
                    Ok(_) => {}
                    Err(e) => warn!(memory = %entry.path, error = %e, "skipping unreadable memory"),
                }
            }
        }

        if !dry_run {
            for path in &expired {
                self.remove(path)?;
            }
        }

        info!(count = expired.len(), dry_run, "prune complete");
        Ok(PruneResult {
            pruned: expired,
            dry_run,
        })
    }

    /// Rebuild the whole index from the memory files.
    pub fn reindex(&self) -> Result<ReindexResult> {
        self.reindexer.reindex()
    }

    /// Set or clear a category's description.
    pub fn describe(&self, category: &CategoryPath, description: Option<String>) -> Result<()> {
        self.updater.set_category_description(category, description)
    }

    /// Compare the stored index with a fresh scan without changing anything.
    pub fn check(&self) -> Result<IndexCheck> {
        let plan = self.reindexer.scan()?;
        let mut check = IndexCheck {
            warnings: plan.warnings,
            ..IndexCheck::default()
        };

        for (category, expected) in &plan.records {
            match self.index.read(category) {
                Ok(Some(stored)) if &stored == expected => {}
                Ok(Some(_)) | Err(_) => check.stale.push(category.clone()),
                Ok(None) => check.missing.push(category.clone()),
            }
        }
        for category in self.index.list_categories()? {
            if !plan.records.contains_key(&category) {
                check.orphaned.push(category);
            }
        }
        Ok(check)
    }

    fn load(&self, path: &MemoryPath) -> Result<Memory> {
        let file = Self::file_path(path);
        let bytes = self
            .fs
            .read_file(&file)
            .map_err(|e| Error::io_read(&file, e))?
            .ok_or_else(|| Error::MemoryNotFound(path.to_string()))?;
        parse_memory(path, &String::from_utf8_lossy(&bytes))
    }

    fn write_file(&self, memory: &Memory) -> Result<()> {
        let file = Self::file_path(&memory.path);
        let raw = serialize_memory(memory)?;
        self.fs
            .write_file(&file, raw.as_bytes())
            .map_err(|e| Error::io_write(&file, e))
    }
}

fn stale_index(path: &MemoryPath, error: &Error) {
    warn!(
        memory = %path,
        error = %error,
        "index update failed; the index may be stale until the store is reindexed"
    );
}

/// Trim tags, drop empties and repeats, keep first-seen order.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}
