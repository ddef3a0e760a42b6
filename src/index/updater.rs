//! Incremental index maintenance.
//!
//! After one memory is written, removed, or moved, only the owning category's
//! record and the records on its ancestor chain change. [`IndexUpdater`]
//! rewrites exactly those, leaving the records in the same state a full
//! reindex of the resulting tree would produce.

use std::sync::Arc;

use tracing::{debug, info};

use super::store::CategoryIndexStore;
use super::token::TokenEstimator;
use super::{CategoryIndex, MemoryEntry};
use crate::error::{Error, Result};
use crate::memory::types::Memory;
use crate::path::{CategoryPath, MemoryPath};

/// Per-call behavior of the updater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Create missing records instead of failing with `INDEX_ERROR`.
    pub create_when_missing: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            create_when_missing: true,
        }
    }
}

/// State of a child record after it was rewritten, as seen by its parent.
enum ChildState {
    /// The child record exists and lists this many direct memories.
    Present(usize),
    /// The child record was deleted (it became empty).
    Gone,
}

/// Applies single-memory mutations to the index.
#[derive(Clone)]
pub struct IndexUpdater {
    store: CategoryIndexStore,
    estimator: Arc<dyn TokenEstimator>,
}

impl IndexUpdater {
    pub fn new(store: CategoryIndexStore, estimator: Arc<dyn TokenEstimator>) -> Self {
        Self { store, estimator }
    }

    /// Record a created or updated memory.
    ///
    /// Upserts the memory's entry in its category, then refreshes the
    /// subcategory counts on every ancestor up to the root.
    pub fn update_after_memory_write(&self, memory: &Memory, options: UpdateOptions) -> Result<()> {
        let category = memory.path.category();
        let mut record = self.load(category, options)?;

        record.upsert_memory(MemoryEntry {
            path: memory.path.clone(),
            token_estimate: self.estimator.estimate_tokens(&memory.content),
        });

        let mut plan = Plan::default();
        let state = plan.stage(category, record);
        self.plan_ancestors(category, state, options, &mut plan)?;
        self.apply(plan)?;

        info!(memory = %memory.path, "index updated after write");
        Ok(())
    }

    /// Drop a memory from the index.
    ///
    /// A category left with no memories and no subcategories loses its record
    /// and its entry in the parent; the root record is always kept.
    pub fn remove_memory(&self, path: &MemoryPath, options: UpdateOptions) -> Result<()> {
        let category = path.category();
        let Some(mut record) = self.read(category)? else {
            debug!(memory = %path, "no index record for category; nothing to remove");
            return Ok(());
        };

        if !record.remove_memory(path) {
            debug!(memory = %path, "memory was not indexed");
        }

        let mut plan = Plan::default();
        let state = plan.stage(category, record);
        self.plan_ancestors(category, state, options, &mut plan)?;
        self.apply(plan)?;

        info!(memory = %path, "index updated after removal");
        Ok(())
    }

    /// Move a memory's entry from `from` to `memory.path`.
    ///
    /// The source side (and its ancestor chain) is updated before the
    /// destination is inserted.
    pub fn move_memory(&self, from: &MemoryPath, memory: &Memory, options: UpdateOptions) -> Result<()> {
        if from != &memory.path {
            self.remove_memory(from, options)?;
        }
        self.update_after_memory_write(memory, options)
    }

    /// Set or clear the description shown for `category` in its parent's record.
    pub fn set_category_description(
        &self,
        category: &CategoryPath,
        description: Option<String>,
    ) -> Result<()> {
        let Some(parent) = category.parent() else {
            return Err(Error::index("", "the root category cannot have a description"));
        };

        let not_indexed = || Error::index(category.to_string(), "category is not indexed");
        let mut record = self.read(&parent)?.ok_or_else(not_indexed)?;
        let entry = record
            .subcategories
            .iter_mut()
            .find(|s| &s.path == category)
            .ok_or_else(not_indexed)?;

        entry.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.save(&parent, &record)?;

        info!(category = %category, "category description updated");
        Ok(())
    }

    /// Walk from `child`'s parent up to the root, staging each parent's entry
    /// for the child below it.
    fn plan_ancestors(
        &self,
        child: &CategoryPath,
        mut state: ChildState,
        options: UpdateOptions,
        plan: &mut Plan,
    ) -> Result<()> {
        let mut child = child.clone();

        while let Some(parent) = child.parent() {
            let mut record = match (&state, self.read(&parent)?) {
                (_, Some(record)) => record,
                (ChildState::Gone, None) => CategoryIndex::default(),
                (ChildState::Present(_), None) => self.load(&parent, options)?,
            };

            match state {
                ChildState::Present(count) => record.upsert_subcategory(&child, count),
                ChildState::Gone => {
                    record.remove_subcategory(&child);
                }
            }

            state = plan.stage(&parent, record);
            child = parent;
        }
        Ok(())
    }

    /// Write every staged record in order, child first.
    fn apply(&self, plan: Plan) -> Result<()> {
        for (category, change) in plan.changes {
            match change {
                Some(record) => self.save(&category, &record)?,
                None => self
                    .store
                    .delete(&category)
                    .map_err(|e| e.into_index(category.to_string()))?,
            }
        }
        Ok(())
    }

    /// Read a record, applying `create_when_missing` to absent ones.
    fn load(&self, category: &CategoryPath, options: UpdateOptions) -> Result<CategoryIndex> {
        match self.read(category)? {
            Some(record) => Ok(record),
            None if options.create_when_missing => Ok(CategoryIndex::default()),
            None => Err(Error::index(
                category.to_string(),
                "index record is missing and creation is disabled",
            )),
        }
    }

    fn read(&self, category: &CategoryPath) -> Result<Option<CategoryIndex>> {
        self.store
            .read(category)
            .map_err(|e| e.into_index(category.to_string()))
    }

    fn save(&self, category: &CategoryPath, record: &CategoryIndex) -> Result<()> {
        self.store
            .write(category, record)
            .map_err(|e| e.into_index(category.to_string()))
    }
}

/// Record changes collected before anything is written, so a failed read
/// anywhere on the chain leaves the index untouched.
#[derive(Default)]
struct Plan {
    /// `None` deletes the record.
    changes: Vec<(CategoryPath, Option<CategoryIndex>)>,
}

impl Plan {
    /// Stage `record` for `category`; empty non-root records are staged for deletion.
    fn stage(&mut self, category: &CategoryPath, record: CategoryIndex) -> ChildState {
        if record.is_empty() && !category.is_root() {
            self.changes.push((category.clone(), None));
            ChildState::Gone
        } else {
            let count = record.memories.len();
            self.changes.push((category.clone(), Some(record)));
            ChildState::Present(count)
        }
    }
}
