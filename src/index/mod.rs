//! Category index engine.
//!
//! Every category keeps a derived [`CategoryIndex`] record listing its direct
//! memories and direct subcategories. The record is rebuilt from the memory
//! files on disk by the [`reindex::Reindexer`], and kept current between
//! rebuilds by the [`updater::IndexUpdater`]. Both write through the
//! [`store::CategoryIndexStore`], which owns the on-disk format.
//!
//! - [`slug`] — name-to-slug normalization and sibling collision resolution
//! - [`store`] — read/write/delete of one category's record
//! - [`token`] — token estimation for memory entries
//! - [`updater`] — incremental maintenance after a single memory mutation
//! - [`reindex`] — full rebuild from the filesystem

pub mod reindex;
pub mod slug;
pub mod store;
pub mod token;
pub mod updater;

use serde::{Deserialize, Serialize};

use crate::path::{CategoryPath, MemoryPath};

/// A memory listed in its category's index record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub path: MemoryPath,
    /// Approximate token count of the memory body.
    pub token_estimate: usize,
}

/// A direct subcategory listed in its parent's index record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryEntry {
    pub path: CategoryPath,
    /// Number of memories directly inside the subcategory (not recursive).
    pub memory_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The index record for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    #[serde(default)]
    pub memories: Vec<MemoryEntry>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryEntry>,
}

impl CategoryIndex {
    /// `true` when the record lists nothing at all.
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty() && self.subcategories.is_empty()
    }

    /// Replace the entry with the same path, or append a new one.
    pub fn upsert_memory(&mut self, entry: MemoryEntry) {
        match self.memories.iter_mut().find(|m| m.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.memories.push(entry),
        }
    }

    /// Remove the entry for `path`. Returns `true` if one was present.
    pub fn remove_memory(&mut self, path: &MemoryPath) -> bool {
        let before = self.memories.len();
        self.memories.retain(|m| &m.path != path);
        self.memories.len() != before
    }

    pub fn subcategory(&self, path: &CategoryPath) -> Option<&SubcategoryEntry> {
        self.subcategories.iter().find(|s| &s.path == path)
    }

    /// Set the memory count for a subcategory, keeping its description.
    pub fn upsert_subcategory(&mut self, path: &CategoryPath, memory_count: usize) {
        match self.subcategories.iter_mut().find(|s| &s.path == path) {
            Some(existing) => existing.memory_count = memory_count,
            None => self.subcategories.push(SubcategoryEntry {
                path: path.clone(),
                memory_count,
                description: None,
            }),
        }
    }

    /// Remove the entry for `path`. Returns `true` if one was present.
    pub fn remove_subcategory(&mut self, path: &CategoryPath) -> bool {
        let before = self.subcategories.len();
        self.subcategories.retain(|s| &s.path != path);
        self.subcategories.len() != before
    }

    /// Sort both lists by path so equal records encode identically.
    pub fn sort(&mut self) {
        self.memories.sort_by(|a, b| a.path.cmp(&b.path));
        self.subcategories.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

/// Outcome of a full reindex.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReindexResult {
    /// Skipped and renamed names encountered during the scan.
    pub warnings: Vec<String>,
    /// Number of category records written.
    pub categories_indexed: usize,
    /// Number of stale records removed.
    pub stale_removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, tokens: usize) -> MemoryEntry {
        MemoryEntry {
            path: MemoryPath::parse(path).unwrap(),
            token_estimate: tokens,
        }
    }

    #[test]
    fn upsert_memory_replaces_by_path() {
        let mut index = CategoryIndex::default();
        index.upsert_memory(entry("a/one", 3));
        index.upsert_memory(entry("a/two", 5));
        index.upsert_memory(entry("a/one", 9));

        assert_eq!(index.memories.len(), 2);
        assert_eq!(index.memories[0].token_estimate, 9);
        assert!(index.remove_memory(&MemoryPath::parse("a/one").unwrap()));
        assert!(!index.remove_memory(&MemoryPath::parse("a/one").unwrap()));
    }

    #[test]
    fn upsert_subcategory_keeps_description() {
        let path = CategoryPath::parse("a/b").unwrap();
        let mut index = CategoryIndex {
            memories: vec![],
            subcategories: vec![SubcategoryEntry {
                path: path.clone(),
                memory_count: 1,
                description: Some("notes about b".into()),
            }],
        };
        index.upsert_subcategory(&path, 4);

        let sub = index.subcategory(&path).unwrap();
        assert_eq!(sub.memory_count, 4);
        assert_eq!(sub.description.as_deref(), Some("notes about b"));
    }

    #[test]
    fn sort_orders_by_path() {
        let mut index = CategoryIndex::default();
        index.upsert_memory(entry("zeta", 1));
        index.upsert_memory(entry("alpha", 1));
        index.sort();
        assert_eq!(index.memories[0].path.slug(), "alpha");
    }
}
