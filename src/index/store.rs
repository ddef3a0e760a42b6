//! Persistence of category index records.
//!
//! This is the only code that knows how a [`CategoryIndex`] looks on disk.
//! Records live in a hidden tree beside the memory files:
//!
//! ```text
//! <store>/.index/index.yaml                  root category
//! <store>/.index/project/index.yaml          "project"
//! <store>/.index/project/cortex/index.yaml   "project/cortex"
//! ```
//!
//! Every write validates that entries are direct children of the record's
//! category and stores them sorted by path, so equal records are byte-identical.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::CategoryIndex;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::path::{is_valid_segment, CategoryPath};

/// Directory (relative to the store root) holding all index records.
pub const INDEX_DIR: &str = ".index";

/// File name of a single category's record.
pub const INDEX_FILE: &str = "index.yaml";

/// Read/write/delete access to per-category index records.
#[derive(Clone)]
pub struct CategoryIndexStore {
    fs: Arc<dyn FileSystem>,
}

impl CategoryIndexStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Store-relative location of the record for `category`.
    pub fn record_path(category: &CategoryPath) -> String {
        if category.is_root() {
            format!("{INDEX_DIR}/{INDEX_FILE}")
        } else {
            format!("{INDEX_DIR}/{category}/{INDEX_FILE}")
        }
    }

    /// Load the record for `category`. `Ok(None)` means the category is empty.
    pub fn read(&self, category: &CategoryPath) -> Result<Option<CategoryIndex>> {
        let path = Self::record_path(category);
        let Some(bytes) = self
            .fs
            .read_file(&path)
            .map_err(|e| Error::io_read(&path, e))?
        else {
            return Ok(None);
        };

        let index: CategoryIndex =
            serde_yaml_ng::from_slice(&bytes).map_err(|e| Error::io_read(&path, e))?;
        Ok(Some(index))
    }

    /// Replace (or create) the record for `category`.
    pub fn write(&self, category: &CategoryPath, index: &CategoryIndex) -> Result<()> {
        validate(category, index)?;

        let mut canonical = index.clone();
        canonical.sort();

        let path = Self::record_path(category);
        let encoded = serde_yaml_ng::to_string(&canonical).map_err(|e| Error::io_write(&path, e))?;
        self.fs
            .write_file(&path, encoded.as_bytes())
            .map_err(|e| Error::io_write(&path, e))?;

        debug!(
            category = %category,
            memories = canonical.memories.len(),
            subcategories = canonical.subcategories.len(),
            "index record written"
        );
        Ok(())
    }

    /// Remove the record for `category`. No-op if absent.
    pub fn delete(&self, category: &CategoryPath) -> Result<()> {
        let path = Self::record_path(category);
        self.fs
            .delete_file(&path)
            .map_err(|e| Error::io_write(&path, e))?;
        debug!(category = %category, "index record deleted");
        Ok(())
    }

    /// Every category that currently has a record, in depth-first order.
    pub fn list_categories(&self) -> Result<Vec<CategoryPath>> {
        let mut found = Vec::new();
        self.collect_categories(INDEX_DIR, CategoryPath::root(), &mut found)?;
        Ok(found)
    }

    fn collect_categories(
        &self,
        dir: &str,
        category: CategoryPath,
        found: &mut Vec<CategoryPath>,
    ) -> Result<()> {
        let mut entries = self
            .fs
            .list_directory(dir)
            .map_err(|e| Error::io_read(dir, e))?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        if entries.iter().any(|e| !e.is_directory && e.name == INDEX_FILE) {
            found.push(category.clone());
        }

        for entry in entries.iter().filter(|e| e.is_directory) {
            if !is_valid_segment(&entry.name) {
                debug!(dir, name = %entry.name, "ignoring non-slug directory in index tree");
                continue;
            }
            let child = category.child(&entry.name)?;
            self.collect_categories(&format!("{dir}/{}", entry.name), child, found)?;
        }
        Ok(())
    }
}

/// Every entry must be a direct child of `category`, and appear once.
fn validate(category: &CategoryPath, index: &CategoryIndex) -> Result<()> {
    let mut seen_memories = HashSet::new();
    for entry in &index.memories {
        if entry.path.category() != category {
            return Err(Error::index(
                category.to_string(),
                format!("memory '{}' is not a direct child", entry.path),
            ));
        }
        if !seen_memories.insert(&entry.path) {
            return Err(Error::index(
                category.to_string(),
                format!("memory '{}' is listed twice", entry.path),
            ));
        }
    }

    let mut seen_subcategories = HashSet::new();
    for entry in &index.subcategories {
        if !category.is_parent_of(&entry.path) {
            return Err(Error::index(
                category.to_string(),
                format!("subcategory '{}' is not a direct child", entry.path),
            ));
        }
        if !seen_subcategories.insert(&entry.path) {
            return Err(Error::index(
                category.to_string(),
                format!("subcategory '{}' is listed twice", entry.path),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystem;
    use crate::index::{MemoryEntry, SubcategoryEntry};
    use crate::path::MemoryPath;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> CategoryIndexStore {
        CategoryIndexStore::new(Arc::new(LocalFileSystem::new(tmp.path())))
    }

    fn cat(raw: &str) -> CategoryPath {
        CategoryPath::parse(raw).unwrap()
    }

    fn mem(raw: &str) -> MemoryEntry {
        MemoryEntry {
            path: MemoryPath::parse(raw).unwrap(),
            token_estimate: 10,
        }
    }

    #[test]
    fn read_missing_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        assert!(store.read(&cat("never/written")).unwrap().is_none());
        assert!(store.read(&CategoryPath::root()).unwrap().is_none());
    }

    #[test]
    fn write_then_read_sorted() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let index = CategoryIndex {
            memories: vec![mem("project/zeta"), mem("project/alpha")],
            subcategories: vec![SubcategoryEntry {
                path: cat("project/cortex"),
                memory_count: 2,
                description: Some("the engine".into()),
            }],
        };
        store.write(&cat("project"), &index).unwrap();

        assert!(tmp.path().join(".index/project/index.yaml").exists());
        let back = store.read(&cat("project")).unwrap().unwrap();
        assert_eq!(back.memories[0].path.slug(), "alpha");
        assert_eq!(back.memories[1].path.slug(), "zeta");
        assert_eq!(back.subcategories, index.subcategories);
    }

    #[test]
    fn write_rejects_entries_outside_category() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let nested = CategoryIndex {
            memories: vec![mem("project/cortex/arch")],
            subcategories: vec![],
        };
        let err = store.write(&cat("project"), &nested).unwrap_err();
        assert_eq!(err.code(), "INDEX_ERROR");

        let grandchild = CategoryIndex {
            memories: vec![],
            subcategories: vec![SubcategoryEntry {
                path: cat("project/cortex/deep"),
                memory_count: 1,
                description: None,
            }],
        };
        let err = store.write(&cat("project"), &grandchild).unwrap_err();
        assert_eq!(err.code(), "INDEX_ERROR");

        // nothing was written
        assert!(store.read(&cat("project")).unwrap().is_none());
    }

    #[test]
    fn write_rejects_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let index = CategoryIndex {
            memories: vec![mem("a/x"), mem("a/x")],
            subcategories: vec![],
        };
        assert_eq!(store.write(&cat("a"), &index).unwrap_err().code(), "INDEX_ERROR");
    }

    #[test]
    fn corrupt_record_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        std::fs::create_dir_all(tmp.path().join(".index/broken")).unwrap();
        std::fs::write(tmp.path().join(".index/broken/index.yaml"), "memories: [ {").unwrap();

        let err = store.read(&cat("broken")).unwrap_err();
        assert_eq!(err.code(), "IO_READ_ERROR");
    }

    #[test]
    fn delete_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.write(&cat("a"), &CategoryIndex::default()).unwrap();
        store.delete(&cat("a")).unwrap();
        store.delete(&cat("a")).unwrap();
        assert!(store.read(&cat("a")).unwrap().is_none());
    }

    #[test]
    fn list_categories_walks_index_tree() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        for raw in ["", "b", "a", "a/c"] {
            store.write(&cat(raw), &CategoryIndex::default()).unwrap();
        }
        let listed: Vec<String> = store
            .list_categories()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(listed, vec!["", "a", "a/c", "b"]);
    }
}
