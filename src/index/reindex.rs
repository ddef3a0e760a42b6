//! Full rebuild of a store's category index from the files on disk.
//!
//! The scan is a depth-first walk with children in lexicographic order of
//! their on-disk names. Each sibling set is normalized with
//! [`assign_slugs`](super::slug::assign_slugs), so two scans of an unchanged
//! tree produce the same records and the same warnings. The only state carried
//! over from the previous index is each subcategory's description.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{info, warn};

use super::slug::{assign_slugs, SlugWarning};
use super::store::CategoryIndexStore;
use super::token::TokenEstimator;
use super::{CategoryIndex, MemoryEntry, ReindexResult, SubcategoryEntry};
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::memory::format::parse_memory_file;
use crate::path::{CategoryPath, MemoryPath};

/// File extension that marks a memory file.
pub const MEMORY_EXTENSION: &str = ".md";

/// The records a reindex would write, computed without touching the index.
#[derive(Debug, Clone, Default)]
pub struct ReindexPlan {
    /// One record per category with memories beneath it, plus the root.
    pub records: BTreeMap<CategoryPath, CategoryIndex>,
    pub warnings: Vec<String>,
}

/// Rebuilds every index record of one store.
#[derive(Clone)]
pub struct Reindexer {
    fs: Arc<dyn FileSystem>,
    store: CategoryIndexStore,
    estimator: Arc<dyn TokenEstimator>,
}

impl Reindexer {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        store: CategoryIndexStore,
        estimator: Arc<dyn TokenEstimator>,
    ) -> Self {
        Self {
            fs,
            store,
            estimator,
        }
    }

    /// Rebuild the index: scan, overwrite every computed record, then delete
    /// records for categories that no longer hold memories.
    ///
    /// Not transactional: on failure some records may already be rewritten.
    /// Re-running is always safe.
    pub fn reindex(&self) -> Result<ReindexResult> {
        let previous = self.previous_records()?;
        let plan = self.scan_with(&previous)?;

        for (category, record) in &plan.records {
            self.store
                .write(category, record)
                .map_err(|e| e.into_index(category.to_string()))?;
        }

        let mut stale_removed = 0;
        for category in previous.iter().filter(|c| !plan.records.contains_key(c)) {
            self.store
                .delete(category)
                .map_err(|e| e.into_index(category.to_string()))?;
            stale_removed += 1;
        }

        for warning in &plan.warnings {
            warn!("{warning}");
        }
        info!(
            categories = plan.records.len(),
            stale_removed,
            warnings = plan.warnings.len(),
            "reindex complete"
        );

        Ok(ReindexResult {
            warnings: plan.warnings,
            categories_indexed: plan.records.len(),
            stale_removed,
        })
    }

    /// Compute the full set of records from the filesystem without writing.
    pub fn scan(&self) -> Result<ReindexPlan> {
        let previous = self.previous_records()?;
        self.scan_with(&previous)
    }

    /// Every category that has a record now. A failed listing aborts: without
    /// it stale records could not be found.
    fn previous_records(&self) -> Result<Vec<CategoryPath>> {
        self.store.list_categories().map_err(|e| e.into_index(""))
    }

    fn scan_with(&self, previous: &[CategoryPath]) -> Result<ReindexPlan> {
        let descriptions = self.previous_descriptions(previous);
        let mut scan = Scan {
            descriptions,
            plan: ReindexPlan::default(),
        };
        self.scan_dir("", &CategoryPath::root(), &mut scan)?;
        Ok(scan.plan)
    }

    /// Descriptions from the current index, keyed by subcategory path.
    ///
    /// Unreadable records are skipped: the rebuild must work on a damaged index.
    fn previous_descriptions(&self, previous: &[CategoryPath]) -> HashMap<CategoryPath, String> {
        let mut descriptions = HashMap::new();
        for category in previous {
            match self.store.read(category) {
                Ok(Some(record)) => {
                    for sub in record.subcategories {
                        if let Some(description) = sub.description {
                            descriptions.insert(sub.path, description);
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(category = %category, error = %e, "skipping unreadable index record"),
            }
        }
        descriptions
    }

    /// Scan one directory. Returns the direct memory count if the directory
    /// has at least one memory anywhere beneath it.
    fn scan_dir(&self, dir: &str, category: &CategoryPath, scan: &mut Scan) -> Result<Option<usize>> {
        let mut entries = self
            .fs
            .list_directory(dir)
            .map_err(|e| Error::io_read(dir, e).into_index(category.to_string()))?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut dir_names = Vec::new();
        let mut memory_stems = Vec::new();
        for entry in entries.into_iter().filter(|e| !e.name.starts_with('.')) {
            if entry.is_directory {
                dir_names.push(entry.name);
            } else if let Some(stem) = entry.name.strip_suffix(MEMORY_EXTENSION) {
                memory_stems.push(stem.to_string());
            }
        }

        let files = assign_slugs(memory_stems);
        let dirs = assign_slugs(dir_names);
        scan.warn(dir, files.warnings);
        scan.warn(dir, dirs.warnings);

        let mut record = CategoryIndex::default();

        for file in files.assigned {
            let rel = join(dir, &format!("{}{MEMORY_EXTENSION}", file.original));
            let Some(bytes) = self
                .fs
                .read_file(&rel)
                .map_err(|e| Error::io_read(&rel, e).into_index(category.to_string()))?
            else {
                warn!(file = %rel, "listed memory file could not be opened; skipping");
                continue;
            };

            let raw = String::from_utf8_lossy(&bytes);
            let body = match parse_memory_file(&raw) {
                Ok((_, body)) => body,
                Err(reason) => {
                    warn!(file = %rel, reason = %reason, "memory file has no valid frontmatter; estimating whole file");
                    raw.into_owned()
                }
            };

            record.memories.push(MemoryEntry {
                path: MemoryPath::new(category.clone(), &file.slug)?,
                token_estimate: self.estimator.estimate_tokens(&body),
            });
        }

        for sub in dirs.assigned {
            let child = category.child(&sub.slug)?;
            let child_dir = join(dir, &sub.original);
            if let Some(memory_count) = self.scan_dir(&child_dir, &child, scan)? {
                let description = scan.descriptions.get(&child).cloned();
                record.subcategories.push(SubcategoryEntry {
                    path: child,
                    memory_count,
                    description,
                });
            }
        }

        let has_memories = !record.is_empty();
        let direct_count = record.memories.len();
        if has_memories || category.is_root() {
            record.sort();
            scan.plan.records.insert(category.clone(), record);
        }

        Ok(has_memories.then_some(direct_count))
    }
}

struct Scan {
    descriptions: HashMap<CategoryPath, String>,
    plan: ReindexPlan,
}

impl Scan {
    fn warn(&mut self, dir: &str, warnings: Vec<SlugWarning>) {
        self.plan
            .warnings
            .extend(warnings.into_iter().map(|w| w.qualified(dir).to_string()));
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystem;
    use crate::index::token::CharRatioEstimator;
    use tempfile::TempDir;

    fn reindexer(tmp: &TempDir) -> Reindexer {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new(tmp.path()));
        let store = CategoryIndexStore::new(fs.clone());
        Reindexer::new(fs, store, Arc::new(CharRatioEstimator::default()))
    }

    fn write(tmp: &TempDir, rel: &str, body: &str) {
        let path = tmp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let raw = format!(
            "---\ncreated_at: 2026-01-05T10:00:00Z\nupdated_at: 2026-01-05T10:00:00Z\n---\n{body}"
        );
        std::fs::write(path, raw).unwrap();
    }

    #[test]
    fn empty_store_gets_empty_root() {
        let tmp = TempDir::new().unwrap();
        let plan = reindexer(&tmp).scan().unwrap();
        assert_eq!(plan.records.len(), 1);
        assert!(plan.records[&CategoryPath::root()].is_empty());
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn directories_without_memories_are_omitted() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a/note.md", "x");
        std::fs::create_dir_all(tmp.path().join("empty/deeper")).unwrap();
        std::fs::write(tmp.path().join("a/readme.txt"), "not a memory").unwrap();

        let plan = reindexer(&tmp).scan().unwrap();
        let categories: Vec<String> = plan.records.keys().map(ToString::to_string).collect();
        assert_eq!(categories, vec!["", "a"]);
        assert_eq!(plan.records[&CategoryPath::parse("a").unwrap()].memories.len(), 1);
    }

    #[test]
    fn token_estimate_uses_body_only() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a/note.md", "12345678");
        let plan = reindexer(&tmp).scan().unwrap();
        let a = &plan.records[&CategoryPath::parse("a").unwrap()];
        assert_eq!(a.memories[0].token_estimate, 2);
    }

    #[test]
    fn file_without_frontmatter_is_still_indexed() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::write(tmp.path().join("a/raw.md"), "plain text").unwrap();

        let plan = reindexer(&tmp).scan().unwrap();
        let a = &plan.records[&CategoryPath::parse("a").unwrap()];
        assert_eq!(a.memories[0].path.to_string(), "a/raw");
        assert_eq!(a.memories[0].token_estimate, 3);
    }

    #[test]
    fn hidden_entries_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, ".hidden/note.md", "x");
        write(&tmp, "a/.draft.md", "x");
        write(&tmp, "a/note.md", "x");

        let plan = reindexer(&tmp).scan().unwrap();
        let categories: Vec<String> = plan.records.keys().map(ToString::to_string).collect();
        assert_eq!(categories, vec!["", "a"]);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn warnings_are_qualified_with_directory() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "notes/---.md", "x");
        write(&tmp, "notes/Ideas.md", "x");
        write(&tmp, "notes/ideas.md", "y");

        let plan = reindexer(&tmp).scan().unwrap();
        assert_eq!(
            plan.warnings,
            vec![
                "skipped: notes/--- normalizes to empty path",
                "renamed: notes/ideas -> ideas-2 (collision)",
            ]
        );
    }

    /// Local store whose index tree cannot be listed.
    struct UnlistableIndex(LocalFileSystem);

    impl FileSystem for UnlistableIndex {
        fn read_file(&self, path: &str) -> std::io::Result<Option<Vec<u8>>> {
            self.0.read_file(path)
        }
        fn write_file(&self, path: &str, bytes: &[u8]) -> std::io::Result<()> {
            self.0.write_file(path, bytes)
        }
        fn list_directory(&self, path: &str) -> std::io::Result<Vec<crate::fs::DirEntry>> {
            if path.starts_with(crate::index::store::INDEX_DIR) {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
            }
            self.0.list_directory(path)
        }
        fn delete_file(&self, path: &str) -> std::io::Result<()> {
            self.0.delete_file(path)
        }
        fn rename(&self, from: &str, to: &str) -> std::io::Result<()> {
            self.0.rename(from, to)
        }
        fn exists(&self, path: &str) -> bool {
            self.0.exists(path)
        }
    }

    #[test]
    fn unlistable_index_aborts_reindex() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a/note.md", "x");
        let fs: Arc<dyn FileSystem> = Arc::new(UnlistableIndex(LocalFileSystem::new(tmp.path())));
        let store = CategoryIndexStore::new(fs.clone());
        let reindexer = Reindexer::new(fs, store, Arc::new(CharRatioEstimator::default()));

        let err = reindexer.reindex().unwrap_err();
        assert_eq!(err.code(), "INDEX_ERROR");
        assert!(reindexer.scan().is_err());
        assert!(!tmp.path().join(".index").exists());
    }
}
