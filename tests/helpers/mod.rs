#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use cortex::index::updater::UpdateOptions;
use cortex::index::CategoryIndex;
use cortex::memory::repository::MemoryRepository;
use cortex::path::{CategoryPath, MemoryPath};
use tempfile::TempDir;

/// A fresh, empty store in a temp directory.
pub fn test_store() -> (TempDir, MemoryRepository) {
    let tmp = TempDir::new().unwrap();
    let repo = MemoryRepository::open(tmp.path(), UpdateOptions::default());
    (tmp, repo)
}

pub fn cat(raw: &str) -> CategoryPath {
    CategoryPath::parse(raw).unwrap()
}

pub fn mem(raw: &str) -> MemoryPath {
    MemoryPath::parse(raw).unwrap()
}

/// Write a memory file directly, bypassing the repository and the index.
/// `rel` is store-relative and may use names that are not slugs.
pub fn write_raw_memory(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let raw = format!(
        "---\ncreated_at: 2026-03-01T09:00:00Z\nupdated_at: 2026-03-01T09:00:00Z\ntags: []\nsource: user\n---\n{body}"
    );
    std::fs::write(path, raw).unwrap();
}

/// Every index record file under the store, keyed by store-relative path.
pub fn index_snapshot(root: &Path) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    collect(root, &root.join(".index"), &mut out);
    out
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            out.insert(rel, std::fs::read_to_string(&path).unwrap());
        }
    }
}

/// Read a record, panicking if it is missing or unreadable.
pub fn record(repo: &MemoryRepository, category: &str) -> CategoryIndex {
    repo.index()
        .read(&cat(category))
        .unwrap()
        .unwrap_or_else(|| panic!("no index record for {category:?}"))
}

/// `(path, memory_count)` pairs of a record's subcategories.
pub fn subcategory_counts(record: &CategoryIndex) -> Vec<(String, usize)> {
    record
        .subcategories
        .iter()
        .map(|s| (s.path.to_string(), s.memory_count))
        .collect()
}

/// Paths of a record's memories.
pub fn memory_paths(record: &CategoryIndex) -> Vec<String> {
    record.memories.iter().map(|m| m.path.to_string()).collect()
}
