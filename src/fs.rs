//! Raw file access for a single store.
//!
//! The [`FileSystem`] trait is the seam between the index engine and the disk.
//! All paths are store-relative and `/`-separated; the empty string is the
//! store root. [`LocalFileSystem`] is the production implementation.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

/// Blocking file primitives, rooted at a store directory.
///
/// All methods are synchronous; callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait FileSystem: Send + Sync {
    /// Read a whole file. `Ok(None)` if it does not exist.
    fn read_file(&self, path: &str) -> io::Result<Option<Vec<u8>>>;

    /// Create or replace a file, creating parent directories as needed.
    fn write_file(&self, path: &str, bytes: &[u8]) -> io::Result<()>;

    /// List the direct children of a directory. A missing directory lists as empty.
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>>;

    /// Delete a file. No-op if it does not exist.
    fn delete_file(&self, path: &str) -> io::Result<()>;

    /// Move a file, creating the destination's parent directories.
    fn rename(&self, from: &str, to: &str) -> io::Result<()>;

    fn exists(&self, path: &str) -> bool;
}

/// [`FileSystem`] backed by a directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Remove now-empty directories from `dir` upwards, stopping at the root.
    fn prune_empty_dirs(&self, mut dir: Option<&Path>) {
        while let Some(current) = dir {
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            // Fails (and stops) as soon as a directory is non-empty.
            if std::fs::remove_dir(current).is_err() {
                break;
            }
            dir = current.parent();
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn read_file(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.resolve(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Atomic write: tmp file + rename.
    fn write_file(&self, path: &str, bytes: &[u8]) -> io::Result<()> {
        let dest = self.resolve(path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut tmp_name = dest.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = dest.with_file_name(tmp_name);
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, &dest)
    }

    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let dir = self.resolve(path);
        let read_dir = match std::fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let file_type = entry.file_type()?;
            // A lossy name could not be opened again, so such entries are skipped.
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(dir = %dir.display(), name = ?raw, "skipping entry with a non-UTF-8 name");
                    continue;
                }
            };
            entries.push(DirEntry {
                name,
                is_directory: file_type.is_dir(),
            });
        }
        Ok(entries)
    }

    fn delete_file(&self, path: &str) -> io::Result<()> {
        let target = self.resolve(path);
        match std::fs::remove_file(&target) {
            Ok(()) => {
                self.prune_empty_dirs(target.parent());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        let src = self.resolve(from);
        let dest = self.resolve(to);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(&src, &dest)?;
        self.prune_empty_dirs(src.parent());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}
