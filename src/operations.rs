//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the tidy sweep can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

#[cfg(test)]
use crate::resources::helpers::fs::resolve_referent;

/// Abstraction over the filesystem queries made by the tidy sweep.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` itself is a symbolic link.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf>;

    /// Remove the file or symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove(&self, path: &Path) -> std::io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)
            .with_context(|| format!("reading directory {}", path.display()))?
            .map(|e| e.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("reading entry in {}", path.display()))?;
        entries.sort();
        Ok(entries)
    }

    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn remove(&self, path: &Path) -> std::io::Result<()> {
        // Directory symlinks on Windows are removed with `remove_dir`.
        #[cfg(windows)]
        {
            use std::os::windows::fs::MetadataExt as _;
            let meta = std::fs::symlink_metadata(path)?;
            if meta.file_attributes() & 0x10 != 0 {
                return std::fs::remove_dir(path);
            }
        }
        std::fs::remove_file(path)
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths, symlinks, and directory listings using the
/// builder-style methods, then inject it with
/// [`Context::with_fs_ops`](crate::tasks::Context::with_fs_ops).
///
/// # Example
///
/// ```ignore
/// use dotfilemanager::operations::MockFileSystemOps;
/// use std::path::PathBuf;
///
/// let fs = MockFileSystemOps::new()
///     .with_symlink("/home/u/.oldrc", "/gone/.oldrc")
///     .with_dir_entries("/home/u", vec![PathBuf::from("/home/u/.oldrc")]);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: Vec<PathBuf>,
    dirs: std::collections::HashMap<PathBuf, Vec<PathBuf>>,
    symlinks: std::collections::HashMap<PathBuf, PathBuf>,
    removed: std::sync::Mutex<std::collections::HashSet<PathBuf>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing (a file or directory).
    #[must_use]
    pub fn with_existing(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        if !self.existing.contains(&p) {
            self.existing.push(p);
        }
        self
    }

    /// Set the directory entries returned by [`FileSystemOps::read_dir`] for `dir`.
    ///
    /// Also marks `dir` itself as existing.
    #[must_use]
    pub fn with_dir_entries(mut self, dir: impl Into<PathBuf>, entries: Vec<PathBuf>) -> Self {
        let d = dir.into();
        if !self.existing.contains(&d) {
            self.existing.push(d.clone());
        }
        self.dirs.insert(d, entries);
        self
    }

    /// Register `path` as a symbolic link whose stored referent is `target`.
    ///
    /// [`FileSystemOps::exists`] follows the link, so whether it is broken
    /// depends on whether the resolved referent was registered with
    /// [`with_existing`](Self::with_existing).
    #[must_use]
    pub fn with_symlink(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.symlinks.insert(path.into(), target.into());
        self
    }

    /// Paths removed so far, sorted.
    pub fn removed(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = self
            .removed
            .lock()
            .expect("mock removed set poisoned")
            .iter()
            .cloned()
            .collect();
        out.sort();
        out
    }

    fn is_removed(&self, path: &Path) -> bool {
        self.removed
            .lock()
            .expect("mock removed set poisoned")
            .contains(path)
    }
}

#[cfg(test)]
const MOCK_MAX_LINK_HOPS: usize = 40;

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        let mut current = path.to_path_buf();
        for _ in 0..MOCK_MAX_LINK_HOPS {
            if self.is_removed(&current) {
                return false;
            }
            match self.symlinks.get(&current) {
                Some(referent) => current = resolve_referent(&current, referent),
                None => return self.existing.contains(&current),
            }
        }
        false
    }

    fn is_symlink(&self, path: &Path) -> bool {
        !self.is_removed(path) && self.symlinks.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries: Vec<PathBuf> = self
            .dirs
            .get(path)
            .ok_or_else(|| anyhow::anyhow!("mock: no entries configured for {}", path.display()))?
            .iter()
            .filter(|p| !self.is_removed(p))
            .cloned()
            .collect();
        entries.sort();
        Ok(entries)
    }

    fn read_link(&self, path: &Path) -> std::io::Result<PathBuf> {
        if self.is_removed(path) {
            return Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        }
        self.symlinks
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::InvalidInput))
    }

    fn remove(&self, path: &Path) -> std::io::Result<()> {
        self.removed
            .lock()
            .map_err(|_| std::io::Error::other("mock removed set poisoned"))?
            .insert(path.to_path_buf());
        Ok(())
    }
}
