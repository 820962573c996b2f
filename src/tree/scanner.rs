//! Source tree walk.
//!
//! One recursive pass over the source root.  Direct children must carry a
//! leading dot (everything else at the top is project scaffolding such as a
//! README); deeper entries go through the nested [`PathFilter`] rules.
//! Ineligible directories are pruned before descent, so nothing beneath a
//! `.git` directory is ever visited.
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use walkdir::WalkDir;

use super::filter::{PathFilter, Scope};
use super::{Entry, EntryKind, SkipReason, Skipped};
use crate::config::Settings;

/// Everything the scanner found, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// The source root that was scanned.
    pub root: PathBuf,
    /// Dotted direct children of the root.
    pub top_level: Vec<Entry>,
    /// Eligible entries below the top-level directories.
    pub nested: Vec<Entry>,
    /// Entries that were excluded, in walk order.
    pub skipped: Vec<Skipped>,
}

impl ScanResult {
    /// All entries, top-level first, each group sorted by path.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.top_level.iter().chain(&self.nested)
    }

    /// All directories, top-level first.
    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.entries()
            .filter(|e| e.kind() == EntryKind::Directory)
            .map(Entry::path)
    }

    /// All files, top-level first.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries()
            .filter(|e| e.kind() == EntryKind::File)
            .map(Entry::path)
    }
}

/// Walks a source tree applying the [`PathFilter`].
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    filter: PathFilter<'a>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner using the rules in `settings`.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self {
            filter: PathFilter::new(settings),
        }
    }

    /// Scan `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read or an entry's metadata
    /// cannot be queried for any reason other than a dangling symlink.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let mut result = ScanResult {
            root: root.to_path_buf(),
            ..ScanResult::default()
        };

        // Symlinked directories are recorded but not descended into.
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(item) = walker.next() {
            let dirent = item.with_context(|| format!("scanning {}", root.display()))?;
            let path = dirent.path().to_path_buf();
            let top_level = dirent.depth() == 1;

            match self.classify(&path, top_level)? {
                Ok(kind) => {
                    let entry = Entry::new(kind, path);
                    if top_level {
                        result.top_level.push(entry);
                    } else {
                        result.nested.push(entry);
                    }
                }
                Err(reason) => {
                    if dirent.file_type().is_dir() {
                        walker.skip_current_dir();
                    }
                    result.skipped.push(Skipped { path, reason });
                }
            }
        }

        result.top_level.sort_by(|a, b| a.path().cmp(b.path()));
        result.nested.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(result)
    }

    /// Decide whether `path` is eligible.  The outer `Result` carries I/O
    /// failures; the inner one the filter's verdict.
    fn classify(
        self,
        path: &Path,
        top_level: bool,
    ) -> Result<std::result::Result<EntryKind, SkipReason>> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(Err(SkipReason::NonUtf8Name));
        };
        let scope = if top_level {
            Scope::TopLevel
        } else {
            Scope::Nested
        };
        let kind = if name.ends_with('~') {
            None
        } else {
            probe_kind(path)?
        };
        let verdict = self.filter.check(name, kind, scope);
        if top_level && verdict.is_ok() && !name.starts_with('.') {
            return Ok(Err(SkipReason::NotDotted));
        }
        Ok(verdict)
    }
}

/// Kind of `path`, following symlinks; `None` for dangling symlinks and
/// special files.
fn probe_kind(path: &Path) -> Result<Option<EntryKind>> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
        Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading metadata: {}", path.display())),
    }
}
