//! Source-tree model: scanned entries, eligibility rules, host variants.
//!
//! - [`filter`]: per-name eligibility ([`PathFilter`])
//! - [`variant`]: host-suffix resolution ([`HostVariants`])
//! - [`scanner`]: one sorted walk of the source tree ([`Scanner`])
pub mod filter;
pub mod scanner;
pub mod variant;

use std::fmt;
use std::path::{Path, PathBuf};

pub use filter::{PathFilter, Scope};
pub use scanner::{ScanResult, Scanner};
pub use variant::{HostVariants, Resolution};

/// Kind of a source entry, detected once by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or a symlink to one).
    File,
    /// A directory (or a symlink to one).
    Directory,
}

/// A file or directory in the source tree, identified by absolute path.
///
/// # Examples
///
/// ```
/// use dotfilemanager::tree::{Entry, EntryKind};
///
/// let entry = Entry::File("/src/.bashrc".into());
/// assert_eq!(entry.kind(), EntryKind::File);
/// assert_eq!(entry.file_name(), Some(".bashrc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Entry {
    /// A file to be symlinked.
    File(PathBuf),
    /// A directory to be mirrored.
    Directory(PathBuf),
}

impl Entry {
    /// Build an entry of the given kind.
    #[must_use]
    pub const fn new(kind: EntryKind, path: PathBuf) -> Self {
        match kind {
            EntryKind::File => Self::File(path),
            EntryKind::Directory => Self::Directory(path),
        }
    }

    /// Absolute path in the source tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }

    /// Kind of this entry.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory(_) => EntryKind::Directory,
        }
    }

    /// Final path component as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path().file_name().and_then(|n| n.to_str())
    }
}

/// Why a source path is not linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Editor backup file (`name~`).
    Backup,
    /// Neither a regular file nor a directory (broken symlink, socket, …).
    NotFileOrDirectory,
    /// Leading dot below the top level.
    LeadingDot,
    /// Top-level entry without a leading dot (README, LICENSE, …).
    NotDotted,
    /// One of the manager's own scripts.
    ManagerScript,
    /// On the version-control skip list.
    SkipList,
    /// Name is not valid UTF-8.
    NonUtf8Name,
    /// Host suffix names a different host.
    OtherHost {
        /// The host named by the suffix.
        host: String,
    },
    /// A variant for the current host exists alongside this file.
    HostOverride {
        /// File name of the winning variant.
        winner: String,
    },
    /// Stripping the host suffix leaves no usable base name.
    EmptyBaseName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backup => write!(f, "backup file"),
            Self::NotFileOrDirectory => write!(f, "not a file or directory"),
            Self::LeadingDot => write!(f, "filename has a leading dot"),
            Self::NotDotted => write!(f, "top-level name has no leading dot"),
            Self::ManagerScript => write!(f, "dotfiles script"),
            Self::SkipList => write!(f, "in skip list"),
            Self::NonUtf8Name => write!(f, "filename is not valid UTF-8"),
            Self::OtherHost { host } => write!(f, "different hostname: {host}"),
            Self::HostOverride { winner } => {
                write!(f, "there is a host-specific version of this file: {winner}")
            }
            Self::EmptyBaseName => write!(f, "nothing left after removing host suffix"),
        }
    }
}

/// A source path that was excluded, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Absolute path of the excluded entry.
    pub path: PathBuf,
    /// Why it was excluded.
    pub reason: SkipReason,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipping {} ({})", self.path.display(), self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_accessors() {
        let dir = Entry::new(EntryKind::Directory, PathBuf::from("/src/.config"));
        assert_eq!(dir.kind(), EntryKind::Directory);
        assert_eq!(dir.path(), Path::new("/src/.config"));
        assert_eq!(dir.file_name(), Some(".config"));
    }

    #[test]
    fn skipped_display() {
        let skipped = Skipped {
            path: PathBuf::from("/src/.vimrc__work"),
            reason: SkipReason::OtherHost {
                host: "work".to_string(),
            },
        };
        assert_eq!(
            skipped.to_string(),
            "skipping /src/.vimrc__work (different hostname: work)"
        );
    }
}
