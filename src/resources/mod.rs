//! Idempotent target-tree primitives (check + apply pattern).
//!
//! Every planned action becomes a resource that can report its current
//! state and, if that state is not yet the desired one, apply itself.
//! Conflicts are a state, not an error: a blocked resource is never applied.
pub mod dangling;
pub mod directory;
pub mod helpers;
pub mod symlink;

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

pub use dangling::DanglingLink;
pub use directory::DirectoryResource;
pub use symlink::SymlinkResource;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Bring the resource into its desired state.
    ///
    /// Only called when [`Resource::current_state`] reported
    /// [`ResourceState::Missing`] or [`ResourceState::Incorrect`].
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem operation fails.
    fn apply(&self) -> Result<ResourceChange>;
}

/// What currently occupies a target path that should be ours.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dotfilemanager::resources::Conflict;
///
/// let c = Conflict::AlreadySymlinked(PathBuf::from("/elsewhere/.bashrc"));
/// assert_eq!(c.to_string(), "already symlinked to /elsewhere/.bashrc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// A symlink to some other referent.
    AlreadySymlinked(PathBuf),
    /// A regular file.
    FileInTheWay,
    /// A real directory where a symlink should go.
    DirectoryInTheWay,
    /// A mount point.
    MountPointInTheWay,
    /// A fifo, socket, device or other special node.
    OtherInTheWay,
    /// An ancestor directory could not be created because of its own
    /// conflict.
    ParentBlocked(PathBuf),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySymlinked(existing) => {
                write!(f, "already symlinked to {}", existing.display())
            }
            Self::FileInTheWay => write!(f, "file in the way"),
            Self::DirectoryInTheWay => write!(f, "directory in the way"),
            Self::MountPointInTheWay => write!(f, "mount point in the way"),
            Self::OtherInTheWay => write!(f, "special file in the way"),
            Self::ParentBlocked(dir) => write!(f, "parent {} is blocked", dir.display()),
        }
    }
}

/// State of a resource at the target.
///
/// # Examples
///
/// ```
/// use dotfilemanager::resources::{Conflict, ResourceState};
///
/// let missing = ResourceState::Missing;
/// let blocked = ResourceState::Blocked(Conflict::FileInTheWay);
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert!(matches!(blocked, ResourceState::Blocked(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing is at the target path yet.
    Missing,
    /// The target already matches the desired state.
    Correct,
    /// Something of ours is at the target but must change (e.g. a broken
    /// link that should be removed).
    Incorrect {
        /// What is there now.
        current: String,
    },
    /// Something that is not ours occupies the target.
    Blocked(Conflict),
}

/// Result of applying a resource change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// The filesystem was changed.
    Applied,
    /// The desired state appeared between check and apply.
    AlreadyCorrect,
}

/// Resources that can determine their own state.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be inspected for any reason
    /// other than not existing.
    fn current_state(&self) -> Result<ResourceState>;

    /// Whether [`Applicable::apply`] would do anything.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}
