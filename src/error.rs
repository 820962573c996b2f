//! Domain-specific error types for the dotfile manager.
//!
//! Internal modules return typed errors (e.g., [`PlanError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.  `main` downcasts to
//! [`UsageError`] to choose the exit status.
//!
//! # Error hierarchy
//!
//! ```text
//! UsageError  : bad invocation, exit status 2, nothing touched
//! ConfigError : host identity or settings cannot be resolved
//! PlanError   : the plan violates a mapping invariant
//! ```
//!
//! Conflicts at the target are *not* errors; they are reported per item by
//! the reconciler and the run still succeeds.

use std::path::PathBuf;

use thiserror::Error;

/// Errors caused by how the program was invoked.
///
/// These map to exit status 2 and are raised before any filesystem mutation.
#[derive(Error, Debug)]
pub enum UsageError {
    /// A directory argument does not resolve to an existing directory.
    #[error("{role} {} is not a directory!", .path.display())]
    NotADirectory {
        /// Which argument was wrong (`TARGET_DIR` or `SOURCE_DIR`).
        role: &'static str,
        /// The resolved, absolute path that was checked.
        path: PathBuf,
    },

    /// The home directory is needed for a default but cannot be determined.
    #[error("cannot determine home directory: neither HOME nor USERPROFILE is set")]
    HomeNotSet,
}

/// Errors that arise while resolving run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The operating system did not report a usable machine name.
    #[error("cannot determine host name: {0}")]
    HostUnavailable(String),

    /// A host name was supplied but is empty.
    #[error("host name must not be empty")]
    EmptyHost,

    /// The host-suffix separator is empty.
    #[error("host-suffix separator must not be empty")]
    EmptySeparator,
}

/// Errors that arise while turning a scan into a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    /// A scanned path does not live under the source root.
    #[error("{} is not inside source directory {}", .path.display(), .root.display())]
    OutsideSourceRoot {
        /// The offending scanned path.
        path: PathBuf,
        /// The source root of the scan.
        root: PathBuf,
    },

    /// Two source entries resolved to the same target path.
    #[error(
        "{} and {} both map to {}",
        .first.display(),
        .second.display(),
        .target.display()
    )]
    DuplicateTarget {
        /// The contested target path.
        target: PathBuf,
        /// Source of the action planned first.
        first: PathBuf,
        /// Source of the action that collided with it.
        second: PathBuf,
    },
}
