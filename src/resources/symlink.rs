//! Symlink resource.
use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::helpers::fs::{create_symlink, is_mount_point, resolve_referent, same_path};
use super::{Applicable, Conflict, Resource, ResourceChange, ResourceState};

/// A symlink `target -> source` that should exist.
///
/// Strictly additive: an existing link is only ever accepted as correct,
/// never replaced.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink goes).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        create_symlink(&self.source, &self.target)
            .with_context(|| format!("create link: {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        let meta = match std::fs::symlink_metadata(&self.target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ResourceState::Missing),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading metadata: {}", self.target.display()));
            }
        };

        if meta.file_type().is_symlink() {
            let referent = std::fs::read_link(&self.target)
                .with_context(|| format!("reading link: {}", self.target.display()))?;
            let existing = resolve_referent(&self.target, &referent);
            let reaches_source = if self.target.exists() {
                same_path(&self.target, &self.source)
            } else {
                same_path(&existing, &self.source)
            };
            if reaches_source {
                return Ok(ResourceState::Correct);
            }
            return Ok(ResourceState::Blocked(Conflict::AlreadySymlinked(existing)));
        }

        let conflict = if meta.is_file() {
            Conflict::FileInTheWay
        } else if meta.is_dir() {
            if is_mount_point(&self.target)? {
                Conflict::MountPointInTheWay
            } else {
                Conflict::DirectoryInTheWay
            }
        } else {
            Conflict::OtherInTheWay
        };
        Ok(ResourceState::Blocked(conflict))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn symlink_resource_description() {
        let resource = SymlinkResource::new(PathBuf::from("/source"), PathBuf::from("/target"));
        assert_eq!(resource.description(), "/target -> /source");
    }

    #[test]
    fn missing_when_target_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::write(&source, "x").unwrap();

        let resource = SymlinkResource::new(source, dir.path().join("target"));
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
    }

    #[cfg(unix)]
    #[test]
    fn apply_creates_link_then_state_is_correct() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();

        let resource = SymlinkResource::new(source.clone(), target.clone());
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_link(&target).unwrap(), source);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[cfg(unix)]
    #[test]
    fn relative_link_to_source_is_correct() {
        let dir = tempfile::tempdir().unwrap();
        let src_dir = dir.path().join(".dotfiles");
        std::fs::create_dir(&src_dir).unwrap();
        let source = src_dir.join(".bashrc");
        std::fs::write(&source, "x").unwrap();
        let target = dir.path().join(".bashrc");
        std::os::unix::fs::symlink(".dotfiles/.bashrc", &target).unwrap();

        let resource = SymlinkResource::new(source, target);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[cfg(unix)]
    #[test]
    fn link_elsewhere_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let other = dir.path().join("other");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::fs::write(&other, "y").unwrap();
        std::os::unix::fs::symlink(&other, &target).unwrap();

        let resource = SymlinkResource::new(source, target);
        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Blocked(Conflict::AlreadySymlinked(other))
        );
    }

    #[cfg(unix)]
    #[test]
    fn broken_link_elsewhere_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), &target).unwrap();

        let resource = SymlinkResource::new(source, target);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Blocked(Conflict::AlreadySymlinked(_))
        ));
    }

    #[test]
    fn regular_file_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::fs::write(&target, "mine").unwrap();

        let resource = SymlinkResource::new(source, target);
        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Blocked(Conflict::FileInTheWay)
        );
    }

    #[test]
    fn directory_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::fs::create_dir(&target).unwrap();

        let resource = SymlinkResource::new(source, target);
        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Blocked(Conflict::DirectoryInTheWay)
        );
    }

    #[cfg(unix)]
    #[test]
    fn link_through_symlinked_ancestor_elsewhere_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("outside/deep");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(dir.path().join("outside/source"), "other").unwrap();
        std::os::unix::fs::symlink(&deep, dir.path().join("sub")).unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::os::unix::fs::symlink("sub/../source", &target).unwrap();

        let resource = SymlinkResource::new(source, target);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Blocked(Conflict::AlreadySymlinked(_))
        ));
    }
}
