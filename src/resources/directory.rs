//! Directory resource.
use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{Applicable, Conflict, Resource, ResourceChange, ResourceState};

/// A directory that must exist at `path`.
///
/// A symlink that resolves to a directory counts as present; links beneath
/// it are created through it.
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    /// Target directory path.
    pub path: PathBuf,
}

impl DirectoryResource {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Applicable for DirectoryResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.path.is_dir() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("create directory: {}", self.path.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DirectoryResource {
    fn current_state(&self) -> Result<ResourceState> {
        let meta = match std::fs::symlink_metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ResourceState::Missing),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading metadata: {}", self.path.display()));
            }
        };

        let file_type = meta.file_type();
        if file_type.is_dir() || (file_type.is_symlink() && self.path.is_dir()) {
            Ok(ResourceState::Correct)
        } else if file_type.is_symlink() {
            let referent = std::fs::read_link(&self.path)
                .with_context(|| format!("reading link: {}", self.path.display()))?;
            Ok(ResourceState::Blocked(Conflict::AlreadySymlinked(
                super::helpers::fs::resolve_referent(&self.path, &referent),
            )))
        } else if file_type.is_file() {
            Ok(ResourceState::Blocked(Conflict::FileInTheWay))
        } else {
            Ok(ResourceState::Blocked(Conflict::OtherInTheWay))
        }
    }
}
