//! Broken-symlink resource used by the tidy sweep.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::helpers::fs::resolve_referent;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::operations::FileSystemOps;

/// A symlink at `path` that should not exist if its referent is gone.
///
/// The desired state is "no broken link here": a link that still resolves is
/// correct and is left alone, as is a path that is not a link at all.
/// Liveness is decided by following the link itself; the lexically resolved
/// referent is only used for messages.
#[derive(Debug, Clone)]
pub struct DanglingLink {
    /// The symlink itself.
    pub path: PathBuf,
    fs_ops: Arc<dyn FileSystemOps>,
}

impl DanglingLink {
    /// Create a resource for the link at `path`.
    #[must_use]
    pub fn new(path: PathBuf, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self { path, fs_ops }
    }

    /// Resolved referent of the link, or `None` if `path` is not a link.
    ///
    /// # Errors
    ///
    /// Returns an error if the link exists but cannot be read.
    pub fn referent(&self) -> Result<Option<PathBuf>> {
        if !self.fs_ops.is_symlink(&self.path) {
            return Ok(None);
        }
        let raw = self
            .fs_ops
            .read_link(&self.path)
            .with_context(|| format!("reading link: {}", self.path.display()))?;
        Ok(Some(resolve_referent(&self.path, &raw)))
    }
}

impl Applicable for DanglingLink {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.fs_ops.is_symlink(&self.path) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.fs_ops
            .remove(&self.path)
            .with_context(|| format!("removing broken symlink: {}", self.path.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DanglingLink {
    fn current_state(&self) -> Result<ResourceState> {
        match self.referent()? {
            Some(referent) if !self.fs_ops.exists(&self.path) => Ok(ResourceState::Incorrect {
                current: referent.display().to_string(),
            }),
            _ => Ok(ResourceState::Correct),
        }
    }
}
