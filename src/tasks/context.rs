use std::sync::Arc;

use crate::config::Settings;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Shared context for task execution.
pub struct Context {
    /// Host identity and filter rules for this run.
    pub settings: Arc<Settings>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("fs_ops", &"<dyn FileSystemOps>")
            .finish()
    }
}

impl Context {
    /// Creates a new context backed by the real filesystem.
    #[must_use]
    pub fn new(settings: Arc<Settings>, log: Arc<dyn Log>, dry_run: bool) -> Self {
        Self {
            settings,
            log,
            dry_run,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            log,
            dry_run: self.dry_run,
            fs_ops: Arc::clone(&self.fs_ops),
        }
    }

    /// Create a copy of this context with a different [`FileSystemOps`] implementation.
    ///
    /// Used in tests to inject a [`MockFileSystemOps`](crate::operations::MockFileSystemOps)
    /// so that tidy can be exercised without touching the real filesystem.
    #[cfg(test)]
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            log: Arc::clone(&self.log),
            dry_run: self.dry_run,
            fs_ops,
        }
    }
}
