// Shared helpers for integration tests.
//
// Provides a temporary source tree and target directory with a fluent
// builder, so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotfilemanager::config::Settings;
use dotfilemanager::logging::{Log, Logger};
use dotfilemanager::tasks::Context;

/// Host name used by every fixture unless a test overrides it.
pub const HOST: &str = "myhost";

/// A source tree and an empty target directory inside one temp dir.
///
/// Both are deleted when dropped (via the underlying [`tempfile::TempDir`]).
pub struct TestTree {
    tmp: tempfile::TempDir,
    /// The dotfiles repository.
    pub source: PathBuf,
    /// The directory links are placed in.
    pub target: PathBuf,
}

impl TestTree {
    /// Create empty `source/` and `target/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        std::fs::create_dir_all(&source).expect("create source dir");
        std::fs::create_dir_all(&target).expect("create target dir");
        Self {
            tmp,
            source,
            target,
        }
    }

    /// The temp dir holding both trees.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Replace the temp dir prefix with `[tmp]` so output can be snapshotted.
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.root().display().to_string(), "[tmp]")
    }
}

/// Fluent builder for [`TestTree`].
pub struct TestTreeBuilder {
    tree: TestTree,
}

impl TestTreeBuilder {
    /// Begin building an empty tree.
    pub fn new() -> Self {
        Self {
            tree: TestTree::new(),
        }
    }

    /// Write a file at `rel` inside the source tree, creating parents.
    pub fn source_file(self, rel: &str) -> Self {
        write_file(&self.tree.source.join(rel), rel);
        self
    }

    /// Create a directory at `rel` inside the source tree.
    pub fn source_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.tree.source.join(rel)).expect("create source subdir");
        self
    }

    /// Write a file with `content` at `rel` inside the target directory.
    pub fn target_file(self, rel: &str, content: &str) -> Self {
        let path = self.tree.target.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create target parent");
        }
        std::fs::write(path, content).expect("write target file");
        self
    }

    /// Create a symlink at `rel` inside the target pointing at `referent`.
    #[cfg(unix)]
    pub fn target_symlink(self, rel: &str, referent: impl AsRef<Path>) -> Self {
        std::os::unix::fs::symlink(referent, self.tree.target.join(rel))
            .expect("create target symlink");
        self
    }

    /// Finalise the tree.
    pub fn build(self) -> TestTree {
        self.tree
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Build a task [`Context`] for [`HOST`], returning the logger for
/// inspecting recorded task state.
pub fn context(dry_run: bool) -> (Context, Arc<Logger>) {
    let settings = Settings::new(HOST).expect("valid host");
    let log = Arc::new(Logger::new(None));
    let ctx = Context::new(
        Arc::new(settings),
        Arc::clone(&log) as Arc<dyn Log>,
        dry_run,
    );
    (ctx, log)
}

/// Every path under `dir`, relative and sorted, with symlinks shown as
/// `path -> referent`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.expect("walk entry");
        let rel = entry
            .path()
            .strip_prefix(dir)
            .expect("under dir")
            .display()
            .to_string();
        if entry.path_is_symlink() {
            let referent = std::fs::read_link(entry.path()).expect("read link");
            out.push(format!("{rel} -> {}", referent.display()));
        } else if entry.file_type().is_dir() {
            out.push(format!("{rel}/"));
        } else {
            out.push(rel);
        }
    }
    out
}
