//! Remove broken symlinks from the top of the target directory.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::report::{Report, ReportItem, Subject};
use super::{Context, Task, TaskResult, process};
use crate::resources::DanglingLink;

/// Remove every broken symlink directly inside `dir`.
///
/// Only direct children are examined; regular files, directories and live
/// links are left untouched.  A link is live if following it reaches
/// something; relative referents are shown resolved against `dir`.
///
/// # Errors
///
/// Returns an error if `dir` cannot be listed or a link cannot be read or
/// removed.
pub fn sweep(ctx: &Context, dir: &Path) -> Result<Report> {
    let mut report = Report::default();
    for path in ctx.fs_ops.read_dir(dir)? {
        let link = DanglingLink::new(path.clone(), Arc::clone(&ctx.fs_ops));
        let Some(referent) = link.referent()? else {
            continue;
        };
        if ctx.fs_ops.exists(&path) {
            ctx.log.debug(&format!(
                "live link: {} -> {}",
                path.display(),
                referent.display()
            ));
            continue;
        }
        let change = process(ctx, &link)?;
        report.record(
            ctx,
            ReportItem {
                target: path,
                subject: Subject::BrokenLink { referent },
                change,
            },
        );
    }
    Ok(report)
}

/// Sweep broken links out of the target directory.
#[derive(Debug, Clone)]
pub struct TidyBrokenLinks {
    /// Directory to sweep (usually home).
    pub dir: PathBuf,
}

impl TidyBrokenLinks {
    /// Create a tidy task for `dir`.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Task for TidyBrokenLinks {
    fn name(&self) -> &'static str {
        "Tidy broken links"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let report = sweep(ctx, &self.dir)?;
        Ok(report.stats().finish(ctx))
    }
}
