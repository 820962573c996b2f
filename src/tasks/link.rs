//! Link the source tree into the target tree.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::report::{Change, Report, ReportItem, Subject};
use super::{Context, Task, TaskResult, process};
use crate::plan::{Plan, PlanBuilder};
use crate::resources::{Conflict, DirectoryResource, SymlinkResource};
use crate::tree::Scanner;

/// Realise `plan` against the filesystem.
///
/// All directories are handled before any link.  A directory blocked by a
/// conflict blocks every action beneath it, so nothing is created through
/// something that is not ours.  Existing content is never replaced.
///
/// # Errors
///
/// Returns an error on the first filesystem failure.
pub fn reconcile(ctx: &Context, plan: &Plan) -> Result<Report> {
    let mut report = Report::default();
    for skipped in &plan.skipped {
        report.skip(ctx, skipped.clone());
    }

    let mut blocked: Vec<&Path> = Vec::new();

    for dir in &plan.dirs {
        let change = match blocked_ancestor(&blocked, &dir.target) {
            Some(parent) => Change::Conflict(Conflict::ParentBlocked(parent.to_path_buf())),
            None => process(ctx, &DirectoryResource::new(dir.target.clone()))?,
        };
        if matches!(change, Change::Conflict(_)) {
            blocked.push(&dir.target);
        }
        report.record(
            ctx,
            ReportItem {
                target: dir.target.clone(),
                subject: Subject::Directory,
                change,
            },
        );
    }

    for link in &plan.links {
        let change = match blocked_ancestor(&blocked, &link.target) {
            Some(parent) => Change::Conflict(Conflict::ParentBlocked(parent.to_path_buf())),
            None => process(
                ctx,
                &SymlinkResource::new(link.source.clone(), link.target.clone()),
            )?,
        };
        report.record(
            ctx,
            ReportItem {
                target: link.target.clone(),
                subject: Subject::Symlink {
                    source: link.source.clone(),
                },
                change,
            },
        );
    }

    Ok(report)
}

/// The outermost blocked directory containing `target`, if any.
fn blocked_ancestor<'p>(blocked: &[&'p Path], target: &Path) -> Option<&'p Path> {
    blocked
        .iter()
        .copied()
        .find(|dir| target != *dir && target.starts_with(dir))
}

/// Scan `source`, plan against `target`, and reconcile.
#[derive(Debug, Clone)]
pub struct LinkDotfiles {
    /// Root of the dotfiles repository.
    pub source: PathBuf,
    /// Directory the links are placed in (usually home).
    pub target: PathBuf,
}

impl LinkDotfiles {
    /// Create a link task.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Task for LinkDotfiles {
    fn name(&self) -> &'static str {
        "Link dotfiles"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let scan = Scanner::new(&ctx.settings)
            .scan(&self.source)
            .with_context(|| format!("scanning {}", self.source.display()))?;
        let plan = PlanBuilder::new(&ctx.settings).build(&scan, &self.target)?;
        ctx.log.debug(&format!(
            "host {}: {} directories, {} links, {} skipped",
            ctx.settings.host(),
            plan.dirs.len(),
            plan.links.len(),
            plan.skipped.len()
        ));

        let report = reconcile(ctx, &plan)?;
        Ok(report.stats().finish(ctx))
    }
}
