//! `link`: create the missing directories and symlinks for the source tree.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::link::LinkDotfiles;

/// Run the link command.
///
/// # Errors
///
/// Returns a [`UsageError`](crate::error::UsageError) for bad directory
/// arguments, or an error if the host cannot be resolved or linking fails.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Arc<Logger>) -> Result<()> {
    let dirs = super::resolve_dirs(opts.target.as_deref(), opts.source.as_deref())?;
    let ctx = super::make_context(global, log, opts.dry_run)?;

    let task = LinkDotfiles::new(dirs.source, dirs.target);
    super::run_tasks_to_completion([&task as &dyn Task], &ctx, log)
}
