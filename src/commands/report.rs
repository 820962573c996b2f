//! `report`: show what `link` and `tidy` would do, without changing anything.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, ReportOpts};
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::link::LinkDotfiles;
use crate::tasks::tidy::TidyBrokenLinks;

/// Run the report command: link and tidy, both as a dry run.
///
/// # Errors
///
/// Returns a [`UsageError`](crate::error::UsageError) for bad directory
/// arguments, or an error if the trees cannot be inspected.
pub fn run(global: &GlobalOpts, opts: &ReportOpts, log: &Arc<Logger>) -> Result<()> {
    let dirs = super::resolve_dirs(opts.target.as_deref(), opts.source.as_deref())?;
    let ctx = super::make_context(global, log, true)?;

    let link = LinkDotfiles::new(dirs.source, dirs.target.clone());
    let tidy = TidyBrokenLinks::new(dirs.target);
    let tasks: [&dyn Task; 2] = [&link, &tidy];
    super::run_tasks_to_completion(tasks, &ctx, log)
}
