//! `tidy`: remove broken symlinks from the target directory.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, TidyOpts};
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::tidy::TidyBrokenLinks;

/// Run the tidy command.
///
/// # Errors
///
/// Returns a [`UsageError`](crate::error::UsageError) for a bad directory
/// argument, or an error if a broken link cannot be removed.
pub fn run(global: &GlobalOpts, opts: &TidyOpts, log: &Arc<Logger>) -> Result<()> {
    let target = super::resolve_dir(
        "TARGET_DIR",
        opts.target.as_deref().unwrap_or_else(|| Path::new("~")),
        super::home_dir,
    )?;
    let ctx = super::make_context(global, log, opts.dry_run)?;

    let task = TidyBrokenLinks::new(target);
    super::run_tasks_to_completion([&task as &dyn Task], &ctx, log)
}
