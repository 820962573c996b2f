//! Named units of work that drive resources and record their outcome.
pub mod context;
pub mod link;
mod processing;
pub mod report;
pub mod tidy;

pub use context::Context;
pub use processing::{TaskResult, TaskStats, process};
pub use report::{Change, Report, ReportItem, Subject};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be scanned, the plan is
    /// inconsistent, or a filesystem change fails.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed, so the caller can
/// stop before running anything else.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Ok(TaskResult::Conflicts(n)) => {
            let noun = if n == 1 { "conflict" } else { "conflicts" };
            ctx.log.record_task(
                task.name(),
                TaskStatus::Conflicts,
                Some(&format!("{n} {noun}")),
            );
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            return Err(e);
        }
    }
    Ok(())
}

/// Shared helpers for task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::logging::{Log, Logger};

    use super::Context;

    /// Build a [`Context`] for host `myhost`, returning the [`Logger`] so
    /// tests can inspect recorded task state.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn make_context(dry_run: bool) -> (Context, Arc<Logger>) {
        let settings = Settings::new("myhost").expect("valid host");
        let log = Arc::new(Logger::new(None));
        let ctx = Context::new(
            Arc::new(settings),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
        );
        (ctx, log)
    }
}
