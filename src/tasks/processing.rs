//! Generic resource processing: check state, apply unless dry-run, collect stats.
use std::fmt::Write as _;

use anyhow::Result;

use super::context::Context;
use super::report::Change;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfilemanager::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let conflicts = TaskResult::Conflicts(2);
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(conflicts, TaskResult::Conflicts(2)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed and everything is in place.
    Ok,
    /// Task completed but some targets are blocked.
    Conflicts(u32),
    /// Task ran in dry-run mode without conflicts.
    DryRun,
}

/// Counters for tasks that process many items.
///
/// # Examples
///
/// ```
/// use dotfilemanager::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 10;
///
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
///
/// Conflicts and skips are only mentioned when present:
///
/// ```
/// use dotfilemanager::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, conflicts: 1, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 1 conflict, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed, or that would change in dry-run.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items blocked by something at the target.
    pub conflicts: u32,
    /// Number of source entries excluded from linking.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changed: 0,
            already_ok: 0,
            conflicts: 0,
            skipped: 0,
        }
    }

    /// Count one processed item.
    pub fn record(&mut self, change: &Change) {
        match change {
            Change::Applied | Change::WouldApply => self.changed += 1,
            Change::AlreadyCorrect => self.already_ok += 1,
            Change::Conflict(_) => self.conflicts += 1,
        }
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 conflict").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.conflicts > 0 {
            let noun = if self.conflicts == 1 {
                "conflict"
            } else {
                "conflicts"
            };
            let _ = write!(out, ", {} {noun}", self.conflicts);
        }
        if self.skipped > 0 {
            let _ = write!(out, ", {} skipped", self.skipped);
        }
        out
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.conflicts > 0 {
            TaskResult::Conflicts(self.conflicts)
        } else if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.conflicts += other.conflicts;
        self.skipped += other.skipped;
    }
}

/// Check one resource and bring it into its desired state.
///
/// `ctx.dry_run` is the only switch between previewing and applying; the
/// state check is identical in both modes.  Blocked resources are never
/// applied.
///
/// # Errors
///
/// Returns an error if the state check or the apply step fails.
pub fn process<R: Resource>(ctx: &Context, resource: &R) -> Result<Change> {
    let state = resource.current_state()?;
    ctx.log
        .debug(&format!("check {}: {state:?}", resource.description()));
    match state {
        ResourceState::Correct => Ok(Change::AlreadyCorrect),
        ResourceState::Blocked(conflict) => Ok(Change::Conflict(conflict)),
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            if ctx.dry_run {
                return Ok(Change::WouldApply);
            }
            Ok(match resource.apply()? {
                ResourceChange::Applied => Change::Applied,
                ResourceChange::AlreadyCorrect => Change::AlreadyCorrect,
            })
        }
    }
}
