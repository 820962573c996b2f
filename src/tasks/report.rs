//! Per-item outcomes of a link or tidy pass.
//!
//! Every processed target yields one [`ReportItem`], logged as soon as it is
//! known so that an aborted run still shows what happened before the
//! failure.
use std::fmt;
use std::path::PathBuf;

use super::context::Context;
use super::processing::TaskStats;
use crate::resources::Conflict;
use crate::tree::Skipped;

/// What kind of target an item describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A directory that must exist.
    Directory,
    /// A symlink pointing at `source`.
    Symlink {
        /// The source file the link should point to.
        source: PathBuf,
    },
    /// A symlink whose referent no longer exists.
    BrokenLink {
        /// The resolved, missing referent.
        referent: PathBuf,
    },
}

/// Outcome for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The filesystem was changed.
    Applied,
    /// Dry-run: the filesystem would have been changed.
    WouldApply,
    /// Nothing to do.
    AlreadyCorrect,
    /// Something else occupies the target; left untouched.
    Conflict(Conflict),
}

/// One processed target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    /// Absolute target path.
    pub target: PathBuf,
    /// What the target is supposed to be.
    pub subject: Subject,
    /// What happened to it.
    pub change: Change,
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.target.display();
        if let Change::Conflict(conflict) = &self.change {
            return match conflict {
                Conflict::AlreadySymlinked(existing) => {
                    write!(f, "{t} => is already symlinked to {}", existing.display())
                }
                Conflict::FileInTheWay => write!(f, "There's a file in the way at {t}"),
                Conflict::DirectoryInTheWay => write!(f, "There's a directory in the way at {t}"),
                Conflict::MountPointInTheWay => {
                    write!(f, "There's a mount point in the way at {t}")
                }
                Conflict::OtherInTheWay => write!(f, "There's a special file in the way at {t}"),
                Conflict::ParentBlocked(parent) => {
                    write!(f, "Can't place {t}: parent {} is blocked", parent.display())
                }
            };
        }

        match (&self.subject, &self.change) {
            (Subject::Directory, Change::Applied) => write!(f, "making {t}"),
            (Subject::Directory, Change::WouldApply) => write!(f, "would make: {t}"),
            (Subject::Directory, _) => write!(f, "directory {t} already exists"),
            (Subject::Symlink { source }, Change::Applied) => {
                write!(f, "Making symlink {t} -> {}", source.display())
            }
            (Subject::Symlink { source }, Change::WouldApply) => {
                write!(f, "would link: {t} -> {}", source.display())
            }
            (Subject::Symlink { source }, _) => {
                write!(f, "already linked: {t} -> {}", source.display())
            }
            (Subject::BrokenLink { referent }, Change::Applied) => {
                write!(f, "Deleting broken symlink: {t}->{}", referent.display())
            }
            (Subject::BrokenLink { referent }, Change::WouldApply) => {
                write!(
                    f,
                    "tidy would delete broken symlink: {t}->{}",
                    referent.display()
                )
            }
            (Subject::BrokenLink { .. }, _) => write!(f, "link {t} is not broken"),
        }
    }
}

/// Everything a link or tidy pass did or would do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Processed targets, in processing order.
    pub items: Vec<ReportItem>,
    /// Source entries that were not linked.
    pub skipped: Vec<Skipped>,
}

impl Report {
    /// Log `item` and append it.
    ///
    /// Conflicts are warnings.  Routine "already correct" lines are only
    /// shown on the console in dry-run mode or with `--verbose`.
    pub fn record(&mut self, ctx: &Context, item: ReportItem) {
        let msg = item.to_string();
        match item.change {
            Change::Conflict(_) => ctx.log.warn(&msg),
            Change::WouldApply => ctx.log.dry_run(&msg),
            Change::Applied => ctx.log.info(&msg),
            Change::AlreadyCorrect if ctx.dry_run => ctx.log.info(&msg),
            Change::AlreadyCorrect => ctx.log.debug(&msg),
        }
        self.items.push(item);
    }

    /// Log `skipped` and append it.
    pub fn skip(&mut self, ctx: &Context, skipped: Skipped) {
        let msg = skipped.to_string();
        if ctx.dry_run {
            ctx.log.info(&msg);
        } else {
            ctx.log.debug(&msg);
        }
        self.skipped.push(skipped);
    }

    /// Number of conflicting items.
    #[must_use]
    pub fn conflicts(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.change, Change::Conflict(_)))
            .count()
    }

    /// Aggregate counters.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        let mut stats = TaskStats::new();
        for item in &self.items {
            stats.record(&item.change);
        }
        stats.skipped = u32::try_from(self.skipped.len()).unwrap_or(u32::MAX);
        stats
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for skipped in &self.skipped {
            writeln!(f, "{skipped}")?;
        }
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}
