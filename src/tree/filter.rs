//! Per-name eligibility rules.
use super::{EntryKind, SkipReason};
use crate::config::Settings;

/// Where in the source tree a name is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Direct child of the source root. Dotted names are welcome here; the
    /// scanner separately requires the leading dot.
    TopLevel,
    /// Anything deeper. Dotted names are rejected.
    Nested,
}

/// Decides whether a source entry may be linked.
///
/// Rules are applied in order and the first match wins:
///
/// 1. trailing `~` (editor backup)
/// 2. neither a regular file nor a directory
/// 3. leading `.` ([`Scope::Nested`] only)
/// 4. one of the manager's own scripts
/// 5. on the version-control skip list
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    settings: &'a Settings,
}

impl<'a> PathFilter<'a> {
    /// Create a filter using the name lists from `settings`.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Check `name`, whose detected kind is `kind` (`None` when the path is
    /// neither a file nor a directory).
    ///
    /// # Errors
    ///
    /// Returns the [`SkipReason`] of the first rule that rejects the entry.
    pub fn check(
        &self,
        name: &str,
        kind: Option<EntryKind>,
        scope: Scope,
    ) -> Result<EntryKind, SkipReason> {
        if name.ends_with('~') {
            return Err(SkipReason::Backup);
        }
        let Some(kind) = kind else {
            return Err(SkipReason::NotFileOrDirectory);
        };
        if scope == Scope::Nested && name.starts_with('.') {
            return Err(SkipReason::LeadingDot);
        }
        if self.settings.is_script_name(name) {
            return Err(SkipReason::ManagerScript);
        }
        if self.settings.is_skip_name(name) {
            return Err(SkipReason::SkipList);
        }
        Ok(kind)
    }
}
