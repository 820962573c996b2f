//! Run configuration: the [`Settings`] value passed to the scanner,
//! resolver, and planner.
//!
//! There is no configuration file.  Everything here comes from CLI flags,
//! the `DOTFILEMANAGER_HOSTNAME` environment variable, and built-in defaults.
pub mod host;

use std::collections::BTreeSet;

use crate::error::ConfigError;

/// Separator between a file's base name and its host suffix (`vimrc__laptop`).
pub const HOST_SEPARATOR: &str = "__";

/// Version-control files and directories that are never linked.
pub const DEFAULT_SKIP_NAMES: &[&str] = &[
    "CVS",
    "RCS",
    ".git",
    ".gitignore",
    ".cvsignore",
    ".svn",
    ".bzr",
    ".bzrignore",
    ".bzrtags",
    ".hg",
    ".hgignore",
    ".hgtags",
];

/// Names of the manager's own scripts, which may live in the source tree.
pub const DEFAULT_SCRIPT_NAMES: &[&str] = &["dotfiles", "dotfilemanager", "dotfilemanager.py"];

/// Immutable configuration for one reconciliation run.
///
/// Built once per run and shared read-only; tests build their own with a
/// fixed host instead of touching the process environment.
///
/// # Examples
///
/// ```
/// use dotfilemanager::config::Settings;
///
/// let settings = Settings::new("laptop").unwrap();
/// assert_eq!(settings.host(), "laptop");
/// assert!(settings.is_skip_name(".git"));
/// assert!(settings.is_script_name("dotfilemanager"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    host: String,
    separator: String,
    skip_names: BTreeSet<String>,
    script_names: BTreeSet<String>,
}

impl Settings {
    /// Create settings for `host` with the default separator and name lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHost`] if `host` is empty.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(Self {
            host,
            separator: HOST_SEPARATOR.to_string(),
            skip_names: DEFAULT_SKIP_NAMES.iter().map(ToString::to_string).collect(),
            script_names: DEFAULT_SCRIPT_NAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }

    /// Replace the version-control skip list.
    #[must_use]
    pub fn with_skip_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the list of manager script names.
    #[must_use]
    pub fn with_script_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Use a different host-suffix separator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySeparator`] if `separator` is empty.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Result<Self, ConfigError> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        self.separator = separator;
        Ok(self)
    }

    /// The host name used to select variants.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host-suffix separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Whether any suffix can name this host.
    ///
    /// A suffix is split off at the last separator, so a host that itself
    /// contains the separator never matches: every suffixed file is treated
    /// as belonging to another host and plain files are always used.
    #[must_use]
    pub fn host_can_match(&self) -> bool {
        !self.host.contains(self.separator.as_str())
    }

    /// Whether `name` is on the version-control skip list.
    #[must_use]
    pub fn is_skip_name(&self, name: &str) -> bool {
        self.skip_names.contains(name)
    }

    /// Whether `name` is one of the manager's own scripts.
    #[must_use]
    pub fn is_script_name(&self, name: &str) -> bool {
        self.script_names.contains(name)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_vcs_names() {
        let settings = Settings::new("box").unwrap();
        for name in [".git", ".svn", ".hg", "CVS", "RCS", ".hgtags", ".bzrignore"] {
            assert!(settings.is_skip_name(name), "{name} should be skipped");
        }
        assert!(!settings.is_skip_name(".bashrc"));
    }

    #[test]
    fn defaults_cover_script_names() {
        let settings = Settings::new("box").unwrap();
        assert!(settings.is_script_name("dotfiles"));
        assert!(settings.is_script_name("dotfilemanager.py"));
        assert!(!settings.is_script_name("README"));
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(
            Settings::new(""),
            Err(ConfigError::EmptyHost)
        ));
    }

    #[test]
    fn host_containing_separator_is_accepted_but_never_matches() {
        let settings = Settings::new("my__box").unwrap();
        assert_eq!(settings.host(), "my__box");
        assert!(!settings.host_can_match());
        assert!(Settings::new("box").unwrap().host_can_match());
    }

    #[test]
    fn overrides_replace_lists() {
        let settings = Settings::new("box")
            .unwrap()
            .with_skip_names([".jj"])
            .with_script_names(["install.sh"]);
        assert!(settings.is_skip_name(".jj"));
        assert!(!settings.is_skip_name(".git"));
        assert!(settings.is_script_name("install.sh"));
        assert!(!settings.is_script_name("dotfiles"));
    }

    #[test]
    fn custom_separator() {
        let settings = Settings::new("box").unwrap().with_separator("@").unwrap();
        assert_eq!(settings.separator(), "@");
        assert!(!Settings::new("a@b").unwrap().with_separator("@").unwrap().host_can_match());
        assert!(matches!(
            Settings::new("box").unwrap().with_separator(""),
            Err(ConfigError::EmptySeparator)
        ));
    }
}
