//! Host-specific file variants.
//!
//! A file named `base__host` is meant for the machine called `host` only.
//! When it matches the current host it replaces a plain `base` sibling;
//! otherwise it is ignored.  Only files carry host suffixes.
use std::collections::BTreeSet;

use super::SkipReason;
use crate::config::Settings;

/// Outcome of resolving one file name against its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The file is the winner for its base name on this host.
    Accepted {
        /// Name with any host suffix removed.
        canonical: String,
    },
    /// The file is not linked on this host.
    Rejected(SkipReason),
}

/// Picks the winning host variant for each base name.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use dotfilemanager::config::Settings;
/// use dotfilemanager::tree::{HostVariants, Resolution};
///
/// let settings = Settings::new("myhost").unwrap();
/// let variants = HostVariants::new(&settings);
/// let siblings: BTreeSet<String> = [".bashrc", ".bashrc__myhost"]
///     .into_iter()
///     .map(String::from)
///     .collect();
///
/// assert_eq!(
///     variants.resolve(".bashrc__myhost", &siblings),
///     Resolution::Accepted { canonical: ".bashrc".into() }
/// );
/// assert!(matches!(
///     variants.resolve(".bashrc", &siblings),
///     Resolution::Rejected(_)
/// ));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HostVariants<'a> {
    host: &'a str,
    separator: &'a str,
    can_match: bool,
}

impl<'a> HostVariants<'a> {
    /// Create a resolver for the host and separator in `settings`.
    #[must_use]
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            host: settings.host(),
            separator: settings.separator(),
            can_match: settings.host_can_match(),
        }
    }

    /// Resolve `filename` given the file names in the same directory.
    ///
    /// A suffixed name is split on the *last* separator, so
    /// `name__extra__host` has base `name__extra` and host `host`.
    #[must_use]
    pub fn resolve(&self, filename: &str, siblings: &BTreeSet<String>) -> Resolution {
        if let Some((base, host)) = filename.rsplit_once(self.separator) {
            if host != self.host {
                return Resolution::Rejected(SkipReason::OtherHost {
                    host: host.to_string(),
                });
            }
            if matches!(base, "" | "." | "..") {
                return Resolution::Rejected(SkipReason::EmptyBaseName);
            }
            return Resolution::Accepted {
                canonical: base.to_string(),
            };
        }

        let winner = self.variant_name(filename);
        if self.can_match && siblings.contains(&winner) {
            return Resolution::Rejected(SkipReason::HostOverride { winner });
        }
        Resolution::Accepted {
            canonical: filename.to_string(),
        }
    }

    /// Name of the current host's variant of `base` (`base__host`).
    #[must_use]
    pub fn variant_name(&self, base: &str) -> String {
        format!("{base}{}{}", self.separator, self.host)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn siblings(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn accepted(name: &str) -> Resolution {
        Resolution::Accepted {
            canonical: name.to_string(),
        }
    }

    #[test]
    fn matching_suffix_wins_over_plain_file() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&[".bashrc", ".bashrc__myhost"]);
        assert_eq!(v.resolve(".bashrc__myhost", &names), accepted(".bashrc"));
        assert_eq!(
            v.resolve(".bashrc", &names),
            Resolution::Rejected(SkipReason::HostOverride {
                winner: ".bashrc__myhost".to_string()
            })
        );
    }

    #[test]
    fn plain_file_is_the_fallback() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&[".bashrc", ".bashrc__otherhost"]);
        assert_eq!(v.resolve(".bashrc", &names), accepted(".bashrc"));
    }

    #[test]
    fn other_host_suffix_is_rejected() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&[".vimrc__otherhost"]);
        assert_eq!(
            v.resolve(".vimrc__otherhost", &names),
            Resolution::Rejected(SkipReason::OtherHost {
                host: "otherhost".to_string()
            })
        );
    }

    #[test]
    fn splits_on_last_separator() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&["name__extra__myhost"]);
        assert_eq!(v.resolve("name__extra__myhost", &names), accepted("name__extra"));
    }

    #[test]
    fn inner_separator_with_other_host_is_rejected() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&["name__myhost__other"]);
        assert!(matches!(
            v.resolve("name__myhost__other", &names),
            Resolution::Rejected(SkipReason::OtherHost { .. })
        ));
    }

    #[test]
    fn empty_base_is_rejected() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&["__myhost", ".__myhost"]);
        assert_eq!(
            v.resolve("__myhost", &names),
            Resolution::Rejected(SkipReason::EmptyBaseName)
        );
        assert_eq!(
            v.resolve(".__myhost", &names),
            Resolution::Rejected(SkipReason::EmptyBaseName)
        );
    }

    #[test]
    fn host_containing_separator_uses_plain_files() {
        let s = Settings::new("my__box").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&[".bashrc", ".bashrc__my__box"]);
        assert_eq!(v.resolve(".bashrc", &names), accepted(".bashrc"));
        assert_eq!(
            v.resolve(".bashrc__my__box", &names),
            Resolution::Rejected(SkipReason::OtherHost {
                host: "box".to_string()
            })
        );
    }

    #[test]
    fn trailing_separator_never_matches() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        assert!(matches!(
            v.resolve("notes__", &siblings(&["notes__"])),
            Resolution::Rejected(SkipReason::OtherHost { .. })
        ));
    }

    #[test]
    fn exactly_one_winner_per_base_name() {
        let s = Settings::new("myhost").unwrap();
        let v = HostVariants::new(&s);
        let names = siblings(&[".zshrc", ".zshrc__myhost", ".zshrc__work", ".zshrc__home"]);
        let winners: Vec<&String> = names
            .iter()
            .filter(|n| matches!(v.resolve(n, &names), Resolution::Accepted { .. }))
            .collect();
        assert_eq!(winners, vec![".zshrc__myhost"]);
    }
}
