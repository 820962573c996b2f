//! Pure planning phase: turn a [`ScanResult`] into ordered actions.
//!
//! Nothing here touches the filesystem, so plans can be built from synthetic
//! scans in tests.  Each source path maps to a target path by making it
//! relative to the source root, dot-prefixing the first component, stripping
//! any host suffix from the file name, and joining it onto the target root.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::PlanError;
use crate::tree::{HostVariants, Resolution, ScanResult, Skipped};

/// A directory that must exist at the target before links beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirAction {
    /// The source directory being mirrored.
    pub source: PathBuf,
    /// Absolute target directory path.
    pub target: PathBuf,
}

/// A symlink `target -> source` that should exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAction {
    /// On-disk source file, possibly carrying a host suffix.
    pub source: PathBuf,
    /// Absolute path where the symlink goes.
    pub target: PathBuf,
}

/// Ordered actions for one reconciliation pass.
///
/// `dirs` and `links` are each sorted by target path, which also places
/// every directory before its subdirectories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Directories to ensure, parents first.
    pub dirs: Vec<DirAction>,
    /// Symlinks to ensure.
    pub links: Vec<LinkAction>,
    /// Everything excluded by the scanner or by host-variant resolution.
    pub skipped: Vec<Skipped>,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dir in &self.dirs {
            writeln!(f, "dir  {}", dir.target.display())?;
        }
        for link in &self.links {
            writeln!(
                f,
                "link {} -> {}",
                link.target.display(),
                link.source.display()
            )?;
        }
        for skipped in &self.skipped {
            writeln!(f, "{skipped}")?;
        }
        Ok(())
    }
}

/// Builds a [`Plan`] from scanner output.
#[derive(Debug, Clone, Copy)]
pub struct PlanBuilder<'a> {
    variants: HostVariants<'a>,
}

impl<'a> PlanBuilder<'a> {
    /// Create a builder resolving variants for the host in `settings`.
    #[must_use]
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            variants: HostVariants::new(settings),
        }
    }

    /// Map every scanned entry onto `target_root`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::OutsideSourceRoot`] for an entry not under the
    /// scan root, and [`PlanError::DuplicateTarget`] if two sources claim the
    /// same target path.
    pub fn build(&self, scan: &ScanResult, target_root: &Path) -> Result<Plan, PlanError> {
        let mut plan = Plan {
            skipped: scan.skipped.clone(),
            ..Plan::default()
        };

        for dir in scan.dirs() {
            let rel = relative_to(dir, &scan.root)?;
            plan.dirs.push(DirAction {
                source: dir.to_path_buf(),
                target: target_root.join(dot_prefixed(rel)),
            });
        }

        let siblings = sibling_names(scan.files());
        let no_siblings = BTreeSet::new();
        for file in scan.files() {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let names = file
                .parent()
                .and_then(|p| siblings.get(p))
                .unwrap_or(&no_siblings);
            match self.variants.resolve(name, names) {
                Resolution::Accepted { canonical } => {
                    let rel = relative_to(file, &scan.root)?.with_file_name(canonical);
                    plan.links.push(LinkAction {
                        source: file.to_path_buf(),
                        target: target_root.join(dot_prefixed(&rel)),
                    });
                }
                Resolution::Rejected(reason) => plan.skipped.push(Skipped {
                    path: file.to_path_buf(),
                    reason,
                }),
            }
        }

        plan.dirs.sort_by(|a, b| a.target.cmp(&b.target));
        plan.links.sort_by(|a, b| a.target.cmp(&b.target));
        check_unique(&plan)?;
        Ok(plan)
    }
}

/// File names grouped by their parent directory.
fn sibling_names<'p>(
    files: impl Iterator<Item = &'p Path>,
) -> BTreeMap<&'p Path, BTreeSet<String>> {
    let mut map: BTreeMap<&Path, BTreeSet<String>> = BTreeMap::new();
    for file in files {
        if let (Some(parent), Some(name)) = (file.parent(), file.file_name().and_then(|n| n.to_str()))
        {
            map.entry(parent).or_default().insert(name.to_string());
        }
    }
    map
}

fn relative_to<'p>(path: &'p Path, root: &Path) -> Result<&'p Path, PlanError> {
    path.strip_prefix(root)
        .map_err(|_| PlanError::OutsideSourceRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Prefix the first component of `rel` with a dot unless it already has one.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotfilemanager::plan::dot_prefixed;
///
/// assert_eq!(dot_prefixed(Path::new("bashrc")), PathBuf::from(".bashrc"));
/// assert_eq!(dot_prefixed(Path::new(".config/git")), PathBuf::from(".config/git"));
/// ```
#[must_use]
pub fn dot_prefixed(rel: &Path) -> PathBuf {
    let mut components = rel.components();
    let mut out = PathBuf::new();
    if let Some(Component::Normal(first)) = components.next() {
        let first = first.to_string_lossy();
        if first.starts_with('.') {
            out.push(first.as_ref());
        } else {
            out.push(format!(".{first}"));
        }
    }
    out.extend(components);
    out
}

/// Every target path may be claimed by at most one action of each kind.
fn check_unique(plan: &Plan) -> Result<(), PlanError> {
    let pairs = plan
        .dirs
        .iter()
        .map(|d| (&d.target, &d.source))
        .collect::<Vec<_>>();
    ensure_distinct(&pairs)?;
    let pairs = plan
        .links
        .iter()
        .map(|l| (&l.target, &l.source))
        .collect::<Vec<_>>();
    ensure_distinct(&pairs)
}

/// `pairs` is sorted by target, so duplicates are adjacent.
fn ensure_distinct(pairs: &[(&PathBuf, &PathBuf)]) -> Result<(), PlanError> {
    for window in pairs.windows(2) {
        if let [(target, first), (next, second)] = window
            && target == next
        {
            return Err(PlanError::DuplicateTarget {
                target: (*target).clone(),
                first: (*first).clone(),
                second: (*second).clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tree::{Entry, SkipReason};

    fn settings(host: &str) -> Settings {
        Settings::new(host).unwrap()
    }

    fn scan(top: Vec<Entry>, nested: Vec<Entry>) -> ScanResult {
        ScanResult {
            root: PathBuf::from("/src"),
            top_level: top,
            nested,
            skipped: Vec::new(),
        }
    }

    fn file(p: &str) -> Entry {
        Entry::File(PathBuf::from(p))
    }

    fn dir(p: &str) -> Entry {
        Entry::Directory(PathBuf::from(p))
    }

    #[test]
    fn host_variant_replaces_plain_file() {
        let s = settings("myhost");
        let scan = scan(vec![file("/src/.bashrc"), file("/src/.bashrc__myhost")], vec![]);
        let plan = PlanBuilder::new(&s).build(&scan, Path::new("/home/u")).unwrap();

        assert_eq!(
            plan.links,
            [LinkAction {
                source: PathBuf::from("/src/.bashrc__myhost"),
                target: PathBuf::from("/home/u/.bashrc"),
            }]
        );
        assert_eq!(plan.skipped.len(), 1);
        assert!(matches!(
            plan.skipped[0].reason,
            SkipReason::HostOverride { .. }
        ));
    }

    #[test]
    fn other_host_only_yields_nothing() {
        let s = settings("myhost");
        let scan = scan(vec![file("/src/.vimrc__otherhost")], vec![]);
        let plan = PlanBuilder::new(&s).build(&scan, Path::new("/home/u")).unwrap();
        assert!(plan.links.is_empty());
        assert!(plan.dirs.is_empty());
    }

    #[test]
    fn siblings_are_per_directory() {
        let s = settings("myhost");
        // The override lives in a different directory, so it does not
        // displace the plain file in .config/a.
        let scan = scan(
            vec![dir("/src/.config")],
            vec![
                dir("/src/.config/a"),
                file("/src/.config/a/rc"),
                dir("/src/.config/b"),
                file("/src/.config/b/rc__myhost"),
            ],
        );
        let plan = PlanBuilder::new(&s).build(&scan, Path::new("/home/u")).unwrap();
        let targets: Vec<_> = plan.links.iter().map(|l| l.target.clone()).collect();
        assert_eq!(
            targets,
            [
                PathBuf::from("/home/u/.config/a/rc"),
                PathBuf::from("/home/u/.config/b/rc"),
            ]
        );
    }

    #[test]
    fn nested_tree_renders_in_target_order() {
        let s = settings("myhost");
        let scan = scan(
            vec![dir("/src/.vim"), file("/src/.zshrc"), file("/src/.zshrc__work")],
            vec![
                dir("/src/.vim/after"),
                file("/src/.vim/after/ftplugin.vim__myhost"),
                file("/src/.vim/vimrc"),
            ],
        );
        let plan = PlanBuilder::new(&s).build(&scan, Path::new("/home/u")).unwrap();
        insta::assert_snapshot!(plan.to_string(), @r"
        dir  /home/u/.vim
        dir  /home/u/.vim/after
        link /home/u/.vim/after/ftplugin.vim -> /src/.vim/after/ftplugin.vim__myhost
        link /home/u/.vim/vimrc -> /src/.vim/vimrc
        link /home/u/.zshrc -> /src/.zshrc
        skipping /src/.zshrc__work (different hostname: work)
        ");
    }

    #[test]
    fn directories_are_not_host_resolved() {
        let s = settings("myhost");
        let scan = scan(vec![dir("/src/.ssh__work")], vec![]);
        let plan = PlanBuilder::new(&s).build(&scan, Path::new("/home/u")).unwrap();
        assert_eq!(plan.dirs[0].target, PathBuf::from("/home/u/.ssh__work"));
    }

    #[test]
    fn scanner_skips_carry_over() {
        let s = settings("myhost");
        let mut scan = scan(vec![], vec![]);
        scan.skipped.push(Skipped {
            path: PathBuf::from("/src/README"),
            reason: SkipReason::NotDotted,
        });
        let plan = PlanBuilder::new(&s).build(&scan, Path::new("/home/u")).unwrap();
        assert_eq!(plan.skipped, scan.skipped);
    }

    #[test]
    fn entry_outside_root_is_an_error() {
        let s = settings("myhost");
        let scan = scan(vec![file("/elsewhere/.bashrc")], vec![]);
        let err = PlanBuilder::new(&s)
            .build(&scan, Path::new("/home/u"))
            .unwrap_err();
        assert!(matches!(err, PlanError::OutsideSourceRoot { .. }));
    }

    #[test]
    fn duplicate_targets_are_rejected() {
        let s = settings("myhost");
        // Only a hand-built scan can contain the same file twice.
        let scan = scan(vec![file("/src/.bashrc"), file("/src/.bashrc")], vec![]);
        let err = PlanBuilder::new(&s)
            .build(&scan, Path::new("/home/u"))
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateTarget { .. }));
    }

    #[test]
    fn dot_prefix_only_touches_first_component() {
        assert_eq!(
            dot_prefixed(Path::new("config/nvim/init.vim")),
            PathBuf::from(".config/nvim/init.vim")
        );
        assert_eq!(dot_prefixed(Path::new(".bashrc")), PathBuf::from(".bashrc"));
    }
}
