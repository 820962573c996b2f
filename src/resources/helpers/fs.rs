//! Filesystem helpers: referent resolution, path comparison, mount points,
//! and symlink creation.
use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};

/// Resolve a symlink's stored `referent` the way the OS would: relative
/// referents are taken from the link's own directory.
#[must_use]
pub fn resolve_referent(link: &Path, referent: &Path) -> PathBuf {
    if referent.is_absolute() {
        lexically_normal(referent)
    } else {
        let base = link.parent().unwrap_or_else(|| Path::new(""));
        lexically_normal(&base.join(referent))
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root; for relative paths a leading `..` is
/// kept.
#[must_use]
pub fn lexically_normal(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Whether `a` and `b` name the same filesystem object.
///
/// Both sides are canonicalised so that symlinked ancestors are followed the
/// way the OS follows them.  Only when either side does not exist are the
/// lexically normalised paths compared instead.
#[must_use]
pub fn same_path(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => lexically_normal(a) == lexically_normal(b),
    }
}

/// Whether the directory at `path` is a mount point.
///
/// A directory is a mount point if it lives on a different device from its
/// parent, or if it is its own parent (the root).
///
/// # Errors
///
/// Returns an error if the metadata of `path` or its parent cannot be read.
#[cfg(unix)]
pub fn is_mount_point(path: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt as _;

    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("reading metadata: {}", path.display()))?;
    if !meta.is_dir() {
        return Ok(false);
    }
    let parent = path.join("..");
    let parent_meta = std::fs::metadata(&parent)
        .with_context(|| format!("reading metadata: {}", parent.display()))?;
    Ok(meta.dev() != parent_meta.dev() || meta.ino() == parent_meta.ino())
}

/// Whether the directory at `path` is a mount point.
///
/// Mount points are not detected on this platform; they are reported as
/// ordinary directories.
///
/// # Errors
///
/// Never fails on this platform.
#[cfg(not(unix))]
pub fn is_mount_point(_path: &Path) -> Result<bool> {
    Ok(false)
}

/// Create a symlink at `link` pointing to `source`.
///
/// # Errors
///
/// Returns an error if the link cannot be created (including when
/// something already exists at `link`).
pub fn create_symlink(source: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, link).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                source.display()
            )
        })?;
    }

    #[cfg(windows)]
    {
        let result = if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, link)
        } else {
            std::os::windows::fs::symlink_file(source, link)
        };
        result.with_context(|| {
            format!(
                "creating symlink {} -> {} (requires developer mode or admin)",
                link.display(),
                source.display()
            )
        })?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lexically_normal_collapses_dots() {
        assert_eq!(
            lexically_normal(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(lexically_normal(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(lexically_normal(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn relative_referent_resolves_against_link_parent() {
        assert_eq!(
            resolve_referent(Path::new("/home/u/.bashrc"), Path::new(".dotfiles/.bashrc")),
            PathBuf::from("/home/u/.dotfiles/.bashrc")
        );
        assert_eq!(
            resolve_referent(Path::new("/home/u/.vim/vimrc"), Path::new("../.dotfiles/x")),
            PathBuf::from("/home/u/.dotfiles/x")
        );
    }

    #[test]
    fn absolute_referent_is_kept() {
        assert_eq!(
            resolve_referent(Path::new("/home/u/.bashrc"), Path::new("/src/.bashrc")),
            PathBuf::from("/src/.bashrc")
        );
    }

    #[test]
    fn same_path_lexical() {
        assert!(same_path(Path::new("/a/b/../c"), Path::new("/a/c")));
        assert!(!same_path(Path::new("/nonexistent/a"), Path::new("/nonexistent/b")));
    }

    #[cfg(unix)]
    #[test]
    fn same_path_through_symlinked_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir(&real).unwrap();
        std::fs::write(real.join("f"), "x").unwrap();
        let alias = dir.path().join("alias");
        std::os::unix::fs::symlink(&real, &alias).unwrap();
        assert!(same_path(&real.join("f"), &alias.join("f")));
    }

    #[cfg(unix)]
    #[test]
    fn same_path_follows_symlinked_ancestor_before_dot_dot() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("outside/deep");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(dir.path().join("outside/x"), "far").unwrap();
        std::fs::write(dir.path().join("x"), "near").unwrap();
        std::os::unix::fs::symlink(&deep, dir.path().join("sub")).unwrap();

        let through_sub = dir.path().join("sub/../x");
        assert!(!same_path(&through_sub, &dir.path().join("x")));
        assert!(same_path(&through_sub, &dir.path().join("outside/x")));
    }

    #[cfg(unix)]
    #[test]
    fn root_is_a_mount_point() {
        assert!(is_mount_point(Path::new("/")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn fresh_directory_is_not_a_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        assert!(!is_mount_point(&sub).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn create_symlink_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let link = dir.path().join("link");
        std::fs::write(&source, "x").unwrap();
        std::fs::write(&link, "mine").unwrap();
        assert!(create_symlink(&source, &link).is_err());
        assert_eq!(std::fs::read_to_string(&link).unwrap(), "mine");
    }
}
