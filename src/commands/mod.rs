//! Top-level subcommand orchestration.
//!
//! Each command resolves its directory arguments first, so that a usage
//! error is reported before anything is scanned or touched.
pub mod link;
pub mod report;
pub mod tidy;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{Settings, host};
use crate::error::UsageError;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Task};

/// Name of the source directory inside home when none is given.
pub const DEFAULT_SOURCE_NAME: &str = ".dotfiles";

/// Target and source directories of a run, absolute and verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    /// Directory the links are placed in.
    pub target: PathBuf,
    /// Dotfiles repository.
    pub source: PathBuf,
}

/// Resolve the user's home directory from `HOME`, then `USERPROFILE`.
///
/// # Errors
///
/// Returns [`UsageError::HomeNotSet`] if neither variable is set.
pub fn home_dir() -> Result<PathBuf, UsageError> {
    home_dir_with(|key| std::env::var_os(key))
}

/// [`home_dir`] with an injectable environment lookup.
///
/// # Errors
///
/// Returns [`UsageError::HomeNotSet`] if neither variable is set or both
/// are empty.
pub fn home_dir_with<F>(env: F) -> Result<PathBuf, UsageError>
where
    F: Fn(&str) -> Option<OsString>,
{
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(env)
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(UsageError::HomeNotSet)
}

/// Replace a leading `~` component with `home`.
#[must_use]
pub fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    path.strip_prefix("~")
        .map_or_else(|_| path.to_path_buf(), |rest| home.join(rest))
}

/// Expand, absolutise and verify a directory argument.
///
/// # Errors
///
/// Returns [`UsageError::NotADirectory`] if the path does not name an
/// existing directory, or [`UsageError::HomeNotSet`] if it starts with `~`
/// and no home directory is known.
pub fn resolve_dir(
    role: &'static str,
    path: &Path,
    home: impl FnOnce() -> Result<PathBuf, UsageError>,
) -> Result<PathBuf, UsageError> {
    let expanded = if path.starts_with("~") {
        expand_tilde(path, &home()?)
    } else {
        path.to_path_buf()
    };
    let absolute = std::path::absolute(&expanded).unwrap_or(expanded);
    if absolute.is_dir() {
        Ok(absolute)
    } else {
        Err(UsageError::NotADirectory {
            role,
            path: absolute,
        })
    }
}

/// Resolve `TARGET_DIR` and `SOURCE_DIR`, applying the defaults.
///
/// The target defaults to home and the source to `~/.dotfiles`.  The target
/// is checked first.
///
/// # Errors
///
/// Returns a [`UsageError`] if either directory is invalid or a default is
/// needed but home is unknown.
pub fn resolve_dirs(target: Option<&Path>, source: Option<&Path>) -> Result<Dirs, UsageError> {
    let target = resolve_dir(
        "TARGET_DIR",
        target.unwrap_or_else(|| Path::new("~")),
        home_dir,
    )?;
    let default_source = Path::new("~").join(DEFAULT_SOURCE_NAME);
    let source = resolve_dir(
        "SOURCE_DIR",
        source.unwrap_or(&default_source),
        home_dir,
    )?;
    Ok(Dirs { target, source })
}

/// Resolve the host identity and build a task [`Context`].
///
/// # Errors
///
/// Returns an error if the host name cannot be determined or is invalid.
pub fn make_context(global: &GlobalOpts, log: &Arc<Logger>, dry_run: bool) -> Result<Context> {
    let version = option_env!("DOTFILEMANAGER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("dotfilemanager {version}"));

    let host = host::resolve(global.host.as_deref())?;
    let settings = Settings::new(host)?;
    log.info(&format!("host: {}", settings.host()));
    if !settings.host_can_match() {
        log.warn(&format!(
            "host name '{}' contains '{}'; host-specific files will be ignored",
            settings.host(),
            settings.separator()
        ));
    }
    if dry_run {
        log.info("dry run: nothing will be changed");
    }

    Ok(Context::new(
        Arc::new(settings),
        Arc::clone(log) as Arc<dyn Log>,
        dry_run,
    ))
}

/// Execute tasks in order until one fails, then print the summary.
///
/// # Errors
///
/// Returns an error if a task failed; later tasks are not run.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        if tasks::execute(task, ctx).is_err() {
            break;
        }
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
