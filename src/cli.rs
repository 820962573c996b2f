//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfile manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotfilemanager",
    about = "Link a dotfiles repository into a home directory",
    version
)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every operation.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Host name used to pick host-specific variants (defaults to
    /// `$DOTFILEMANAGER_HOSTNAME`, then the machine name)
    #[arg(long, global = true, value_name = "NAME")]
    pub host: Option<String>,

    /// Also append the log to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Symlink the dotfiles repository into the target directory
    Link(LinkOpts),
    /// Remove broken symlinks from the top of the target directory
    Tidy(TidyOpts),
    /// Show what link and tidy would do, without changing anything
    Report(ReportOpts),
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Directory the links are placed in [default: home directory]
    #[arg(value_name = "TARGET_DIR")]
    pub target: Option<PathBuf>,

    /// Dotfiles repository [default: ~/.dotfiles]
    #[arg(value_name = "SOURCE_DIR")]
    pub source: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Options for the `tidy` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct TidyOpts {
    /// Directory to sweep [default: home directory]
    #[arg(value_name = "TARGET_DIR")]
    pub target: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Options for the `report` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ReportOpts {
    /// Directory the links are placed in [default: home directory]
    #[arg(value_name = "TARGET_DIR")]
    pub target: Option<PathBuf>,

    /// Dotfiles repository [default: ~/.dotfiles]
    #[arg(value_name = "SOURCE_DIR")]
    pub source: Option<PathBuf>,
}
