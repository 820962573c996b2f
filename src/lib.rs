//! Dotfile manager.
//!
//! Mirrors a dotfiles repository into a home directory as symlinks.  Only
//! dotted top-level entries are considered; directories are recreated as
//! real directories and files are linked individually.  A file named
//! `name__host` replaces `name` on the machine called `host` and is ignored
//! everywhere else.  Nothing at the target is ever overwritten: anything in
//! the way is reported as a conflict.
//!
//! The public API is organised into layers:
//!
//! - **[`tree`]**: walk and filter the source tree
//! - **[`plan`]**: map scanned entries onto target paths (pure)
//! - **[`resources`]**: idempotent `check + apply` primitives for the target
//! - **[`tasks`]**: link and tidy passes that drive resources and report
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `tidy`, `report`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod plan;
pub mod resources;
pub mod tasks;
pub mod tree;
