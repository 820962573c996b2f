//! Command-line entry point for `dotfilemanager`.
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory as _, Parser as _};

use dotfilemanager::cli::{Cli, Command};
use dotfilemanager::commands;
use dotfilemanager::error::UsageError;
use dotfilemanager::logging::{self, Logger};

// Output before the subscriber exists, and the clap usage line, go
// straight to stderr.
#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if let Err(e) = logging::init_subscriber(args.verbose, args.global.log_file.as_deref()) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }
    let log = Arc::new(Logger::new(args.global.log_file.clone()));

    let result = match &args.command {
        Command::Link(opts) => commands::link::run(&args.global, opts, &log),
        Command::Tidy(opts) => commands::tidy::run(&args.global, opts, &log),
        Command::Report(opts) => commands::report::run(&args.global, opts, &log),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(usage) = e.downcast_ref::<UsageError>() {
                log.error(&usage.to_string());
                eprintln!("{}", Cli::command().render_usage());
                ExitCode::from(2)
            } else {
                log.error(&format!("{e:#}"));
                ExitCode::FAILURE
            }
        }
    }
}
