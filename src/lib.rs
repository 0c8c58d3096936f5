//! Runs an external Markdown linter, relays its report and cleans up after it.

pub mod cli;
pub mod error;
pub mod runner;
pub mod scratch;

use crate::cli::Cli;
use crate::runner::LintRunner;
use anyhow::Context;
use clap::Parser;
use std::io;
use std::process::ExitCode;

pub use crate::error::LintError;
pub use crate::runner::{LintCommand, RunOutcome};

/// The main entry point for the application logic.
pub fn run() -> anyhow::Result<ExitCode> {
    // Initialize the logger. This will be configured by the RUST_LOG environment variable.
    env_logger::init();

    let cli = Cli::parse();
    let runner = LintRunner::new(cli.lint_command(), cli.error_log);

    let outcome = runner
        .run(&mut io::stdout(), &mut io::stderr())
        .with_context(|| format!("Failed to run `{}`", runner.command()))?;

    Ok(ExitCode::from(outcome.exit_code()))
}
