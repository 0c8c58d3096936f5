//! Defines the command-line interface for the application.

use crate::runner::{LintCommand, DEFAULT_ERROR_LOG, DEFAULT_GLOB, DEFAULT_LINTER};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "md-lint",
    version,
    about = "Run a Markdown linter over a content tree and report the outcome."
)]
pub struct Cli {
    /// The linter executable to invoke.
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_LINTER)]
    pub linter: OsString,

    /// Glob of Markdown files handed to the linter.
    #[arg(long, value_name = "GLOB", default_value = DEFAULT_GLOB)]
    pub glob: OsString,

    /// Scratch file collecting the linter's error output. Deleted after the run.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ERROR_LOG)]
    pub error_log: PathBuf,

    /// Extra arguments passed to the linter ahead of the glob.
    #[arg(last = true, value_name = "LINTER_ARGS")]
    pub linter_args: Vec<OsString>,
}

impl Cli {
    /// Builds the linter invocation: program, extra arguments, then the glob.
    pub fn lint_command(&self) -> LintCommand {
        LintCommand::new(&self.linter)
            .args(&self.linter_args)
            .arg(&self.glob)
    }
}
