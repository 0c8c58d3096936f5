//! The md-lint command-line executable.

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    md_lint::run()
}
