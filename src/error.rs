//! Defines custom error types for the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the wrapper itself.
///
/// A linter that reports violations or cannot be started is not an error
/// here; those end up in [`crate::runner::RunOutcome`].
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Failed to create error log: {}", path.display())]
    CreateLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to error log: {}", path.display())]
    WriteLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove error log: {}", path.display())]
    RemoveLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read the output of '{program}'")]
    Capture {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Output reader for '{0}' panicked")]
    CapturePanicked(String),

    #[error("Failed to wait for '{program}' to exit")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to the console")]
    Console(#[from] io::Error),
}
