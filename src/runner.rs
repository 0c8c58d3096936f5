//! Runs the external linter once and relays what it reports.

use crate::error::LintError;
use crate::scratch::ScratchLog;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

pub const DEFAULT_LINTER: &str = "markdownlint";
pub const DEFAULT_GLOB: &str = "content/**/*.md";
pub const DEFAULT_ERROR_LOG: &str = "abc.txt";

const CHUNK_SIZE: usize = 8 * 1024;

/// The program to launch and the arguments handed to it, without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl LintCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `markdownlint <glob>`, with the glob as the only argument.
    pub fn markdownlint(glob: impl Into<OsString>) -> Self {
        Self::new(DEFAULT_LINTER).arg(glob)
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Default for LintCommand {
    fn default() -> Self {
        Self::markdownlint(DEFAULT_GLOB)
    }
}

impl fmt::Display for LintCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {:?}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a single lint run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The linter exited with code 0.
    Passed,
    /// The linter exited with a nonzero code, usually because it found violations.
    Failed { code: i32 },
    /// The linter could not be launched at all.
    NotStarted { kind: io::ErrorKind },
}

impl RunOutcome {
    fn from_status(status: ExitStatus) -> Self {
        match normalize_exit(status) {
            0 => RunOutcome::Passed,
            code => RunOutcome::Failed { code },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Passed)
    }

    /// The status the wrapper process should exit with.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Passed => 0,
            RunOutcome::Failed { code } => u8::try_from(*code)
                .ok()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            RunOutcome::NotStarted {
                kind: io::ErrorKind::NotFound,
            } => 127,
            RunOutcome::NotStarted { .. } => 126,
        }
    }
}

/// Maps a signal-terminated child to `128 + signal`, like a shell would.
fn normalize_exit(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(sig) = status.signal() {
            128 + sig
        } else {
            1
        }
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}

/// Launches one [`LintCommand`] and collects its error stream in a scratch log.
#[derive(Debug, Clone)]
pub struct LintRunner {
    command: LintCommand,
    error_log: PathBuf,
}

impl Default for LintRunner {
    fn default() -> Self {
        Self::new(LintCommand::default(), DEFAULT_ERROR_LOG)
    }
}

impl LintRunner {
    pub fn new(command: LintCommand, error_log: impl Into<PathBuf>) -> Self {
        Self {
            command,
            error_log: error_log.into(),
        }
    }

    pub fn command(&self) -> &LintCommand {
        &self.command
    }

    pub fn error_log(&self) -> &Path {
        &self.error_log
    }

    /// Runs the linter, writing its stdout and the status messages to `out`
    /// and `err`.
    ///
    /// The error log is deleted before this returns, whatever the outcome.
    pub fn run<O, E>(&self, out: &mut O, err: &mut E) -> Result<RunOutcome, LintError>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        self.run_with(out, err, |_| {})
    }

    /// Like [`LintRunner::run`], but hands the closed error log to `inspect`
    /// right before it is deleted.
    pub fn run_with<O, E, F>(
        &self,
        out: &mut O,
        err: &mut E,
        inspect: F,
    ) -> Result<RunOutcome, LintError>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
        F: FnOnce(&Path),
    {
        let mut scratch = ScratchLog::create(&self.error_log).map_err(|source| {
            LintError::CreateLog {
                path: self.error_log.clone(),
                source,
            }
        })?;

        log::debug!("Spawning `{}`", self.command);
        let spawned = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                log::info!("Could not start `{}`: {source}", self.command);
                self.close_log(&mut scratch)?;
                writeln!(err, "Command execution error: {source}")?;
                err.flush()?;
                inspect(scratch.path());
                self.remove_log(scratch)?;
                return Ok(RunOutcome::NotStarted {
                    kind: source.kind(),
                });
            }
        };

        let program = self.command.program_name();

        let stdout_reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffered = Vec::new();
                stdout.read_to_end(&mut buffered)?;
                Ok(buffered)
            })
        });

        if let Some(mut stderr) = child.stderr.take() {
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                let read = match stderr.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(read) => read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(source) => {
                        // Reap the child so it does not outlive the wrapper as a zombie.
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(LintError::Capture { program, source });
                    }
                };
                log::trace!("Appending {read} bytes of stderr to the error log");
                scratch
                    .append(&chunk[..read])
                    .map_err(|source| LintError::WriteLog {
                        path: self.error_log.clone(),
                        source,
                    })?;
            }
        }

        let status = child.wait().map_err(|source| LintError::Wait {
            program: program.clone(),
            source,
        })?;

        let stdout = match stdout_reader {
            Some(handle) => handle
                .join()
                .map_err(|_| LintError::CapturePanicked(program.clone()))?
                .map_err(|source| LintError::Capture {
                    program: program.clone(),
                    source,
                })?,
            None => Vec::new(),
        };

        // Completion: buffered stdout goes out first, then the log is closed.
        if !stdout.is_empty() {
            out.write_all(&stdout)?;
            out.flush()?;
        }
        self.close_log(&mut scratch)?;

        let outcome = RunOutcome::from_status(status);
        log::info!("`{}` finished: {outcome:?}", self.command);
        match outcome {
            RunOutcome::Passed => {
                writeln!(out, "Command completed successfully.")?;
                out.flush()?;
            }
            RunOutcome::Failed { code } => {
                writeln!(err, "Command failed with code {code}.")?;
                err.flush()?;
            }
            RunOutcome::NotStarted { .. } => {}
        }

        inspect(scratch.path());
        self.remove_log(scratch)?;

        Ok(outcome)
    }

    fn close_log(&self, log: &mut ScratchLog) -> Result<(), LintError> {
        log.close().map_err(|source| LintError::WriteLog {
            path: self.error_log.clone(),
            source,
        })
    }

    fn remove_log(&self, log: ScratchLog) -> Result<(), LintError> {
        log.remove().map_err(|source| LintError::RemoveLog {
            path: self.error_log.clone(),
            source,
        })
    }
}
