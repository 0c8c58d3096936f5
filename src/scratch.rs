//! The scratch file that collects a linter's error stream for one run.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tempfile::TempPath;

/// A write handle to a file at a fixed path that is deleted when dropped.
///
/// Creating the log truncates whatever was at the path before. The file is
/// removed on every exit path: explicitly through [`ScratchLog::remove`], or
/// by the drop guard when the owner returns early.
#[derive(Debug)]
pub struct ScratchLog {
    file: Option<File>,
    path: TempPath,
}

impl ScratchLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        log::debug!("Opened error log at {}", path.display());
        Ok(Self {
            file: Some(file),
            path: TempPath::from_path(path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one chunk straight through to the file.
    pub fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(chunk),
            None => Err(io::Error::other("error log is already closed")),
        }
    }

    /// Ends the write side. The file stays on disk until removed.
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Closes the log if needed and deletes it, reporting any failure.
    pub fn remove(mut self) -> io::Result<()> {
        self.close()?;
        let Self { path, .. } = self;
        log::debug!("Removing error log at {}", path.display());
        path.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, "left over from a previous run").unwrap();

        let mut log = ScratchLog::create(&path).unwrap();
        log.append(b"fresh").unwrap();
        log.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn chunks_are_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");

        let mut log = ScratchLog::create(&path).unwrap();
        log.append(b"file.md:1 error A\n").unwrap();
        log.append(b"file.md:2 error B\n").unwrap();

        // Visible on disk before the log is closed.
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "file.md:1 error A\nfile.md:2 error B\n"
        );
    }

    #[test]
    fn append_after_close_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ScratchLog::create(&dir.path().join("abc.txt")).unwrap();

        log.close().unwrap();
        assert!(log.is_closed());
        assert!(log.append(b"late").is_err());
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");

        let log = ScratchLog::create(&path).unwrap();
        log.remove().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn drop_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");

        {
            let mut log = ScratchLog::create(&path).unwrap();
            log.append(b"never cleaned up explicitly").unwrap();
        }

        assert!(!path.exists());
    }

    #[test]
    fn remove_reports_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");

        let log = ScratchLog::create(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let err = log.remove().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn create_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("abc.txt");

        assert!(ScratchLog::create(&path).is_err());
    }
}
