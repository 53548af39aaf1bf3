//! Persistent, append-only log of rendered failure texts.
//!
//! One line per failure, no structure. The file is shared by every render
//! in the process (and across processes), so it is always opened in append
//! mode; concurrent writers interleave at line granularity.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::RenderError;
use crate::metrics::METRICS;
use crate::obs;

/// An open handle on the error log.
#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    file: File,
}

impl ErrorLog {
    /// Open (creating if needed) the error log for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options
            .open(&path)
            .map_err(|source| RenderError::OpenErrorLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `text` followed by a newline in a single write.
    ///
    /// A failed write is reported and otherwise ignored.
    pub fn append(&mut self, text: &str) {
        let line = format!("{}\n", text);
        match self.file.write_all(line.as_bytes()) {
            Ok(()) => METRICS.inc_failures_logged(),
            Err(err) => obs::emit_error_log_write_failed(&self.path, &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.list");

        let mut log = ErrorLog::open(&path).unwrap();
        log.append("first");
        drop(log);

        let mut log = ErrorLog::open(&path).unwrap();
        log.append("second");
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("errors.list");
        match ErrorLog::open(&path) {
            Err(RenderError::OpenErrorLog { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected OpenErrorLog, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_created_with_owner_only_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.list");
        ErrorLog::open(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
