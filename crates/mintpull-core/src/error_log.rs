use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PullError;

/// Append-only `errors.txt`, one `"<mint>, <message>"` line per failed mint.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Creates the log empty when it does not exist yet. Existing content is kept.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, PullError> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| PullError::write(&path, err))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, mint: &str, message: &str) -> Result<(), PullError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| PullError::write(&self.path, err))?;
        writeln!(file, "{mint}, {message}").map_err(|err| PullError::write(&self.path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn lines(log: &ErrorLog) -> Vec<String> {
        fs::read_to_string(log.path())
            .expect("read log")
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn create_keeps_existing_lines() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("errors.txt");
        fs::write(&path, "old, failure\n").expect("seed");

        let log = ErrorLog::create(&path).expect("create");
        log.append("m1", "boom").expect("append");

        assert_eq!(lines(&log), vec!["old, failure", "m1, boom"]);
    }

    #[test]
    fn create_makes_empty_file() {
        let temp = tempdir().expect("tempdir");
        let log = ErrorLog::create(temp.path().join("errors.txt")).expect("create");
        assert!(log.path().exists());
        assert!(lines(&log).is_empty());
    }
}
