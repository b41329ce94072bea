//! # Result log
//!
//! An append-only sink receiving one human-readable line per generation.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt, SearchError};

/// Destination of per-generation summary lines.
pub trait ResultLogger {
    /// Appends `line` followed by a newline.
    fn append(&mut self, line: &str) -> Result<()>;
}

/// Collects lines in memory.
impl ResultLogger for Vec<String> {
    fn append(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl<L: ResultLogger + ?Sized> ResultLogger for &mut L {
    fn append(&mut self, line: &str) -> Result<()> {
        (**self).append(line)
    }
}

/// Appends lines to a text file, reopening it for every line.
///
/// The file handle is scoped to a single `append` call and closed when it
/// returns, whether the write succeeded or not.
#[derive(Debug, Clone)]
pub struct FileResultLogger {
    path: PathBuf,
}

impl FileResultLogger {
    /// Creates a logger for `path`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened for appending.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        open_for_append(&path).map_err(|e| {
            SearchError::Configuration(format!(
                "result log {} is not writable: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultLogger for FileResultLogger {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut file = open_for_append(&self.path)?;
        writeln!(file, "{}", line).context(format!("Failed to append to {}", self.path.display()))
    }
}

fn open_for_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tradega-log-{}-{}.txt", name, std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_file_logger_appends_lines() {
        let path = scratch_file("append");
        let mut logger = FileResultLogger::new(&path).unwrap();

        logger.append("Generation 0: Best Fitness = 0.5").unwrap();
        logger.append("Generation 1: Best Fitness = 0.6").unwrap();

        // A second logger on the same file keeps appending
        FileResultLogger::new(&path)
            .unwrap()
            .append("Generation 2: population fitness is empty")
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Generation 0: Best Fitness = 0.5\nGeneration 1: Best Fitness = 0.6\nGeneration 2: population fitness is empty\n"
        );

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_file_logger_rejects_unwritable_destination() {
        let path = std::env::temp_dir()
            .join(format!("tradega-missing-dir-{}", std::process::id()))
            .join("nested")
            .join("log.txt");

        match FileResultLogger::new(&path) {
            Err(SearchError::Configuration(msg)) => assert!(msg.contains("not writable")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_vec_logger() {
        let mut lines: Vec<String> = Vec::new();
        ResultLogger::append(&mut lines, "first").unwrap();
        ResultLogger::append(&mut &mut lines, "second").unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }
}
