use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DatasetProvider, PriceWindow};
use crate::error::Result;

/// Reads datasets from CSV files with a header row, one file per dataset id,
/// resolved relative to a root directory.
#[derive(Debug, Clone)]
pub struct CsvDatasetProvider {
    root: PathBuf,
}

impl CsvDatasetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetProvider for CsvDatasetProvider {
    fn read(&self, id: &str, window: usize) -> Result<Option<PriceWindow>> {
        let path = self.root.join(id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        let columns = reader.headers()?.iter().map(String::from).collect();

        let mut tail: VecDeque<(usize, Vec<String>)> = VecDeque::with_capacity(window.min(8192));
        for (position, record) in reader.records().enumerate() {
            let record = record?;
            if window == 0 {
                continue;
            }
            if tail.len() == window {
                tail.pop_front();
            }
            tail.push_back((position, record.iter().map(String::from).collect()));
        }

        let (index, data) = tail.into_iter().unzip();
        let window = PriceWindow {
            columns,
            index,
            data,
        };
        debug!(dataset = id, rows = window.len(), path = %path.display(), "read price window");

        Ok(Some(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tradega-csv-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_read_keeps_last_rows() {
        let dir = scratch_dir("tail");
        fs::write(
            dir.join("EURUSD60.csv"),
            "Date,Close\n2024-01-01,1.10\n2024-01-02,1.11\n2024-01-03,1.12\n2024-01-04,1.13\n",
        )
        .unwrap();

        let provider = CsvDatasetProvider::new(&dir);
        let window = provider.read("EURUSD60.csv", 2).unwrap().unwrap();

        assert_eq!(window.columns, vec!["Date", "Close"]);
        assert_eq!(window.index, vec![2, 3]);
        assert_eq!(window.data[1], vec!["2024-01-04", "1.13"]);

        let whole = provider.read("EURUSD60.csv", 100).unwrap().unwrap();
        assert_eq!(whole.len(), 4);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_none() {
        let provider = CsvDatasetProvider::new(scratch_dir("missing"));
        assert!(provider.read("NOPE60.csv", 10).unwrap().is_none());
    }

    #[test]
    fn test_ragged_file_is_error() {
        let dir = scratch_dir("ragged");
        fs::write(dir.join("BAD.csv"), "a,b\n1,2\n3\n").unwrap();

        let provider = CsvDatasetProvider::new(&dir);
        assert!(provider.read("BAD.csv", 10).is_err());

        fs::remove_dir_all(dir).unwrap();
    }
}
