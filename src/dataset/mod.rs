//! # Datasets
//!
//! A [`DatasetProvider`] resolves a dataset identifier (for example
//! `EURUSD60.csv`) into a [`PriceWindow`], the most recent rows of historical
//! prices. Windows are immutable once read and travel to trainers as
//! "split"-oriented JSON:
//!
//! ```json
//! {"columns": ["Date", "Close"], "index": [6998, 6999], "data": [["...", "1.1"], ["...", "1.2"]]}
//! ```
pub mod cache;
pub mod csv_file;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use self::cache::CachedDatasetProvider;
pub use self::csv_file::CsvDatasetProvider;

/// The trailing rows of a price dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWindow {
    /// Column names, in file order.
    pub columns: Vec<String>,
    /// Row positions in the full dataset, 0-based and excluding the header.
    pub index: Vec<usize>,
    /// Cell values, one inner vector per row.
    pub data: Vec<Vec<String>>,
}

impl PriceWindow {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serializes the window as split-oriented JSON.
    pub fn to_split_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Source of historical price windows.
pub trait DatasetProvider: Send + Sync {
    /// Returns the last `window` rows of dataset `id`.
    ///
    /// `Ok(None)` signals that the dataset does not exist. Errors are reserved
    /// for datasets that exist but cannot be read.
    fn read(&self, id: &str, window: usize) -> Result<Option<PriceWindow>>;
}
