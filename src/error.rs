//! # Error Types
//!
//! This module defines the error type shared by the search engine, its
//! collaborators and the command line entry point.
//!
//! Per-job problems (a missing dataset, a crashed trainer, a malformed result)
//! never surface here: the evaluator contains them and scores the affected
//! individual accordingly. `SearchError` is reserved for failures that stop a
//! run, such as an invalid configuration or an unwritable result log.
//!
//! ## Examples
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use tradega::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_prices(path: &str) -> Result<()> {
//!     File::open(path).context("Failed to open price file")?;
//!     Ok(())
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can abort a search run.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an individual is built from invalid parts.
    #[error("Invalid individual: {0}")]
    InvalidIndividual(String),

    /// Error that occurs when a dataset cannot be read or serialized.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Error that occurs when the dispatch fabric cannot accept a batch.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error that occurs when JSON encoding or decoding fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error that occurs when a CSV file cannot be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Extension trait for Result to add context to errors.
///
/// This trait provides a convenient way to add context to errors when
/// converting from one error type to `SearchError`.
pub trait ResultExt<T, E> {
    /// Adds context to an error.
    ///
    /// This method converts the error to a `SearchError` with the provided context.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| SearchError::Other(format!("{}: {}", context, e)))
    }
}
