pub mod breeding;
pub mod config;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod evolution;
pub mod individual;
pub mod logger;
pub mod operators;
pub mod population;
pub mod rng;
pub mod selection;
pub mod space;

// Re-export commonly used types for convenience
pub use error::{Result, ResultExt, SearchError};
