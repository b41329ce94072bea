//! # Breeding
//!
//! Refilling a generation's survivors back to the configured population size.
pub mod refill;

pub use refill::RefillStrategy;
