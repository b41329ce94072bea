//! Ranking and truncation selection of scored populations.
pub mod elitist;

pub use elitist::{ElitistSelection, RankedIndividual};
