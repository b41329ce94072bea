//! # Individual
//!
//! An `Individual` is one candidate configuration in the search: a fixed-length
//! vector of integer genes, one per numeric range of the
//! [`ParameterSpace`](crate::space::ParameterSpace), followed by the set of hours
//! during which the encoded strategy may trade.
//!
//! Hours are held in a `BTreeSet`, so they are always distinct and ascending.
//! The set is never empty once an individual exists.
//!
//! ## Example
//!
//! ```rust
//! use tradega::individual::Individual;
//!
//! let individual = Individual::new(vec![5, 12, 300], [9, 4, 17]).unwrap();
//! assert_eq!(individual.to_string(), "[5, 12, 300, [4, 9, 17]]");
//!
//! // Hours must come from 3..=23 and there must be at least one.
//! assert!(Individual::new(vec![5], [2]).is_err());
//! assert!(Individual::new(vec![5], []).is_err());
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::space::HOURS;

/// One candidate configuration: numeric genes plus allowed trading hours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Individual {
    genes: Vec<i64>,
    allowed_hours: BTreeSet<u8>,
}

impl Individual {
    /// Builds an individual, rejecting empty hour sets and hours outside
    /// [`HOURS`]. Duplicate hours collapse into one.
    pub fn new(genes: Vec<i64>, allowed_hours: impl IntoIterator<Item = u8>) -> Result<Self> {
        let allowed_hours: BTreeSet<u8> = allowed_hours.into_iter().collect();

        if allowed_hours.is_empty() {
            return Err(SearchError::InvalidIndividual(
                "allowed hours cannot be empty".to_string(),
            ));
        }

        if let Some(hour) = allowed_hours.iter().find(|h| !HOURS.contains(*h)) {
            return Err(SearchError::InvalidIndividual(format!(
                "hour {} is outside {}..={}",
                hour,
                HOURS.start(),
                HOURS.end()
            )));
        }

        Ok(Self {
            genes,
            allowed_hours,
        })
    }

    /// Assembles an individual from parts the caller already validated.
    pub(crate) fn from_parts(genes: Vec<i64>, allowed_hours: BTreeSet<u8>) -> Self {
        debug_assert!(!allowed_hours.is_empty());
        Self {
            genes,
            allowed_hours,
        }
    }

    pub fn genes(&self) -> &[i64] {
        &self.genes
    }

    pub fn allowed_hours(&self) -> &BTreeSet<u8> {
        &self.allowed_hours
    }

    pub(crate) fn genes_mut(&mut self) -> &mut Vec<i64> {
        &mut self.genes
    }

    pub(crate) fn allowed_hours_mut(&mut self) -> &mut BTreeSet<u8> {
        &mut self.allowed_hours
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for gene in &self.genes {
            write!(f, "{}, ", gene)?;
        }
        write!(f, "[")?;
        for (i, hour) in self.allowed_hours.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", hour)?;
        }
        write!(f, "]]")
    }
}
