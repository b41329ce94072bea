//! # ParameterSpace
//!
//! The discrete search space: one inclusive integer range per numeric gene,
//! followed by a trailing range bounding how many trading hours an individual
//! may allow. Hours themselves are drawn from [`HOURS`].

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::rng::RandomNumberGenerator;

/// Hours of the day an individual may trade in.
pub const HOURS: RangeInclusive<u8> = 3..=23;

/// Number of distinct values in [`HOURS`].
pub const HOUR_UNIVERSE_SIZE: usize = 21;

/// Returns every hour of [`HOURS`] in ascending order.
pub fn hour_universe() -> Vec<u8> {
    HOURS.collect()
}

/// An inclusive integer range `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct GeneRange {
    pub low: i64,
    pub high: i64,
}

impl GeneRange {
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    /// Draws a uniform value within the range.
    pub fn sample(&self, rng: &mut RandomNumberGenerator) -> i64 {
        rng.uniform_inclusive(self.low, self.high)
    }
}

impl From<(i64, i64)> for GeneRange {
    fn from((low, high): (i64, i64)) -> Self {
        Self::new(low, high)
    }
}

impl From<GeneRange> for (i64, i64) {
    fn from(range: GeneRange) -> Self {
        (range.low, range.high)
    }
}

/// Validated sequence of gene ranges plus the trailing hours-count range.
///
/// Construction rejects spaces with fewer than two ranges, inverted ranges, and
/// an hours-count range that would allow an empty hour set.
///
/// ```rust
/// use tradega::space::ParameterSpace;
///
/// let space = ParameterSpace::new(vec![(2, 16), (2, 20), (30, 500)]).unwrap();
/// assert_eq!(space.gene_count(), 2);
/// assert_eq!(space.hours_range().high, 500);
///
/// assert!(ParameterSpace::new(vec![(2, 16)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(i64, i64)>", into = "Vec<(i64, i64)>")]
pub struct ParameterSpace {
    ranges: Vec<GeneRange>,
}

impl ParameterSpace {
    pub fn new(ranges: Vec<(i64, i64)>) -> Result<Self> {
        if ranges.len() < 2 {
            return Err(SearchError::Configuration(format!(
                "Parameter space needs at least one gene range and the hours range, got {} range(s)",
                ranges.len()
            )));
        }

        if let Some((idx, (low, high))) = ranges
            .iter()
            .enumerate()
            .find(|(_, (low, high))| low > high)
        {
            return Err(SearchError::Configuration(format!(
                "Range {} is inverted: [{}, {}]",
                idx, low, high
            )));
        }

        let (hours_low, _) = ranges[ranges.len() - 1];
        if hours_low < 1 {
            return Err(SearchError::Configuration(format!(
                "Allowed hours range must start at 1 or more, got {}",
                hours_low
            )));
        }

        Ok(Self {
            ranges: ranges.into_iter().map(GeneRange::from).collect(),
        })
    }

    /// Ranges of the numeric genes, without the trailing hours range.
    pub fn gene_ranges(&self) -> &[GeneRange] {
        &self.ranges[..self.ranges.len() - 1]
    }

    /// The range bounding the number of allowed hours.
    pub fn hours_range(&self) -> GeneRange {
        self.ranges[self.ranges.len() - 1]
    }

    /// Upper bound on the hour-set size, never above the universe size.
    pub fn max_hours(&self) -> usize {
        (self.hours_range().high as usize).min(HOUR_UNIVERSE_SIZE)
    }

    pub fn gene_count(&self) -> usize {
        self.ranges.len() - 1
    }
}

impl Default for ParameterSpace {
    /// The space searched by the production run: three indicator periods, two
    /// training sizes, a threshold percentage and the hours count.
    fn default() -> Self {
        Self {
            ranges: [
                (2, 16),
                (2, 20),
                (30, 500),
                (500, 6000),
                (100, 5000),
                (52, 70),
                (8, 18),
            ]
            .into_iter()
            .map(GeneRange::from)
            .collect(),
        }
    }
}

impl TryFrom<Vec<(i64, i64)>> for ParameterSpace {
    type Error = SearchError;

    fn try_from(ranges: Vec<(i64, i64)>) -> Result<Self> {
        Self::new(ranges)
    }
}

impl From<ParameterSpace> for Vec<(i64, i64)> {
    fn from(space: ParameterSpace) -> Self {
        space.ranges.into_iter().map(<(i64, i64)>::from).collect()
    }
}
