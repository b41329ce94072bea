//! # Genetic Operators
//!
//! Single-point crossover over the numeric genes with a union of the parents'
//! hours, and per-gene resampling mutation with a one-hour growth step on the
//! hour set.
//!
//! Both operators return new individuals; parents are only borrowed.
//!
//! ## Hour-set growth
//!
//! Crossover unions the parents' hours, so a child can hold more hours than the
//! trailing range of the space allows. [`HoursOverflow`] decides what happens
//! then: `Keep` leaves the union untouched and relies on mutation to trim one
//! hour at a time, `Clamp` drops random hours until the set fits.
//!
//! ## Example
//!
//! ```rust
//! use tradega::individual::Individual;
//! use tradega::operators::{GeneticOperators, HoursOverflow};
//! use tradega::rng::RandomNumberGenerator;
//! use tradega::space::ParameterSpace;
//!
//! let space = ParameterSpace::new(vec![(2, 16), (2, 20), (30, 500), (1, 4)]).unwrap();
//! let operators = GeneticOperators::new(0.0, HoursOverflow::Keep);
//! let mut rng = RandomNumberGenerator::from_seed(5);
//!
//! let left = Individual::new(vec![2, 2, 30], [3, 4]).unwrap();
//! let right = Individual::new(vec![16, 20, 500], [4, 5]).unwrap();
//!
//! let child = operators.crossover(&left, &right, &space, &mut rng);
//! assert_eq!(child.allowed_hours().len(), 3);
//!
//! // A zero mutation rate leaves the child untouched.
//! let mutated = operators.mutate(child.clone(), &space, &mut rng);
//! assert_eq!(mutated, child);
//! ```

use serde::{Deserialize, Serialize};

use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;
use crate::space::{ParameterSpace, HOURS};

/// What crossover does with a hour union larger than the space allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursOverflow {
    /// Keep the full union; mutation trims it one hour at a time.
    #[default]
    Keep,
    /// Remove random hours until the set fits the hours range.
    Clamp,
}

/// Crossover and mutation with their run-wide settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticOperators {
    mutation_rate: f64,
    hours_overflow: HoursOverflow,
}

impl GeneticOperators {
    pub fn new(mutation_rate: f64, hours_overflow: HoursOverflow) -> Self {
        Self {
            mutation_rate,
            hours_overflow,
        }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn hours_overflow(&self) -> HoursOverflow {
        self.hours_overflow
    }

    /// Produces one child from two parents.
    ///
    /// The split point is drawn from `1..=n-1` where `n` is the number of numeric
    /// genes, so both parents always contribute at least one gene. With fewer
    /// than two genes the child takes parent1's genes unchanged.
    pub fn crossover(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        space: &ParameterSpace,
        rng: &mut RandomNumberGenerator,
    ) -> Individual {
        let gene_count = parent1.genes().len();
        let split = if gene_count >= 2 {
            rng.uniform_inclusive(1, gene_count as i64 - 1) as usize
        } else {
            gene_count
        };

        let genes = parent1.genes()[..split]
            .iter()
            .chain(parent2.genes().iter().skip(split))
            .copied()
            .collect();

        let hours = parent1
            .allowed_hours()
            .union(parent2.allowed_hours())
            .copied()
            .collect();

        let mut child = Individual::from_parts(genes, hours);

        if self.hours_overflow == HoursOverflow::Clamp {
            let limit = space.max_hours().max(1);
            while child.allowed_hours().len() > limit {
                remove_random_hour(&mut child, rng);
            }
        }

        child
    }

    /// Returns a mutated copy of `individual`.
    ///
    /// Each gene is resampled within its range with probability `mutation_rate`.
    /// With the same probability one missing hour is added; if that pushes the
    /// set over the hours range's upper bound, one random hour is removed again.
    pub fn mutate(
        &self,
        mut individual: Individual,
        space: &ParameterSpace,
        rng: &mut RandomNumberGenerator,
    ) -> Individual {
        for (gene, range) in individual
            .genes_mut()
            .iter_mut()
            .zip(space.gene_ranges())
        {
            if rng.chance(self.mutation_rate) {
                *gene = range.sample(rng);
            }
        }

        if rng.chance(self.mutation_rate) {
            let missing: Vec<u8> = HOURS
                .filter(|h| !individual.allowed_hours().contains(h))
                .collect();

            if !missing.is_empty() {
                let hour = missing[rng.pick_index(missing.len())];
                individual.allowed_hours_mut().insert(hour);

                // Set holds at least two hours here, removal cannot empty it.
                if individual.allowed_hours().len() > space.max_hours() {
                    remove_random_hour(&mut individual, rng);
                }
            }
        }

        individual
    }
}

fn remove_random_hour(individual: &mut Individual, rng: &mut RandomNumberGenerator) {
    let len = individual.allowed_hours().len();
    if len <= 1 {
        return;
    }
    let picked = individual.allowed_hours().iter().nth(rng.pick_index(len)).copied();
    if let Some(hour) = picked {
        individual.allowed_hours_mut().remove(&hour);
    }
}
