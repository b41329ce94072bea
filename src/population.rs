//! Random individuals and initial populations drawn from a [`ParameterSpace`].

use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;
use crate::space::{hour_universe, ParameterSpace};

/// Draws one individual uniformly from `space`.
///
/// Every gene is sampled within its range. The hours count `k` is sampled within
/// the trailing range, clamped to the size of the hour universe, and `k`
/// distinct hours are then sampled without replacement.
pub fn generate_individual(space: &ParameterSpace, rng: &mut RandomNumberGenerator) -> Individual {
    let genes = space
        .gene_ranges()
        .iter()
        .map(|range| range.sample(rng))
        .collect();

    let hours_range = space.hours_range();
    let count = (hours_range.sample(rng) as usize).min(space.max_hours());
    let hours = rng.sample_distinct(&hour_universe(), count);

    Individual::from_parts(genes, hours.into_iter().collect())
}

/// Draws `size` independent individuals.
pub fn generate_population(
    space: &ParameterSpace,
    size: usize,
    rng: &mut RandomNumberGenerator,
) -> Vec<Individual> {
    (0..size).map(|_| generate_individual(space, rng)).collect()
}
