use std::cmp::Ordering;

use tracing::warn;

use crate::individual::Individual;

/// An individual paired with the fitness score it earned in one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedIndividual {
    /// The scored individual.
    pub individual: Individual,
    /// The fitness score of the individual.
    pub score: f64,
}

/// A selection strategy that keeps the highest-scoring individuals.
///
/// Ranking is a stable descending sort, so individuals with equal scores keep
/// the order they had in the population. NaN scores always rank last.
///
/// # Examples
///
/// ```
/// use tradega::individual::Individual;
/// use tradega::selection::ElitistSelection;
///
/// let population = vec![
///     Individual::new(vec![1], [3]).unwrap(),
///     Individual::new(vec![2], [4]).unwrap(),
///     Individual::new(vec![3], [5]).unwrap(),
/// ];
/// let fitness = vec![0.5, 0.8, 0.5];
///
/// let selection = ElitistSelection::new();
/// let ranked = selection.rank(&population, &fitness);
/// let survivors = selection.select(&ranked, 2);
///
/// assert_eq!(survivors[0].genes(), &[2]);
/// assert_eq!(survivors[1].genes(), &[1]); // tie with [3], kept in population order
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ElitistSelection;

impl ElitistSelection {
    pub fn new() -> Self {
        Self
    }

    /// Pairs each individual with its score and sorts best first.
    ///
    /// Population and fitness are paired by position. If their lengths differ the
    /// surplus of the longer one is dropped and a warning is emitted.
    pub fn rank(&self, population: &[Individual], fitness: &[f64]) -> Vec<RankedIndividual> {
        if fitness.len() != population.len() {
            warn!(
                population = population.len(),
                scores = fitness.len(),
                "fitness length doesn't match population length, ranking the paired prefix"
            );
        }

        let mut ranked: Vec<RankedIndividual> = population
            .iter()
            .zip(fitness)
            .map(|(individual, &score)| RankedIndividual {
                individual: individual.clone(),
                score,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score.partial_cmp(&a.score).unwrap_or_else(|| {
                match (a.score.is_nan(), b.score.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    _ => Ordering::Less,
                }
            })
        });

        ranked
    }

    /// Keeps the first `num_to_select` ranked individuals.
    pub fn select(&self, ranked: &[RankedIndividual], num_to_select: usize) -> Vec<Individual> {
        ranked
            .iter()
            .take(num_to_select)
            .map(|r| r.individual.clone())
            .collect()
    }
}
