//! # RefillStrategy
//!
//! The `RefillStrategy` struct grows the survivors of a generation back to the
//! configured population size. Survivors are carried over unchanged; every
//! missing slot is filled with `mutate(crossover(parent1, parent2))`.
use tracing::debug;

use crate::{
    evolution::options::SearchOptions,
    individual::Individual,
    population::generate_individual,
    rng::RandomNumberGenerator,
    space::ParameterSpace,
};

/// # RefillStrategy
///
/// Parents are two distinct survivors picked uniformly at random. When fewer than
/// two survivors exist (a population of one keeps no survivors at all), both
/// parents are freshly generated random individuals instead.
#[derive(Debug, Clone, Default)]
pub struct RefillStrategy {
    // No fields needed
}

impl RefillStrategy {
    /// Creates a new `RefillStrategy` instance.
    pub fn new() -> Self {
        Self {}
    }

    /// Returns the survivors followed by newly bred children, `population_size`
    /// individuals in total.
    ///
    /// Survivors beyond `population_size` are kept as is; the strategy never
    /// shrinks a population.
    pub fn breed(
        &self,
        survivors: &[Individual],
        options: &SearchOptions,
        space: &ParameterSpace,
        rng: &mut RandomNumberGenerator,
    ) -> Vec<Individual> {
        let target = options.get_population_size();
        let operators = options.operators();

        let mut population = Vec::with_capacity(target.max(survivors.len()));
        population.extend_from_slice(survivors);

        if survivors.len() < 2 && population.len() < target {
            debug!(
                survivors = survivors.len(),
                "too few survivors, breeding from random parents"
            );
        }

        while population.len() < target {
            let child = if survivors.len() >= 2 {
                let (first, second) = rng.pick_two_distinct(survivors.len());
                operators.crossover(&survivors[first], &survivors[second], space, rng)
            } else {
                let parent1 = generate_individual(space, rng);
                let parent2 = generate_individual(space, rng);
                operators.crossover(&parent1, &parent2, space, rng)
            };

            population.push(operators.mutate(child, space, rng));
        }

        population
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::generate_population;

    fn options(population_size: usize) -> SearchOptions {
        SearchOptions::builder()
            .population_size(population_size)
            .mutation_rate(0.5)
            .build()
    }

    #[test]
    fn test_breed_restores_population_size() {
        let space = ParameterSpace::default();
        let mut rng = RandomNumberGenerator::from_seed(4);
        let survivors = generate_population(&space, 5, &mut rng);

        let population = RefillStrategy::new().breed(&survivors, &options(10), &space, &mut rng);

        assert_eq!(population.len(), 10);
        assert_eq!(&population[..5], &survivors[..]);
    }

    #[test]
    fn test_breed_without_survivors() {
        let space = ParameterSpace::default();
        let mut rng = RandomNumberGenerator::new();

        let population = RefillStrategy::new().breed(&[], &options(1), &space, &mut rng);

        assert_eq!(population.len(), 1);
        assert!(!population[0].allowed_hours().is_empty());
    }

    #[test]
    fn test_breed_with_single_survivor() {
        let space = ParameterSpace::default();
        let mut rng = RandomNumberGenerator::new();
        let survivors = generate_population(&space, 1, &mut rng);

        let population = RefillStrategy::new().breed(&survivors, &options(3), &space, &mut rng);

        assert_eq!(population.len(), 3);
        assert_eq!(population[0], survivors[0]);
    }

    #[test]
    fn test_breed_children_come_from_survivor_genes() {
        let space = ParameterSpace::new(vec![(0, 1000), (0, 1000), (0, 1000), (1, 21)]).unwrap();
        let mut rng = RandomNumberGenerator::new();
        let survivors = vec![
            Individual::new(vec![1, 1, 1], [3]).unwrap(),
            Individual::new(vec![2, 2, 2], [4]).unwrap(),
        ];
        let options = SearchOptions::builder()
            .population_size(6)
            .mutation_rate(0.0)
            .build();

        let population = RefillStrategy::new().breed(&survivors, &options, &space, &mut rng);

        for child in &population[2..] {
            assert!(child.genes().iter().all(|g| *g == 1 || *g == 2));
            let hours: Vec<u8> = child.allowed_hours().iter().copied().collect();
            assert_eq!(hours, vec![3, 4]);
        }
    }

    #[test]
    fn test_breed_never_shrinks() {
        let space = ParameterSpace::default();
        let mut rng = RandomNumberGenerator::new();
        let survivors = generate_population(&space, 4, &mut rng);

        let population = RefillStrategy::new().breed(&survivors, &options(2), &space, &mut rng);
        assert_eq!(population.len(), 4);
    }
}
