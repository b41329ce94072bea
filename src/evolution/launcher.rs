use tracing::{debug, info, warn};

use super::{
    evaluator::Evaluator,
    options::{LogLevel, SearchOptions},
    record::GenerationRecord,
};
use crate::{
    breeding::RefillStrategy,
    error::Result,
    individual::Individual,
    logger::ResultLogger,
    population::generate_population,
    rng::RandomNumberGenerator,
    selection::{ElitistSelection, RankedIndividual},
    space::ParameterSpace,
};

/// Represents the result of a search: one record per generation and the
/// population left after the last breeding step.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Generation records, in generation order.
    pub records: Vec<GenerationRecord>,
    /// The final population.
    pub population: Vec<Individual>,
}

impl SearchOutcome {
    /// The best individual seen in any generation.
    pub fn best(&self) -> Option<&RankedIndividual> {
        self.records
            .iter()
            .filter_map(|record| record.best.as_ref())
            .fold(None, |best: Option<&RankedIndividual>, candidate| match best {
                Some(current) if current.score >= candidate.score || candidate.score.is_nan() => {
                    Some(current)
                }
                _ => Some(candidate),
            })
    }
}

/// Drives the search: evaluates, ranks, logs, selects and breeds for a fixed
/// number of generations.
#[derive(Debug)]
pub struct SearchLauncher<E, L>
where
    E: Evaluator,
    L: ResultLogger,
{
    evaluator: E,
    logger: L,
    selection: ElitistSelection,
    breeder: RefillStrategy,
}

impl<E, L> SearchLauncher<E, L>
where
    E: Evaluator,
    L: ResultLogger,
{
    /// Creates a new `SearchLauncher` scoring populations with `evaluator` and
    /// writing one line per generation to `logger`.
    pub fn new(evaluator: E, logger: L) -> Self {
        Self {
            evaluator,
            logger,
            selection: ElitistSelection::default(),
            breeder: RefillStrategy::new(),
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    pub fn into_logger(self) -> L {
        self.logger
    }

    /// Runs `options.get_num_generations()` generations over `datasets`.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options are invalid (zero population, mutation rate outside `[0, 1]`)
    /// - The evaluator fails to submit a batch
    /// - The result log cannot be written
    ///
    /// Per-job failures never surface here; they only lower the affected scores.
    pub fn evolve(
        &mut self,
        options: &SearchOptions,
        space: &ParameterSpace,
        datasets: &[String],
        rng: &mut RandomNumberGenerator,
    ) -> Result<SearchOutcome> {
        options.validate()?;

        let population_size = options.get_population_size();
        let mut population = generate_population(space, population_size, rng);
        let mut records = Vec::with_capacity(options.get_num_generations());

        for generation in 0..options.get_num_generations() {
            let fitness = self.evaluator.evaluate(&population, datasets)?;
            let ranked = self.selection.rank(&population, &fitness);

            let record = GenerationRecord::new(generation, ranked.first().cloned());
            if record.best.is_none() {
                warn!(generation, "population fitness is empty");
            }
            self.logger.append(&record.to_string())?;

            match options.get_log_level() {
                LogLevel::Minimal => {
                    info!(generation, best_fitness = ?record.best_fitness(), "generation complete")
                }
                LogLevel::Verbose => {
                    info!(generation, best_fitness = ?record.best_fitness(), "generation complete");
                    ranked.iter().for_each(|r| {
                        debug!(generation, score = r.score, individual = %r.individual, "ranked");
                    });
                }
                LogLevel::None => {}
            }

            let survivors = self.selection.select(&ranked, population_size / 2);
            population = self.breeder.breed(&survivors, options, space, rng);
            records.push(record);
        }

        Ok(SearchOutcome {
            records,
            population,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    /// Scores each individual by its first gene.
    struct FirstGene;

    impl Evaluator for FirstGene {
        fn evaluate(&self, population: &[Individual], _datasets: &[String]) -> Result<Vec<f64>> {
            Ok(population.iter().map(|i| i.genes()[0] as f64).collect())
        }
    }

    struct NoScores;

    impl Evaluator for NoScores {
        fn evaluate(&self, _population: &[Individual], _datasets: &[String]) -> Result<Vec<f64>> {
            Ok(Vec::new())
        }
    }

    fn space() -> ParameterSpace {
        ParameterSpace::new(vec![(2, 16), (2, 20), (30, 500), (1, 4)]).unwrap()
    }

    #[test]
    fn test_evolve_logs_one_line_per_generation() {
        let options = SearchOptions::builder()
            .num_generations(3)
            .population_size(8)
            .log_level(LogLevel::None)
            .build();
        let mut launcher = SearchLauncher::new(FirstGene, Vec::new());
        let mut rng = RandomNumberGenerator::from_seed(11);

        let outcome = launcher
            .evolve(&options, &space(), &["EURUSD60.csv".to_string()], &mut rng)
            .unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.population.len(), 8);

        let lines = launcher.into_logger();
        assert_eq!(lines.len(), 3);
        for (generation, line) in lines.iter().enumerate() {
            assert!(line.starts_with(&format!("Generation {}: Best Fitness = ", generation)));
        }
    }

    #[test]
    fn test_evolve_keeps_best_across_generations() {
        let options = SearchOptions::builder()
            .num_generations(5)
            .population_size(10)
            .mutation_rate(0.0)
            .log_level(LogLevel::None)
            .build();
        let mut launcher = SearchLauncher::new(FirstGene, Vec::new());
        let mut rng = RandomNumberGenerator::from_seed(3);

        let outcome = launcher.evolve(&options, &space(), &[], &mut rng).unwrap();

        // Survivors are carried over, so the best score never drops
        let scores: Vec<f64> = outcome
            .records
            .iter()
            .map(|r| r.best_fitness().unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(outcome.best().unwrap().score, *scores.last().unwrap());
    }

    #[test]
    fn test_evolve_empty_ranking_writes_sentinel() {
        let options = SearchOptions::builder()
            .num_generations(2)
            .population_size(4)
            .log_level(LogLevel::None)
            .build();
        let mut launcher = SearchLauncher::new(NoScores, Vec::new());
        let mut rng = RandomNumberGenerator::from_seed(5);

        let outcome = launcher.evolve(&options, &space(), &[], &mut rng).unwrap();

        assert!(outcome.best().is_none());
        assert_eq!(outcome.population.len(), 4);
        assert_eq!(
            launcher.logger(),
            &vec![
                "Generation 0: population fitness is empty".to_string(),
                "Generation 1: population fitness is empty".to_string(),
            ]
        );
    }

    #[test]
    fn test_evolve_rejects_zero_population() {
        let options = SearchOptions::builder().population_size(0).build();
        let mut launcher = SearchLauncher::new(FirstGene, Vec::new());
        let mut rng = RandomNumberGenerator::from_seed(1);

        match launcher.evolve(&options, &space(), &[], &mut rng) {
            Err(SearchError::Configuration(msg)) => {
                assert_eq!(msg, "Population size cannot be zero")
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
        assert!(launcher.logger().is_empty());
    }
}
