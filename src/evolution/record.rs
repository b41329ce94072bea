use std::fmt;

use crate::selection::RankedIndividual;

/// The best result of one generation, as written to the result log.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best ranked individual, or `None` when the ranking was empty.
    pub best: Option<RankedIndividual>,
}

impl GenerationRecord {
    pub fn new(generation: usize, best: Option<RankedIndividual>) -> Self {
        Self { generation, best }
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.score)
    }
}

impl fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.best {
            Some(best) => write!(
                f,
                "Generation {}: Best Fitness = {}, best individual = {}",
                self.generation, best.score, best.individual
            ),
            None => write!(f, "Generation {}: population fitness is empty", self.generation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Individual;

    #[test]
    fn test_display() {
        let best = RankedIndividual {
            individual: Individual::new(vec![5, 12], [4, 9]).unwrap(),
            score: 0.5,
        };

        let record = GenerationRecord::new(3, Some(best));
        assert_eq!(
            record.to_string(),
            "Generation 3: Best Fitness = 0.5, best individual = [5, 12, [4, 9]]"
        );
        assert_eq!(record.best_fitness(), Some(0.5));

        let empty = GenerationRecord::new(0, None);
        assert_eq!(empty.to_string(), "Generation 0: population fitness is empty");
        assert_eq!(empty.best_fitness(), None);
    }
}
