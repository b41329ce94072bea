//! # SearchOptions
//!
//! The `SearchOptions` struct represents the configuration of the evolution loop:
//! how many generations to run, how large each population is, how aggressively
//! children mutate and how progress is reported.
//!
//! ## Example
//!
//! ```rust
//! use tradega::evolution::options::{LogLevel, SearchOptions};
//! use tradega::operators::HoursOverflow;
//!
//! // Create a new SearchOptions instance with custom parameters
//! let custom_options = SearchOptions::new(40, LogLevel::Minimal, 150, 0.02);
//!
//! // Or through the builder
//! let options = SearchOptions::builder()
//!     .num_generations(10)
//!     .population_size(20)
//!     .hours_overflow(HoursOverflow::Clamp)
//!     .build();
//! assert_eq!(options.get_population_size(), 20);
//! assert_eq!(options.get_mutation_rate(), 0.02);
//! ```
//!
//! ## Structs
//!
//! ### `SearchOptions`
//!
//! #### Fields
//!
//! - `num_generations`: The number of generations to run; there is no early stop.
//! - `log_level`: How much progress is reported through `tracing`.
//! - `population_size`: The size of the population in each generation.
//! - `mutation_rate`: Per-gene (and per-hour-set) mutation probability.
//! - `hours_overflow`: What crossover does with hour unions that outgrow the space.
//!
//! ### `LogLevel`
//!
//! - `Verbose`: One event per generation plus one per ranked individual.
//! - `Minimal`: One event per generation.
//! - `None`: No progress events. The result log is written regardless.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::operators::{GeneticOperators, HoursOverflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    #[default]
    Minimal,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    num_generations: usize,
    log_level: LogLevel,
    population_size: usize,
    mutation_rate: f64,
    hours_overflow: HoursOverflow,
}

impl SearchOptions {
    pub fn new(
        num_generations: usize,
        log_level: LogLevel,
        population_size: usize,
        mutation_rate: f64,
    ) -> Self {
        Self {
            num_generations,
            log_level,
            population_size,
            mutation_rate,
            hours_overflow: HoursOverflow::default(),
        }
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_hours_overflow(&self) -> HoursOverflow {
        self.hours_overflow
    }

    /// The genetic operators configured by these options.
    pub fn operators(&self) -> GeneticOperators {
        GeneticOperators::new(self.mutation_rate, self.hours_overflow)
    }

    /// Checks the options before a run starts.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the population size is zero or the
    /// mutation rate is not a probability.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SearchError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SearchError::Configuration(format!(
                "Mutation rate must lie in [0, 1], got {}",
                self.mutation_rate
            )));
        }

        Ok(())
    }

    /// Returns a builder for creating a `SearchOptions` instance.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_generations: 40,
            log_level: LogLevel::Minimal,
            population_size: 150,
            mutation_rate: 0.02,
            hours_overflow: HoursOverflow::Keep,
        }
    }
}

/// Builder for `SearchOptions`.
///
/// Provides a fluent interface for constructing `SearchOptions` instances.
/// Unset fields fall back to `SearchOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptionsBuilder {
    num_generations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    mutation_rate: Option<f64>,
    hours_overflow: Option<HoursOverflow>,
}

impl SearchOptionsBuilder {
    /// Sets the number of generations.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    /// Sets the mutation rate.
    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    /// Sets the crossover hours overflow policy.
    pub fn hours_overflow(mut self, value: HoursOverflow) -> Self {
        self.hours_overflow = Some(value);
        self
    }

    /// Builds the `SearchOptions` instance.
    pub fn build(self) -> SearchOptions {
        let defaults = SearchOptions::default();
        SearchOptions {
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            mutation_rate: self.mutation_rate.unwrap_or(defaults.mutation_rate),
            hours_overflow: self.hours_overflow.unwrap_or(defaults.hours_overflow),
        }
    }
}
