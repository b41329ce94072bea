//! # Run configuration
//!
//! A search run is described by one JSON file. Every field except `trainer`
//! has a default, so the smallest useful configuration is:
//!
//! ```json
//! {"trainer": {"program": "python3", "args": ["train.py"]}}
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tradega::config::SearchConfig;
//!
//! let config = SearchConfig::from_json(
//!     r#"{"trainer": {"program": "python3"}, "population_size": 20, "seed": 7}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.options().get_population_size(), 20);
//! assert_eq!(config.datasets.len(), 11);
//! assert_eq!(config.window_size, 7000);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::dispatch::command::CommandTrainer;
use crate::error::{Result, ResultExt, SearchError};
use crate::evolution::evaluator::{TradeFloor, DEFAULT_WINDOW_SIZE};
use crate::evolution::options::{LogLevel, SearchOptions};
use crate::operators::HoursOverflow;
use crate::rng::RandomNumberGenerator;
use crate::space::ParameterSpace;

const DEFAULT_DATASETS: [&str; 11] = [
    "EURUSD60.csv",
    "AUDCAD60.csv",
    "AUDCHF60.csv",
    "AUDNZD60.csv",
    "AUDUSD60.csv",
    "EURAUD60.csv",
    "EURCHF60.csv",
    "EURGBP60.csv",
    "GBPUSD60.csv",
    "USDCAD60.csv",
    "USDCHF60.csv",
];

/// Everything a search run needs, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default = "default_datasets")]
    pub datasets: Vec<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_num_generations")]
    pub num_generations: usize,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default)]
    pub parameter_space: ParameterSpace,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Seconds to wait for one generation's batch; `null` waits forever.
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: Option<u64>,
    /// Worker threads for local dispatch; absent means one per CPU.
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub cache_datasets: bool,
    #[serde(default)]
    pub hours_overflow: HoursOverflow,
    #[serde(default)]
    pub trade_floor: TradeFloor,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub seed: Option<u64>,
    pub trainer: CommandTrainer,
}

fn default_datasets() -> Vec<String> {
    DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_population_size() -> usize {
    150
}

fn default_num_generations() -> usize {
    40
}

fn default_mutation_rate() -> f64 {
    0.02
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_batch_timeout_secs() -> Option<u64> {
    Some(3600)
}

fn default_log_file() -> PathBuf {
    PathBuf::from("ga_results.txt")
}

impl SearchConfig {
    /// Reads and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read config {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Parses and validates a configuration document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| SearchError::Configuration(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that serde alone cannot.
    pub fn validate(&self) -> Result<()> {
        self.options().validate()?;

        if self.window_size == 0 {
            return Err(SearchError::Configuration(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.batch_timeout_secs == Some(0) {
            return Err(SearchError::Configuration(
                "batch_timeout_secs must be positive or null".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(SearchError::Configuration(
                "workers must be at least 1 when set".to_string(),
            ));
        }
        if !self.trade_floor.factor.is_finite() || self.trade_floor.factor < 0.0 {
            return Err(SearchError::Configuration(format!(
                "trade_floor.factor must be a non-negative number, got {}",
                self.trade_floor.factor
            )));
        }
        if self.trainer.timeout_secs == Some(0) {
            return Err(SearchError::Configuration(
                "trainer.timeout_secs must be positive or absent".to_string(),
            ));
        }
        if self.trainer.program.trim().is_empty() {
            return Err(SearchError::Configuration(
                "trainer.program cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn options(&self) -> SearchOptions {
        SearchOptions::builder()
            .num_generations(self.num_generations)
            .population_size(self.population_size)
            .mutation_rate(self.mutation_rate)
            .log_level(self.log_level)
            .hours_overflow(self.hours_overflow)
            .build()
    }

    /// The trainer command. Without a deadline of its own, a trainer process
    /// may run as long as one batch before it is killed.
    pub fn trainer(&self) -> CommandTrainer {
        let mut trainer = self.trainer.clone();
        if trainer.timeout_secs.is_none() {
            trainer.timeout_secs = self.batch_timeout_secs;
        }
        trainer
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_secs.map(Duration::from_secs)
    }

    /// Worker count handed to the thread pool; zero lets rayon decide.
    pub fn worker_threads(&self) -> usize {
        self.workers.unwrap_or(0)
    }

    /// A seeded generator when `seed` is set, an entropy-seeded one otherwise.
    pub fn rng(&self) -> RandomNumberGenerator {
        match self.seed {
            Some(seed) => RandomNumberGenerator::from_seed(seed),
            None => RandomNumberGenerator::new(),
        }
    }
}
