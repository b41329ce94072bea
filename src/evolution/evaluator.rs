//! # Fitness evaluation
//!
//! [`Evaluator`] is the seam between the evolution loop and whatever scores a
//! population. [`DistributedEvaluator`] is the production implementation: it
//! fans the whole `population × datasets` cross product out as one batch on a
//! [`TaskDispatcher`] and folds the trainer results back into one score per
//! individual.
//!
//! ## Scoring
//!
//! A job result counts only if it is a `Success` with a finite accuracy and the
//! trade count `wins + losses` reaches the individual's [`TradeFloor`]. An
//! individual's score is the mean accuracy of its counted results, or exactly
//! `0.0` when none counted. Missing datasets, failed jobs and timed-out jobs
//! never abort the generation.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::dataset::DatasetProvider;
use crate::dispatch::{EvaluationJob, TaskDispatcher, TrainerResult};
use crate::error::Result;
use crate::individual::Individual;

/// Most recent rows handed to the trainer per dataset.
pub const DEFAULT_WINDOW_SIZE: usize = 7000;

/// Scores a whole population against a set of datasets.
pub trait Evaluator {
    /// Returns one score per individual, in population order.
    fn evaluate(&self, population: &[Individual], datasets: &[String]) -> Result<Vec<f64>>;
}

/// Minimum number of trades a job result needs to count.
///
/// The floor scales with one of the individual's genes:
/// `floor = factor × genes[gene_index]`. An individual without that gene has a
/// floor of zero.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TradeFloor {
    pub gene_index: usize,
    pub factor: f64,
}

impl TradeFloor {
    pub fn new(gene_index: usize, factor: f64) -> Self {
        Self { gene_index, factor }
    }

    pub fn minimum_trades(&self, individual: &Individual) -> f64 {
        individual
            .genes()
            .get(self.gene_index)
            .map_or(0.0, |&gene| self.factor * gene as f64)
    }

    pub fn accepts(&self, individual: &Individual, wins: u64, losses: u64) -> bool {
        wins.saturating_add(losses) as f64 >= self.minimum_trades(individual)
    }
}

impl Default for TradeFloor {
    /// A fifth of 3.3% of the training-size gene.
    fn default() -> Self {
        Self {
            gene_index: 3,
            factor: 0.2 * 0.033,
        }
    }
}

/// Running total of counted accuracies for one individual.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: f64,
    counted: usize,
}

impl Tally {
    fn mean(&self) -> f64 {
        if self.counted > 0 {
            self.total / self.counted as f64
        } else {
            0.0
        }
    }
}

/// Evaluates populations through a dataset provider and a task dispatcher.
#[derive(Debug)]
pub struct DistributedEvaluator<P, D>
where
    P: DatasetProvider,
    D: TaskDispatcher,
{
    provider: P,
    dispatcher: D,
    window_size: usize,
    batch_timeout: Option<Duration>,
    trade_floor: TradeFloor,
}

impl<P, D> DistributedEvaluator<P, D>
where
    P: DatasetProvider,
    D: TaskDispatcher,
{
    /// Creates an evaluator with the default window, a one hour batch timeout
    /// and the default trade floor.
    pub fn new(provider: P, dispatcher: D) -> Self {
        Self {
            provider,
            dispatcher,
            window_size: DEFAULT_WINDOW_SIZE,
            batch_timeout: Some(Duration::from_secs(3600)),
            trade_floor: TradeFloor::default(),
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Bounds the wait for a batch; `None` waits forever.
    pub fn with_batch_timeout(mut self, batch_timeout: Option<Duration>) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }

    pub fn with_trade_floor(mut self, trade_floor: TradeFloor) -> Self {
        self.trade_floor = trade_floor;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Builds one job per readable (individual, dataset) pair, along with the
    /// population index owning each job.
    fn build_jobs(
        &self,
        population: &[Individual],
        datasets: &[String],
    ) -> (Vec<EvaluationJob>, Vec<usize>) {
        let mut jobs = Vec::with_capacity(population.len() * datasets.len());
        let mut owners = Vec::with_capacity(jobs.capacity());

        for (owner, individual) in population.iter().enumerate() {
            for dataset in datasets {
                let window = match self.provider.read(dataset, self.window_size) {
                    Ok(Some(window)) => window,
                    Ok(None) => {
                        warn!(dataset = %dataset, "dataset not found, skipping");
                        continue;
                    }
                    Err(e) => {
                        warn!(dataset = %dataset, error = %e, "failed to read dataset, skipping");
                        continue;
                    }
                };

                let payload = match window.to_split_json() {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(dataset = %dataset, error = %e, "failed to serialize dataset, skipping");
                        continue;
                    }
                };

                jobs.push(EvaluationJob::new(dataset.as_str(), payload, individual));
                owners.push(owner);
            }
        }

        (jobs, owners)
    }
}

impl<P, D> Evaluator for DistributedEvaluator<P, D>
where
    P: DatasetProvider,
    D: TaskDispatcher,
{
    fn evaluate(&self, population: &[Individual], datasets: &[String]) -> Result<Vec<f64>> {
        let (jobs, owners) = self.build_jobs(population, datasets);
        if jobs.is_empty() {
            warn!(
                individuals = population.len(),
                datasets = datasets.len(),
                "no evaluation jobs could be built, every individual scores 0"
            );
            return Ok(vec![0.0; population.len()]);
        }

        let submitted = jobs.len();
        let results = self.dispatcher.submit_batch(jobs)?.await_all(self.batch_timeout);
        if results.len() != submitted {
            warn!(
                submitted,
                returned = results.len(),
                "dispatcher returned a different number of results"
            );
        }

        let mut tallies = vec![Tally::default(); population.len()];
        let mut failed = 0usize;
        let mut below_floor = 0usize;

        for (position, (&owner, result)) in owners.iter().zip(results).enumerate() {
            let individual = &population[owner];
            match result {
                TrainerResult::Success {
                    accuracy,
                    wins,
                    losses,
                } => {
                    if !accuracy.is_finite() {
                        warn!(position, accuracy, "non-finite accuracy, result ignored");
                        failed += 1;
                    } else if self.trade_floor.accepts(individual, wins, losses) {
                        tallies[owner].total += accuracy;
                        tallies[owner].counted += 1;
                    } else {
                        debug!(
                            position,
                            trades = wins.saturating_add(losses),
                            floor = self.trade_floor.minimum_trades(individual),
                            "too few trades, result ignored"
                        );
                        below_floor += 1;
                    }
                }
                TrainerResult::Failure(reason) => {
                    warn!(position, individual = %individual, reason = %reason, "evaluation job failed");
                    failed += 1;
                }
            }
        }

        info!(jobs = submitted, failed, below_floor, "batch evaluated");

        Ok(tallies.iter().map(Tally::mean).collect())
    }
}
