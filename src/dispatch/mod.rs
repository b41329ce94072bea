//! # Dispatch
//!
//! The fabric that runs trainer jobs. The evaluator submits every job of a
//! generation as one batch through a [`TaskDispatcher`] and blocks on the
//! returned [`BatchHandle`] until all jobs have reported or the deadline passes.
//!
//! Workers report `(position, result)` pairs through a [`BatchSender`]. The
//! handle slots each result by its submission position, so
//! [`BatchHandle::await_all`] returns results in submission order no matter in
//! which order the workers finish. Jobs that never report become
//! [`TrainerResult::Failure`]. Once the handle stops waiting the batch is
//! cancelled, and workers skip jobs of it they have not started yet.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use tradega::dispatch::{batch_channel, TrainerResult};
//!
//! let (sender, handle) = batch_channel(3);
//! sender.complete(2, TrainerResult::success(0.7, 4, 1));
//! sender.complete(0, TrainerResult::success(0.5, 3, 0));
//! // job 1 never reports
//!
//! let results = handle.await_all(Some(Duration::from_millis(10)));
//! assert_eq!(results[0], TrainerResult::success(0.5, 3, 0));
//! assert!(!results[1].is_success());
//! assert_eq!(results[2], TrainerResult::success(0.7, 4, 1));
//! ```
pub mod command;
pub mod local;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::individual::Individual;

pub use command::CommandTrainer;
pub use local::LocalDispatcher;

/// One trainer invocation: an individual's parameters against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationJob {
    /// Identifier of the dataset the window was read from.
    pub dataset: String,
    /// The price window as split-oriented JSON.
    pub data: String,
    /// Numeric genes of the individual, in gene order.
    pub genes: Vec<i64>,
    /// Allowed trading hours, ascending.
    pub allowed_hours: Vec<u8>,
}

impl EvaluationJob {
    pub fn new(dataset: impl Into<String>, data: String, individual: &Individual) -> Self {
        Self {
            dataset: dataset.into(),
            data,
            genes: individual.genes().to_vec(),
            allowed_hours: individual.allowed_hours().iter().copied().collect(),
        }
    }
}

/// Outcome of a single trainer job.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainerResult {
    /// The trainer produced an accuracy and a trade count.
    Success { accuracy: f64, wins: u64, losses: u64 },
    /// The job failed, timed out or returned something unusable.
    Failure(String),
}

impl TrainerResult {
    pub fn success(accuracy: f64, wins: u64, losses: u64) -> Self {
        Self::Success {
            accuracy,
            wins,
            losses,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(reason.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Something that turns one job into one result. Implemented for closures.
pub trait Trainer: Send + Sync {
    fn train(&self, job: &EvaluationJob) -> TrainerResult;
}

impl<F> Trainer for F
where
    F: Fn(&EvaluationJob) -> TrainerResult + Send + Sync,
{
    fn train(&self, job: &EvaluationJob) -> TrainerResult {
        self(job)
    }
}

/// A queue that runs a batch of independent jobs.
pub trait TaskDispatcher: Send + Sync {
    /// Enqueues every job and returns a handle to wait on.
    ///
    /// # Errors
    ///
    /// Returns a `Dispatch` error if the batch cannot be accepted at all.
    fn submit_batch(&self, jobs: Vec<EvaluationJob>) -> Result<BatchHandle>;
}

/// Creates a connected sender/handle pair for a batch of `len` jobs.
pub fn batch_channel(len: usize) -> (BatchSender, BatchHandle) {
    let (sender, receiver) = mpsc::channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    (
        BatchSender {
            sender,
            cancelled: Arc::clone(&cancelled),
        },
        BatchHandle {
            receiver,
            len,
            cancelled,
        },
    )
}

/// Worker side of a batch.
#[derive(Debug, Clone)]
pub struct BatchSender {
    sender: Sender<(usize, TrainerResult)>,
    cancelled: Arc<AtomicBool>,
}

impl BatchSender {
    /// Reports the result of the job submitted at `position`.
    ///
    /// Reports after the handle gave up waiting are dropped.
    pub fn complete(&self, position: usize, result: TrainerResult) {
        let _ = self.sender.send((position, result));
    }

    /// True once the handle has stopped waiting for this batch.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Waiting side of a batch.
#[derive(Debug)]
pub struct BatchHandle {
    receiver: Receiver<(usize, TrainerResult)>,
    len: usize,
    cancelled: Arc<AtomicBool>,
}

impl BatchHandle {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Blocks until every job reported, all senders are gone, or `timeout`
    /// elapsed. `None` waits without bound.
    ///
    /// Returns one result per submitted job, in submission order. The batch is
    /// cancelled when this returns.
    pub fn await_all(self, timeout: Option<Duration>) -> Vec<TrainerResult> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut slots: Vec<Option<TrainerResult>> = (0..self.len).map(|_| None).collect();
        let mut pending = self.len;

        while pending > 0 {
            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    match self.receiver.recv_timeout(remaining) {
                        Ok(message) => Some(message),
                        Err(RecvTimeoutError::Timeout) => {
                            warn!(pending, "batch deadline reached, treating unfinished jobs as failed");
                            break;
                        }
                        Err(RecvTimeoutError::Disconnected) => None,
                    }
                }
                None => self.receiver.recv().ok(),
            };

            let Some((position, result)) = received else {
                warn!(pending, "dispatcher dropped the batch before every job reported");
                break;
            };

            match slots.get_mut(position) {
                Some(slot) if slot.is_none() => {
                    *slot = Some(result);
                    pending -= 1;
                }
                Some(_) => warn!(position, "duplicate result ignored"),
                None => warn!(position, "result for unknown job ignored"),
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| TrainerResult::failure("timed out")))
            .collect()
    }
}

impl Drop for BatchHandle {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
