use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use super::{batch_channel, BatchHandle, EvaluationJob, TaskDispatcher, Trainer, TrainerResult};
use crate::error::{Result, SearchError};

/// Runs trainer jobs on a dedicated rayon thread pool.
///
/// Every job of a batch is spawned onto the pool at once, so up to `workers`
/// jobs run in parallel. A trainer that panics produces a `Failure` for its
/// job instead of taking the pool down. Jobs still queued when their batch is
/// cancelled are dropped without running the trainer.
pub struct LocalDispatcher<T: Trainer + 'static> {
    trainer: Arc<T>,
    pool: ThreadPool,
}

impl<T: Trainer + 'static> LocalDispatcher<T> {
    /// Creates a dispatcher with `workers` threads; zero means one per CPU.
    pub fn new(trainer: T, workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("tradega-worker-{}", i))
            .build()
            .map_err(|e| SearchError::Dispatch(format!("failed to start worker pool: {}", e)))?;

        Ok(Self {
            trainer: Arc::new(trainer),
            pool,
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn trainer(&self) -> &T {
        &self.trainer
    }
}

impl<T: Trainer + 'static> fmt::Debug for LocalDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalDispatcher")
            .field("workers", &self.workers())
            .finish()
    }
}

impl<T: Trainer + 'static> TaskDispatcher for LocalDispatcher<T> {
    fn submit_batch(&self, jobs: Vec<EvaluationJob>) -> Result<BatchHandle> {
        let (sender, handle) = batch_channel(jobs.len());
        debug!(jobs = jobs.len(), workers = self.workers(), "submitting batch");

        for (position, job) in jobs.into_iter().enumerate() {
            let trainer = Arc::clone(&self.trainer);
            let sender = sender.clone();

            self.pool.spawn(move || {
                if sender.is_cancelled() {
                    debug!(position, "batch cancelled, job skipped");
                    return;
                }
                let result = panic::catch_unwind(AssertUnwindSafe(|| trainer.train(&job)))
                    .unwrap_or_else(|payload| {
                        TrainerResult::failure(format!("trainer panicked: {}", panic_message(&*payload)))
                    });
                sender.complete(position, result);
            });
        }

        Ok(handle)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Individual;
    use std::time::Duration;

    fn jobs(count: i64) -> Vec<EvaluationJob> {
        (0..count)
            .map(|i| {
                let individual = Individual::new(vec![i], [3]).unwrap();
                EvaluationJob::new("EURUSD60.csv", "{}".to_string(), &individual)
            })
            .collect()
    }

    #[test]
    fn test_local_dispatcher_preserves_order() {
        // Later jobs finish first
        let trainer = |job: &EvaluationJob| {
            std::thread::sleep(Duration::from_millis(2 * (10 - job.genes[0]) as u64));
            TrainerResult::success(job.genes[0] as f64 / 10.0, 1, 0)
        };
        let dispatcher = LocalDispatcher::new(trainer, 4).unwrap();

        let results = dispatcher.submit_batch(jobs(10)).unwrap().await_all(None);

        let expected: Vec<TrainerResult> = (0..10)
            .map(|i| TrainerResult::success(i as f64 / 10.0, 1, 0))
            .collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_local_dispatcher_contains_panics() {
        let trainer = |job: &EvaluationJob| {
            if job.genes[0] == 1 {
                panic!("model diverged");
            }
            TrainerResult::success(0.5, 1, 1)
        };
        let dispatcher = LocalDispatcher::new(trainer, 2).unwrap();

        let results = dispatcher.submit_batch(jobs(3)).unwrap().await_all(None);

        assert!(results[0].is_success());
        assert_eq!(
            results[1],
            TrainerResult::failure("trainer panicked: model diverged")
        );
        assert!(results[2].is_success());
    }

    #[test]
    fn test_next_batch_is_not_stuck_behind_a_timed_out_one() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let trainer = move |job: &EvaluationJob| {
            counter.fetch_add(1, Ordering::SeqCst);
            if job.genes[0] == 0 {
                std::thread::sleep(Duration::from_millis(300));
            }
            TrainerResult::success(0.5, 1, 1)
        };
        let dispatcher = LocalDispatcher::new(trainer, 1).unwrap();

        // The single worker is busy with job 0 when the deadline passes
        let first = dispatcher
            .submit_batch(jobs(4))
            .unwrap()
            .await_all(Some(Duration::from_millis(50)));
        assert!(first.iter().all(|r| !r.is_success()));

        let second = dispatcher
            .submit_batch(vec![jobs(2).remove(1)])
            .unwrap()
            .await_all(Some(Duration::from_secs(2)));

        assert_eq!(second, vec![TrainerResult::success(0.5, 1, 1)]);
        // Jobs 1..4 of the first batch never reached the trainer
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_local_dispatcher_timeout() {
        let trainer = |job: &EvaluationJob| {
            if job.genes[0] == 0 {
                std::thread::sleep(Duration::from_millis(500));
            }
            TrainerResult::success(0.5, 1, 1)
        };
        let dispatcher = LocalDispatcher::new(trainer, 2).unwrap();

        let results = dispatcher
            .submit_batch(jobs(2))
            .unwrap()
            .await_all(Some(Duration::from_millis(100)));

        assert_eq!(results[0], TrainerResult::failure("timed out"));
        assert!(results[1].is_success());
    }
}
