//! Fixed-size worker pool that drains one batch and aggregates failures.

use std::any::Any;
use std::iter::Enumerate;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;
use std::vec;

use tracing::{debug, info, warn};

use crate::config::RunnerConfig;
use crate::error::{AggregateError, JobFailure};
use crate::types::{Job, JobBatch};

type WorkQueue<'a> = Mutex<Enumerate<vec::IntoIter<Job<'a>>>>;
type Outcome = (usize, anyhow::Result<()>);

/// Bounded concurrent job runner.
///
/// Each `run` spawns `workers` scoped threads that pull jobs from a queue
/// owned by that call, so nothing is shared between batches. The call
/// returns only after every job has reported an outcome. A failing job
/// never stops its siblings and nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct ConcurrentJobRunner {
    config: RunnerConfig,
}

impl ConcurrentJobRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Runner with the default config and the given pool size.
    pub fn with_workers(workers: usize) -> Self {
        Self::new(RunnerConfig::default().with_workers(workers))
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Concurrency ceiling.
    pub fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Run `jobs` under `description`.
    pub fn run<'a>(&self, description: &str, jobs: Vec<Job<'a>>) -> Result<(), AggregateError> {
        self.run_batch(JobBatch::from_jobs(description, jobs))
    }

    /// Run every job of `batch`, at most `workers` at a time.
    pub fn run_batch(&self, batch: JobBatch<'_>) -> Result<(), AggregateError> {
        let JobBatch {
            id,
            description,
            jobs,
        } = batch;
        let total = jobs.len();

        if total == 0 {
            debug!(runner = %self.config.name, batch_id = %id, %description, "empty batch");
            return Ok(());
        }

        let workers = self.workers();
        let started = Instant::now();
        debug!(
            runner = %self.config.name,
            batch_id = %id,
            %description,
            total,
            workers,
            "running job batch"
        );

        let queue: WorkQueue<'_> = Mutex::new(jobs.into_iter().enumerate());
        let (results_tx, results_rx) = mpsc::channel::<Outcome>();
        let mut failures = Vec::new();

        thread::scope(|scope| {
            let mut spawned = 0usize;
            let mut spawn_error = None;

            for worker in 0..workers {
                let queue = &queue;
                let results = results_tx.clone();
                let spawn = thread::Builder::new()
                    .name(format!("{}-{worker}", self.config.name))
                    .spawn_scoped(scope, move || work(queue, results));
                match spawn {
                    Ok(_) => spawned += 1,
                    Err(e) => {
                        warn!(
                            runner = %self.config.name,
                            batch_id = %id,
                            spawned,
                            error = %e,
                            "failed to spawn job worker"
                        );
                        spawn_error = Some(e);
                        break;
                    }
                }
            }
            // Workers hold the only remaining senders.
            drop(results_tx);

            if spawned == 0 {
                let reason = spawn_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no workers".to_string());
                let mut remaining = queue.lock().unwrap_or_else(PoisonError::into_inner);
                for (index, _job) in &mut *remaining {
                    let error = anyhow::anyhow!("job worker unavailable: {reason}");
                    failures.push(JobFailure::new(index, &description, error));
                }
                return;
            }

            for _ in 0..total {
                let Ok((index, outcome)) = results_rx.recv() else {
                    break;
                };
                if let Err(error) = outcome {
                    debug!(
                        runner = %self.config.name,
                        batch_id = %id,
                        job = index,
                        error = %format!("{error:#}"),
                        "job failed"
                    );
                    failures.push(JobFailure::new(index, &description, error));
                }
            }
        });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match AggregateError::from_failures(&description, total, failures) {
            None => {
                info!(
                    runner = %self.config.name,
                    batch_id = %id,
                    %description,
                    total,
                    elapsed_ms,
                    "job batch completed"
                );
                Ok(())
            }
            Some(err) => {
                warn!(
                    runner = %self.config.name,
                    batch_id = %id,
                    %description,
                    total,
                    failed = err.failed(),
                    elapsed_ms,
                    "job batch completed with failures"
                );
                Err(err)
            }
        }
    }
}

/// Worker loop: pull, execute, report, until the queue is drained.
fn work(queue: &WorkQueue<'_>, results: mpsc::Sender<Outcome>) {
    loop {
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next();
        let Some((index, job)) = next else {
            return;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(job))
            .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())));

        if results.send((index, outcome)).is_err() {
            return;
        }
    }
}

fn panic_error(payload: &(dyn Any + Send)) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow::anyhow!("job panicked: {message}")
}
