//! Spawning and joining the fan-out worker pool.
//!
//! This module defines the [`WorkerPool`] struct, which owns the join handles
//! of a fixed set of workers spawned by [`WorkerPool::spawn`]. Work is not
//! routed: every worker pulls from the same [`Intake`], so an item goes to
//! whichever worker is ready to receive it.
//!
//! Each worker writes to its own bounded [`mpsc::Sender`]. The matching
//! receivers are returned to the caller, who is expected to hand them to the
//! merge stage.

use crate::{Error, Item, Result, WorkerCounts, pool::Intake, pool::worker::worker_loop};
use core::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};

/// Capacity of each worker output channel. One slot is the closest tokio gets
/// to an unbuffered handoff.
pub const OUTPUT_CAPACITY: usize = 1;

/// Handles of a running pool of fan-out workers.
pub struct WorkerPool {
    workers: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Spawns `num_workers` workers sharing `intake`.
    ///
    /// Returns the pool together with one output receiver per worker, in
    /// worker-id order.
    pub fn spawn(
        num_workers: usize,
        intake: mpsc::Receiver<Item>,
        delay: Duration,
    ) -> (Self, Vec<mpsc::Receiver<Item>>) {
        let intake = Intake::new(intake);
        let mut workers = Vec::with_capacity(num_workers);
        let mut outputs = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let (tx, rx) = mpsc::channel(OUTPUT_CAPACITY);
            outputs.push(rx);
            workers.push(tokio::spawn(worker_loop(
                worker_id,
                intake.clone(),
                tx,
                delay,
            )));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Spawned {num_workers} workers with a {delay:?} delay");

        (Self { workers }, outputs)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Waits for every worker to finish and returns their processed counts.
    ///
    /// Workers only finish once the intake is closed and drained, so this
    /// must not be awaited before the generator has been cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailed`] if any worker panicked or was aborted.
    pub async fn join(self) -> Result<WorkerCounts> {
        let results = futures::future::join_all(self.workers).await;

        let mut counts = Vec::with_capacity(results.len());
        for (_worker_id, result) in results.into_iter().enumerate() {
            match result {
                Ok(processed) => counts.push(processed),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Worker {_worker_id} failed: {e}");
                    return Err(Error::task("worker", e));
                }
            }
        }

        Ok(WorkerCounts::new(counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tally;

    async fn drain(outputs: Vec<mpsc::Receiver<Item>>) -> Vec<Tally> {
        let drains: Vec<_> = outputs
            .into_iter()
            .map(|mut rx| {
                tokio::spawn(async move {
                    let mut tally = Tally::new();
                    while let Some(item) = rx.recv().await {
                        tally.record(item);
                    }
                    tally
                })
            })
            .collect();

        futures::future::join_all(drains)
            .await
            .into_iter()
            .map(|drained| drained.unwrap())
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn counts_match_what_each_output_carried() {
        const TOTAL: Item = 2_000;

        let (tx, rx) = mpsc::channel(1);
        let (pool, outputs) = WorkerPool::spawn(5, rx, Duration::ZERO);
        assert_eq!(pool.len(), 5);
        assert_eq!(outputs.len(), 5);

        let drained = tokio::spawn(drain(outputs));
        for item in 1..=TOTAL {
            tx.send(item).await.unwrap();
        }
        drop(tx);

        let per_output = drained.await.unwrap();
        let counts = pool.join().await.unwrap();

        assert_eq!(counts.total(), TOTAL as u64);
        for (count, tally) in counts.as_slice().iter().zip(&per_output) {
            assert_eq!(*count, tally.count);
        }
        let sum: i64 = per_output.iter().map(|t| t.sum).sum();
        assert_eq!(sum, TOTAL * (TOTAL + 1) / 2);
    }

    #[tokio::test]
    async fn single_worker_takes_everything() {
        let (tx, rx) = mpsc::channel(1);
        let (pool, outputs) = WorkerPool::spawn(1, rx, Duration::ZERO);

        let drained = tokio::spawn(drain(outputs));
        for item in 1..=100 {
            tx.send(item).await.unwrap();
        }
        drop(tx);

        drained.await.unwrap();
        let counts = pool.join().await.unwrap();
        assert_eq!(counts.as_slice(), &[100]);
    }

    #[tokio::test]
    async fn join_reports_aborted_worker() {
        let (tx, rx) = mpsc::channel(1);
        let (pool, _outputs) = WorkerPool::spawn(2, rx, Duration::ZERO);
        pool.workers[1].abort();
        drop(tx);

        let err = pool.join().await.unwrap_err();
        assert!(matches!(
            err,
            Error::TaskFailed {
                stage: "worker",
                ..
            }
        ));
    }
}
