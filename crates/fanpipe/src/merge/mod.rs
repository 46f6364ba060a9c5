//! Fan-in stage.
//!
//! Worker outputs become ready at independent, unpredictable times, so they
//! are drained concurrently: one merge coordinator per output, each forwarding
//! straight into the shared result channel. Draining the outputs one after
//! another would park the merge on a slow worker while a faster one blocks on
//! its full output.
//!
//! Closing the result channel is a two-phase affair. Coordinators signal
//! completion by returning; a separate completion watcher waits for all of
//! them and only then closes the channel. See [`watcher::watch`].
//!
//! ## Structure
//!
//! - [`coordinator`] - The per-worker drain loop.
//! - [`watcher`] - The completion watcher that owns the close.

pub mod coordinator;
pub mod watcher;

use crate::{Error, Item, Result};
use coordinator::forward;
use tokio::{sync::mpsc, task::JoinHandle};
use watcher::watch;

/// Handle to a running fan-in stage.
pub struct MergeHandle {
    watcher: JoinHandle<Result<Vec<u64>>>,
}

impl MergeHandle {
    /// Waits for the completion watcher and returns the number of items each
    /// coordinator forwarded, in worker-id order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailed`] if a coordinator or the watcher itself
    /// panicked or was aborted.
    pub async fn join(self) -> Result<Vec<u64>> {
        self.watcher
            .await
            .map_err(|e| Error::task("completion watcher", e))?
    }
}

/// Merges every worker output into one result channel.
///
/// Spawns one coordinator per output plus the completion watcher, and returns
/// the receiving half of the result channel. The result channel is buffered
/// with one slot per output so every coordinator can hand off an item without
/// waiting on the others.
pub fn merge(outputs: Vec<mpsc::Receiver<Item>>) -> (mpsc::Receiver<Item>, MergeHandle) {
    let (results_tx, results_rx) = mpsc::channel(outputs.len().max(1));

    let coordinators = outputs
        .into_iter()
        .enumerate()
        .map(|(worker_id, output)| tokio::spawn(forward(worker_id, output, results_tx.clone())))
        .collect();

    let watcher = tokio::spawn(watch(coordinators, results_tx));

    (results_rx, MergeHandle { watcher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn later_output_is_merged_while_earlier_is_still_open() {
        let (first_tx, first_rx) = mpsc::channel(1);
        let (second_tx, second_rx) = mpsc::channel(1);
        let (mut results, handle) = merge(vec![first_rx, second_rx]);

        // The first worker is still busy; the second must not wait on it.
        for item in [10, 11, 12] {
            second_tx.send(item).await.unwrap();
            let merged = timeout(Duration::from_secs(5), results.recv())
                .await
                .expect("merge stalled behind an open output");
            assert_eq!(merged, Some(item));
        }

        first_tx.send(1).await.unwrap();
        assert_eq!(results.recv().await, Some(1));

        drop(second_tx);
        drop(first_tx);
        assert_eq!(results.recv().await, None);
        assert_eq!(handle.join().await.unwrap(), vec![1, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn merges_every_item_of_every_output_exactly_once() {
        const OUTPUTS: usize = 6;
        const PER_OUTPUT: Item = 500;

        let mut senders = Vec::with_capacity(OUTPUTS);
        let mut receivers = Vec::with_capacity(OUTPUTS);
        for _ in 0..OUTPUTS {
            let (tx, rx) = mpsc::channel(1);
            senders.push(tx);
            receivers.push(rx);
        }
        let (mut results, handle) = merge(receivers);

        let producers: Vec<_> = senders
            .into_iter()
            .enumerate()
            .map(|(idx, tx)| {
                tokio::spawn(async move {
                    let base = idx as Item * PER_OUTPUT;
                    for item in 1..=PER_OUTPUT {
                        tx.send(base + item).await.unwrap();
                    }
                })
            })
            .collect();

        let mut merged = Vec::new();
        while let Some(item) = results.recv().await {
            merged.push(item);
        }
        for producer in producers {
            producer.await.unwrap();
        }

        merged.sort_unstable();
        let expected: Vec<Item> = (1..=OUTPUTS as Item * PER_OUTPUT).collect();
        assert_eq!(merged, expected);
        assert_eq!(
            handle.join().await.unwrap(),
            vec![PER_OUTPUT as u64; OUTPUTS]
        );
    }

    #[tokio::test]
    async fn preserves_per_output_order() {
        let (tx, rx) = mpsc::channel(1);
        let (other_tx, other_rx) = mpsc::channel(1);
        let (mut results, handle) = merge(vec![rx, other_rx]);

        let producer = tokio::spawn(async move {
            for item in 1..=50 {
                tx.send(item).await.unwrap();
                other_tx.send(1_000 + item).await.unwrap();
            }
        });

        let mut first = Vec::new();
        let mut second = Vec::new();
        while let Some(item) = results.recv().await {
            if item >= 1_000 {
                second.push(item);
            } else {
                first.push(item);
            }
        }
        producer.await.unwrap();
        handle.join().await.unwrap();

        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert!(second.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(first.len(), 50);
        assert_eq!(second.len(), 50);
    }

    #[tokio::test]
    async fn no_outputs_closes_immediately() {
        let (mut results, handle) = merge(Vec::new());
        assert_eq!(results.recv().await, None);
        assert!(handle.join().await.unwrap().is_empty());
    }
}
