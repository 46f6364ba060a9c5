use crate::Item;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Receiving half of the intake channel, shared by every worker.
///
/// tokio's [`mpsc::Receiver`] has a single consumer, so the workers take
/// turns on it through a fair (FIFO) async lock. The worker holding the lock
/// is the one parked on the channel; the rest queue behind it in arrival
/// order, so no worker can starve. Each item is therefore handed to exactly
/// one worker.
#[derive(Debug, Clone)]
pub struct Intake {
    rx: Arc<Mutex<mpsc::Receiver<Item>>>,
}

impl Intake {
    pub fn new(rx: mpsc::Receiver<Item>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Takes the next item, or `None` once the intake is closed and drained.
    ///
    /// Items still buffered when the sender is dropped are delivered before
    /// `None`.
    pub async fn recv(&self) -> Option<Item> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn delivers_buffered_items_before_end_of_stream() {
        let (tx, rx) = mpsc::channel(4);
        let intake = Intake::new(rx);
        for item in 1..=3 {
            tx.send(item).await.unwrap();
        }
        drop(tx);

        assert_eq!(intake.recv().await, Some(1));
        assert_eq!(intake.recv().await, Some(2));
        assert_eq!(intake.recv().await, Some(3));
        assert_eq!(intake.recv().await, None);
        assert_eq!(intake.recv().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn each_item_reaches_exactly_one_consumer() {
        const TOTAL: Item = 10_000;
        const CONSUMERS: usize = 8;

        let (tx, rx) = mpsc::channel(1);
        let intake = Intake::new(rx);

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let intake = intake.clone();
                tokio::spawn(async move {
                    let mut taken = Vec::new();
                    while let Some(item) = intake.recv().await {
                        taken.push(item);
                    }
                    taken
                })
            })
            .collect();
        drop(intake);

        for item in 1..=TOTAL {
            tx.send(item).await.unwrap();
        }
        drop(tx);

        let mut seen = HashSet::with_capacity(TOTAL as usize);
        for consumer in consumers {
            for item in consumer.await.unwrap() {
                assert!(seen.insert(item), "Duplicate item detected: {item}");
            }
        }
        assert_eq!(seen.len(), TOTAL as usize);
        assert!((1..=TOTAL).all(|item| seen.contains(&item)));
    }
}
