use crate::{Item, pool::Intake};
use core::time::Duration;
use tokio::{sync::mpsc, time::sleep};

/// Worker task that moves items from the shared intake to its own output.
///
/// Each worker owns its processed counter for the whole run and hands it back
/// as its return value, so no other task ever reads or writes it while the
/// pipeline is running.
///
/// This function is designed to be spawned as a Tokio task and runs until the
/// intake is closed and drained.
///
/// # Arguments
///
/// - `_worker_id`: Index of this worker (used for logs/tracing).
/// - `intake`: Shared intake channel.
/// - `output`: Sender half of this worker's private output channel. Dropped
///   on return, which closes the output for its merge coordinator.
/// - `delay`: Time spent on each item before it is forwarded. A zero delay
///   skips the timer entirely.
///
/// # Behavior
///
/// - Items are forwarded unchanged, in the order they were taken.
/// - The counter is incremented only once an item has been handed to the
///   output, so it always equals the number of items forwarded.
/// - If the output's receiver is gone, the worker stops early. This can't
///   happen under correct construction and shows up as a verification
///   failure.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(intake, output, delay)))]
pub async fn worker_loop(
    _worker_id: usize,
    intake: Intake,
    output: mpsc::Sender<Item>,
    delay: Duration,
) -> u64 {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} started");

    let mut processed = 0;

    while let Some(item) = intake.recv().await {
        if !delay.is_zero() {
            sleep(delay).await;
        }

        if let Err(_e) = output.send(item).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Worker {_worker_id} failed to forward item: {_e}");
            break;
        }

        processed += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} stopped after {processed} items");

    processed
}
