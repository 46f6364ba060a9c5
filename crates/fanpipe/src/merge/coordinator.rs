use crate::Item;
use tokio::sync::mpsc;

/// Drains one worker's output into the shared result channel.
///
/// Every item is forwarded as soon as it arrives, so a coordinator never
/// holds more than one item. Returns the number of items forwarded once the
/// worker output is closed and empty; returning is the coordinator's
/// completion signal to the completion watcher.
///
/// # Arguments
///
/// - `_worker_id`: Index of the worker whose output this coordinator owns.
/// - `output`: Receiving half of that worker's output channel.
/// - `results`: A clone of the result sender. It is dropped on return and is
///   never used to close the result channel.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(output, results)))]
pub async fn forward(
    _worker_id: usize,
    mut output: mpsc::Receiver<Item>,
    results: mpsc::Sender<Item>,
) -> u64 {
    let mut forwarded = 0;

    while let Some(item) = output.recv().await {
        if let Err(_e) = results.send(item).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Coordinator {_worker_id} lost the result channel: {_e}");
            break;
        }
        forwarded += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Coordinator {_worker_id} done after {forwarded} items");

    forwarded
}
