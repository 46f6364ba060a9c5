use crate::{Item, Observer};
use tokio::sync::mpsc;

/// Drains the result channel to exhaustion, feeding every item to `observer`.
///
/// Returns once the channel is closed and empty, which can only happen after
/// the completion watcher has closed it. The observer is handed back so its
/// tally can be read.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub async fn collect<O: Observer>(mut results: mpsc::Receiver<Item>, mut observer: O) -> O {
    while let Some(item) = results.recv().await {
        observer.observe(item);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Result channel drained");

    observer
}
