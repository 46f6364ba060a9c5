use crate::{Error, Item, Result};
use tokio::{sync::mpsc, task::JoinHandle};

/// Closes the result channel once every merge coordinator has finished.
///
/// The watcher owns the original result sender; coordinators only hold
/// clones, which they drop when they return. Dropping the watcher's sender
/// after the join is therefore the last drop, and the only close, of the
/// result channel. No coordinator can still be sending at that point.
///
/// Returns each coordinator's forwarded count, in worker-id order.
///
/// # Errors
///
/// Returns [`Error::TaskFailed`] if a coordinator panicked or was aborted. The
/// result channel is closed either way.
pub async fn watch(
    coordinators: Vec<JoinHandle<u64>>,
    results: mpsc::Sender<Item>,
) -> Result<Vec<u64>> {
    let joined = futures::future::join_all(coordinators).await;

    drop(results);
    #[cfg(feature = "tracing")]
    tracing::debug!(
        "All {} coordinators done, result channel closed",
        joined.len()
    );

    joined
        .into_iter()
        .map(|result| result.map_err(|e| Error::task("merge coordinator", e)))
        .collect()
}
