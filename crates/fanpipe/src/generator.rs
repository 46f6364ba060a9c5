//! The head of the pipeline.
//!
//! [`generate`] publishes 1, 2, 3, … onto the intake channel until its
//! [`CancellationToken`] fires. It owns the only intake [`mpsc::Sender`], so
//! returning from it is the one and only close of the intake.

use crate::{Item, Observer};
use core::time::Duration;
use tokio::{sync::mpsc, time::sleep};
use tokio_util::sync::CancellationToken;

/// Produces consecutive items starting at 1 until `cancel` fires.
///
/// Every iteration races cancellation against publishing the next item;
/// whichever is ready first wins. A publish that loses the race never reaches
/// the channel, so the last item sent is always whole and already observed.
/// The observer is called after each successful send and before the next item
/// is produced, then handed back to the caller.
///
/// If every receiver has been dropped the send fails and generation stops as
/// if cancelled. The unsent item is not observed.
///
/// # Arguments
///
/// - `cancel`: The only cancellation source of the pipeline.
/// - `intake`: Sender half of the intake channel. Taken by value and dropped
///   on return, which closes the channel for the workers.
/// - `observer`: Receives each published item.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub async fn generate<O: Observer>(
    cancel: CancellationToken,
    intake: mpsc::Sender<Item>,
    mut observer: O,
) -> O {
    let mut next: Item = 1;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Generator cancelled after {} items", next - 1);
                break;
            }
            sent = intake.send(next) => {
                if sent.is_err() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Intake closed by consumers after {} items", next - 1);
                    break;
                }
                observer.observe(next);
                next += 1;
            }
        }
    }

    drop(intake);
    observer
}

/// Cancels `token` once `timeout` has elapsed.
///
/// Returns early without cancelling if the token was already cancelled by
/// someone else.
pub async fn cancel_after(token: CancellationToken, timeout: Duration) {
    tokio::select! {
        () = sleep(timeout) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Generation window of {:?} elapsed", timeout);
            token.cancel();
        }
        () = token.cancelled() => {}
    }
}
