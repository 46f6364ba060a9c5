//! Post-run verification.
//!
//! Runs once, after the collector has returned. By then the result channel is
//! closed, so every coordinator, every worker and the generator have finished
//! and every tally is final.

use crate::{Error, Report, Result};

/// Checks that nothing was lost, duplicated or altered in transit.
///
/// Checks, in order:
///
/// 1. generated sum == collected sum
/// 2. generated count == collected count
/// 3. sum of per-worker counts == generated count
/// 4. there is one coordinator count per worker
/// 5. each coordinator forwarded exactly what its worker processed
///
/// # Errors
///
/// Returns the first failed check as [`Error::SumMismatch`],
/// [`Error::CountMismatch`], [`Error::DistributionMismatch`],
/// [`Error::CoordinatorCountMismatch`] or [`Error::MergeMismatch`]. All of
/// them indicate a broken pipeline and are not recoverable.
pub fn verify(report: &Report) -> Result<()> {
    let result = check(report);

    #[cfg(feature = "tracing")]
    {
        match &result {
            Ok(()) => tracing::info!(
                "Verified {} items across {} workers",
                report.generated.count,
                report.workers.len()
            ),
            Err(e) => tracing::error!("Verification failed: {e}"),
        }
    }

    result
}

fn check(report: &Report) -> Result<()> {
    let Report {
        generated,
        collected,
        workers,
        forwarded,
        ..
    } = report;

    if generated.sum != collected.sum {
        return Err(Error::SumMismatch {
            generated: generated.sum,
            collected: collected.sum,
        });
    }

    if generated.count != collected.count {
        return Err(Error::CountMismatch {
            generated: generated.count,
            collected: collected.count,
        });
    }

    let total = workers.total();
    if total != generated.count {
        return Err(Error::DistributionMismatch {
            total,
            generated: generated.count,
        });
    }

    if forwarded.len() != workers.len() {
        return Err(Error::CoordinatorCountMismatch {
            workers: workers.len(),
            coordinators: forwarded.len(),
        });
    }

    let pairs = workers.as_slice().iter().zip(forwarded.as_slice());
    for (worker, (&processed, &merged)) in pairs.enumerate() {
        if processed != merged {
            return Err(Error::MergeMismatch {
                worker,
                processed,
                forwarded: merged,
            });
        }
    }

    Ok(())
}
