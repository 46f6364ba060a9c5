use crate::{Tally, WorkerCounts};
use core::{fmt, time::Duration};

/// Snapshot of a finished pipeline run.
///
/// Produced by [`Pipeline::execute`](crate::Pipeline::execute) once every
/// stage has drained, and checked by [`verify`](crate::verify).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// What the generator published.
    pub generated: Tally,
    /// What the collector received.
    pub collected: Tally,
    /// Items processed by each worker.
    pub workers: WorkerCounts,
    /// Items forwarded by each merge coordinator, in worker-id order.
    pub forwarded: WorkerCounts,
    /// Wall-clock time from start to the end of collection.
    pub elapsed: Duration,
}

impl Report {
    /// Checks every pipeline invariant. See [`verify`](crate::verify).
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn verify(&self) -> crate::Result<()> {
        crate::verify(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Items: generated {} collected {}",
            self.generated.count, self.collected.count
        )?;
        writeln!(
            f,
            "Sum: generated {} collected {}",
            self.generated.sum, self.collected.sum
        )?;
        write!(f, "Per-worker: {}", self.workers)
    }
}
