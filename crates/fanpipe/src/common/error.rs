//! Error types for the fan-out/fan-in pipeline.
//!
//! This module defines the central `Error` enum. Nothing in the pipeline is
//! expected to fail under correct construction, so every variant describes
//! either a rejected configuration or a broken invariant. None of them are
//! retryable.
//!
//! ## Error Cases
//! - `SumMismatch`: The generated and collected sums differ.
//! - `CountMismatch`: The generated and collected item counts differ.
//! - `DistributionMismatch`: Per-worker counts don't add up to the generated
//!   count.
//! - `CoordinatorCountMismatch`: The merge stage reported a different number
//!   of coordinators than there are workers.
//! - `MergeMismatch`: A merge coordinator forwarded a different number of items
//!   than its worker processed.
//! - `InvalidConfig`: The pipeline configuration was rejected.
//! - `TaskFailed`: A pipeline task panicked or was aborted.

use tokio::task::JoinError;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for a pipeline run.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Items were lost, duplicated or altered between generation and
    /// collection.
    #[error("sums differ: generated {generated} != collected {collected}")]
    SumMismatch { generated: i64, collected: i64 },

    /// Items were lost or duplicated between generation and collection.
    #[error("counts differ: generated {generated} != collected {collected}")]
    CountMismatch { generated: u64, collected: u64 },

    /// The fan-out double-counted or dropped items.
    #[error("per-worker counts sum to {total}, expected {generated}")]
    DistributionMismatch { total: u64, generated: u64 },

    /// The merge stage didn't run exactly one coordinator per worker.
    #[error("{workers} workers but {coordinators} merge coordinators")]
    CoordinatorCountMismatch { workers: usize, coordinators: usize },

    /// A merge coordinator dropped or duplicated items of its worker.
    #[error("worker {worker} processed {processed} items but {forwarded} were merged")]
    MergeMismatch {
        worker: usize,
        processed: u64,
        forwarded: u64,
    },

    /// The configuration can't drive a run.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// A pipeline task panicked or was cancelled before returning.
    #[error("{stage} task failed: {reason}")]
    TaskFailed { stage: &'static str, reason: String },
}

impl Error {
    pub(crate) fn task(stage: &'static str, err: JoinError) -> Self {
        Self::TaskFailed {
            stage,
            reason: err.to_string(),
        }
    }

    /// Returns `true` for the variants raised by the post-run verification.
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::SumMismatch { .. }
                | Self::CountMismatch { .. }
                | Self::DistributionMismatch { .. }
                | Self::CoordinatorCountMismatch { .. }
                | Self::MergeMismatch { .. }
        )
    }
}
