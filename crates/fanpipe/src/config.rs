use crate::{Error, Result};
use core::time::Duration;

/// How long the generator produces items before it is cancelled.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Number of worker tasks fanning out from the intake channel.
pub const DEFAULT_NUM_WORKERS: usize = 5;

/// Time each worker spends on an item before forwarding it.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1);

/// The three tunables of a pipeline run.
///
/// Values are checked by [`PipelineConfig::validate`] before a
/// [`Pipeline`](crate::Pipeline) accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Generation window. Must be greater than zero.
    pub timeout: Duration,
    /// Size of the worker pool. Must be at least one.
    pub num_workers: usize,
    /// Per-item processing delay. Zero disables the delay entirely.
    pub delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            num_workers: DEFAULT_NUM_WORKERS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Rejects configurations that can't produce a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if there are no workers or the
    /// generation window is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig {
                reason: "timeout must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
