//! Wiring and lifecycle of a single pipeline run.
//!
//! ```text
//! generate ─► intake ─┬─► worker 0 ─► output 0 ─► coordinator 0 ─┐
//!                     ├─► worker 1 ─► output 1 ─► coordinator 1 ─┼─► results ─► collect ─► verify
//!                     └─► worker N ─► output N ─► coordinator N ─┘
//! ```
//!
//! The generation window is the only cancellation source and reaches the
//! generator alone. Every other stage stops because its upstream channel
//! closed, so shutdown cascades down the pipeline in dependency order.

use crate::{
    Error, Item, Observer, PipelineConfig, Report, Result, Tallied, WorkerCounts, collect, generate,
    generator::cancel_after, merge, pool::WorkerPool,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Capacity of the intake channel. One slot is the closest tokio gets to an
/// unbuffered handoff.
pub const INTAKE_CAPACITY: usize = 1;

/// A validated pipeline configuration, ready to run.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the pipeline and verifies the result.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if verification fails, or
    /// [`Error::TaskFailed`] if a stage panicked.
    pub async fn run(&self) -> Result<Report> {
        let report = self.execute().await?;
        report.verify()?;
        Ok(report)
    }

    /// Runs the pipeline to completion without verifying the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailed`] if a stage panicked.
    pub async fn execute(&self) -> Result<Report> {
        let (report, _, _) = self.execute_observed(|_: Item| {}, |_: Item| {}).await?;
        Ok(report)
    }

    /// Runs the pipeline with caller-supplied observers on both ends.
    ///
    /// `on_generated` sees every item the generator published, in order;
    /// `on_collected` sees every item the collector received, in arrival
    /// order. Both are handed back alongside the unverified [`Report`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailed`] if a stage panicked.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(workers = self.config.num_workers))
    )]
    pub async fn execute_observed<G, C>(
        &self,
        on_generated: G,
        on_collected: C,
    ) -> Result<(Report, G, C)>
    where
        G: Observer + Send + 'static,
        C: Observer,
    {
        let PipelineConfig {
            timeout,
            num_workers,
            delay,
        } = self.config;

        let start = Instant::now();
        let cancel = CancellationToken::new();
        // Stops the generator if we bail out before the window elapses.
        let _guard = cancel.clone().drop_guard();

        let (intake_tx, intake_rx) = mpsc::channel(INTAKE_CAPACITY);
        let (pool, outputs) = WorkerPool::spawn(num_workers, intake_rx, delay);
        let (results, merger) = merge(outputs);

        let generator = tokio::spawn(generate(
            cancel.clone(),
            intake_tx,
            Tallied::new(on_generated),
        ));
        tokio::spawn(cancel_after(cancel, timeout));

        let collected = collect(results, Tallied::new(on_collected)).await;
        let elapsed = start.elapsed();

        let generated = generator.await.map_err(|e| Error::task("generator", e))?;
        let workers = pool.join().await?;
        let forwarded = merger.join().await?;

        let (generated, on_generated) = generated.into_parts();
        let (collected, on_collected) = collected.into_parts();

        let report = Report {
            generated,
            collected,
            workers,
            forwarded: WorkerCounts::from(forwarded),
            elapsed,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Run finished in {:?}: generated {} collected {}",
            report.elapsed,
            report.generated.count,
            report.collected.count
        );

        Ok((report, on_generated, on_collected))
    }
}
