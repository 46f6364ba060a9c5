//! Fan-out stage.
//!
//! A fixed number of worker tasks share one intake channel. Each worker
//! forwards every item it takes, after a fixed delay, onto its own output
//! channel and counts what it processed.
//!
//! ## Structure
//!
//! - [`intake`] - The shared receiving half of the intake channel.
//! - [`worker`] - The per-worker processing loop.
//! - [`manager`] - Spawning and joining the pool.

pub mod intake;
pub mod manager;
pub mod worker;

pub use intake::Intake;
pub use manager::WorkerPool;
