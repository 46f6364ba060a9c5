//! # Shared pipeline types
//!
//! - [`Item`] - The value flowing through every channel.
//! - [`Observer`] - Callback invoked with each item a stage publishes or
//!   receives.
//! - [`Tally`] - Count/sum accumulator owned by exactly one stage.
//! - [`Tallied`] - Wraps an observer and keeps a [`Tally`] alongside it.
//! - [`WorkerCounts`] - Per-worker processed counts, in worker-id order.

use core::fmt;

/// One generated integer. Its value equals its generation order (1, 2, 3, …).
pub type Item = i64;

/// Receives every item a stage handles, synchronously and in order.
///
/// An observer is moved into the task that drives it and handed back when the
/// task returns, so it never needs to be `Sync` or guarded by a lock.
pub trait Observer {
    fn observe(&mut self, item: Item);
}

impl<F> Observer for F
where
    F: FnMut(Item),
{
    fn observe(&mut self, item: Item) {
        self(item);
    }
}

impl Observer for Vec<Item> {
    fn observe(&mut self, item: Item) {
        self.push(item);
    }
}

/// Count and sum of the items seen by one stage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub count: u64,
    pub sum: i64,
}

impl Tally {
    pub const fn new() -> Self {
        Self { count: 0, sum: 0 }
    }

    pub const fn record(&mut self, item: Item) {
        self.count += 1;
        self.sum += item;
    }

    /// The sum `1 + 2 + … + count`, i.e. what [`Self::sum`] must equal when the
    /// recorded items are exactly the first `count` generated items.
    pub const fn series_sum(&self) -> i64 {
        let n = self.count as i64;
        n * (n + 1) / 2
    }
}

impl Observer for Tally {
    fn observe(&mut self, item: Item) {
        self.record(item);
    }
}

/// An observer paired with the [`Tally`] of everything it has seen.
#[derive(Debug, Default, Clone)]
pub struct Tallied<O> {
    tally: Tally,
    inner: O,
}

impl<O> Tallied<O> {
    pub const fn new(inner: O) -> Self {
        Self {
            tally: Tally::new(),
            inner,
        }
    }

    pub const fn tally(&self) -> Tally {
        self.tally
    }

    pub fn into_parts(self) -> (Tally, O) {
        (self.tally, self.inner)
    }
}

impl<O: Observer> Observer for Tallied<O> {
    fn observe(&mut self, item: Item) {
        self.tally.record(item);
        self.inner.observe(item);
    }
}

/// Items processed by each worker, indexed by worker id.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WorkerCounts(Vec<u64>);

impl WorkerCounts {
    pub const fn new(counts: Vec<u64>) -> Self {
        Self(counts)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u64>> for WorkerCounts {
    fn from(counts: Vec<u64>) -> Self {
        Self(counts)
    }
}

impl fmt::Display for WorkerCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
