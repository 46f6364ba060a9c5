pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Item, Observer, Tallied, Tally, WorkerCounts};
