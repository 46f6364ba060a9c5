#![doc = include_str!("../README.md")]

mod common;
pub use common::*;

pub mod collector;
pub mod config;
pub mod generator;
pub mod merge;
pub mod pipeline;
pub mod pool;
pub mod report;
pub mod verify;

pub use collector::collect;
pub use config::PipelineConfig;
pub use generator::generate;
pub use merge::{MergeHandle, merge};
pub use pipeline::Pipeline;
pub use pool::{Intake, WorkerPool};
pub use report::Report;
pub use verify::verify;
