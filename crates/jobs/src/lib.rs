//! Bounded concurrent job runner.
//!
//! ## Design
//!
//! - A batch of independent jobs runs on a fixed pool of worker threads
//! - At most `workers` jobs are in flight at any time
//! - Every job runs exactly once; failures never cancel siblings
//! - All failures are collected into one `AggregateError`
//!
//! ## Components
//!
//! - `Job` / `JobBatch`: units of work plus the batch description
//! - `ConcurrentJobRunner`: fan-out/fan-in over scoped threads
//! - `AggregateError`: every failure of a batch, with counts
//! - `RunnerConfig`: pool size and thread naming

pub mod config;
pub mod error;
pub mod runner;
pub mod types;

pub use config::RunnerConfig;
pub use error::{AggregateError, JobFailure};
pub use runner::ConcurrentJobRunner;
pub use types::{BatchId, Job, JobBatch};
