//! `nstor-core`: shared building blocks for the runner and the paginator.
//!
//! This crate contains **pure** primitives (no I/O, no threads).

pub mod error;
pub mod path;
pub mod record;

pub use error::{CoreError, CoreResult};
pub use path::ResourcePath;
pub use record::Record;
