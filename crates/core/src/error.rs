//! Core error model.

use thiserror::Error;

/// Result type used across the core primitives.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core-level error.
///
/// Keep this focused on deterministic input failures. Remote and
/// concurrency failures belong to the crates that perform them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A resource path was malformed (empty, leading/trailing or doubled `/`).
    #[error("invalid resource path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A single path segment was malformed.
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),
}

impl CoreError {
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    pub fn invalid_segment(segment: impl Into<String>) -> Self {
        Self::InvalidSegment(segment.into())
    }
}
