//! Pagination error model.

use nstor_core::ResourcePath;
use thiserror::Error;

/// Pagination error, generic over the collaborator's error type.
///
/// - **InvalidLimit**: argument check, raised before any remote call
/// - **OrderViolation**: the collaborator broke the paging contract (oversized
///   page, dangling continuation, repeated record)
/// - **Upstream**: the collaborator's own error, passed through untouched
#[derive(Debug, Error)]
pub enum PaginationError<E> {
    #[error("limit must be greater than 0; use list_all for an unbounded listing")]
    InvalidLimit,

    #[error("listing of '{parent}' broke the paging contract: {detail}")]
    OrderViolation { parent: ResourcePath, detail: String },

    #[error(transparent)]
    Upstream(E),
}

impl<E> PaginationError<E> {
    pub fn order_violation(parent: &ResourcePath, detail: impl Into<String>) -> Self {
        Self::OrderViolation {
            parent: parent.clone(),
            detail: detail.into(),
        }
    }

    pub fn is_invalid_limit(&self) -> bool {
        matches!(self, Self::InvalidLimit)
    }

    /// The collaborator's error, if that is what this is.
    pub fn upstream(&self) -> Option<&E> {
        match self {
            Self::Upstream(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_upstream(self) -> Option<E> {
        match self {
            Self::Upstream(e) => Some(e),
            _ => None,
        }
    }
}
