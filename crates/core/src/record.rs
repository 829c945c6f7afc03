//! Record trait: anything listed under a parent path.

use crate::path::ResourcePath;

/// A listable resource whose identity is its full hierarchical path.
///
/// Paths are unique within a store, which is what lets a path double as a
/// pagination cursor.
pub trait Record {
    /// Returns the record identity.
    fn path(&self) -> &ResourcePath;
}

impl Record for ResourcePath {
    fn path(&self) -> &ResourcePath {
        self
    }
}
