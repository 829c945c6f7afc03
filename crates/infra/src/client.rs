//! Remote resource client abstraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nstor_core::{Record, ResourcePath};
use nstor_pagination::PageSource;

/// A filesystem as returned by the list API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filesystem {
    pub path: ResourcePath,
    pub created_at: DateTime<Utc>,
}

impl Filesystem {
    pub fn new(path: ResourcePath, created_at: DateTime<Utc>) -> Self {
        Self { path, created_at }
    }
}

impl Record for Filesystem {
    fn path(&self) -> &ResourcePath {
        &self.path
    }
}

/// Remote client error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("filesystem not found: {0}")]
    NotFound(ResourcePath),

    #[error("filesystem already exists: {0}")]
    AlreadyExists(ResourcePath),

    #[error("filesystem has children: {0}")]
    HasChildren(ResourcePath),

    #[error("request rejected for {path}: {reason}")]
    Rejected { path: ResourcePath, reason: String },
}

/// Capability set of a remote resource client.
///
/// Listing goes through [`PageSource`], so the same client backs a
/// `CursorPaginator`. Create and destroy calls are the opaque mutations
/// handed to the job runner. Retries, if any, happen in here.
pub trait ResourceClient:
    PageSource<Record = Filesystem, Error = ClientError> + Send + Sync
{
    /// Create a filesystem; its parent must already exist.
    fn create_filesystem(&self, path: &ResourcePath) -> Result<(), ClientError>;

    /// Destroy a filesystem that has no children.
    fn destroy_filesystem(&self, path: &ResourcePath) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_identity_is_its_path() {
        let path = ResourcePath::parse("pool/fs").unwrap();
        let fs = Filesystem::new(path.clone(), Utc::now());
        assert_eq!(Record::path(&fs), &path);
    }

    #[test]
    fn filesystem_json_shape() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let fs = Filesystem::new(ResourcePath::parse("pool/fs").unwrap(), created_at);

        let json = serde_json::to_value(&fs).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "path": "pool/fs", "created_at": "2024-05-01T10:00:00Z" })
        );
    }
}
