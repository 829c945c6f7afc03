//! Hierarchical resource paths (`pool/dataset/filesystem`).

use core::borrow::Borrow;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const SEPARATOR: char = '/';

/// Full path of a resource in a hierarchical store.
///
/// Ordering is plain lexicographic order of the string form. Every listing
/// and every pagination cursor is anchored on this order, so it must never
/// depend on anything but the path itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Parse and validate a path.
    pub fn parse(path: impl Into<String>) -> CoreResult<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(CoreError::invalid_path(path, "empty"));
        }
        if path.starts_with(SEPARATOR) {
            return Err(CoreError::invalid_path(path, "leading separator"));
        }
        if path.ends_with(SEPARATOR) {
            return Err(CoreError::invalid_path(path, "trailing separator"));
        }
        if path.split(SEPARATOR).any(str::is_empty) {
            return Err(CoreError::invalid_path(path, "empty segment"));
        }
        Ok(Self(path))
    }

    /// Append one segment: `fs.join("child-001")` is `fs/child-001`.
    pub fn join(&self, name: &str) -> CoreResult<Self> {
        if name.is_empty() || name.contains(SEPARATOR) {
            return Err(CoreError::invalid_segment(name));
        }
        Ok(Self(format!("{}{SEPARATOR}{name}", self.0)))
    }

    /// Parent path, `None` for a top-level path.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Last segment.
    pub fn name(&self) -> &str {
        self.0
            .rsplit_once(SEPARATOR)
            .map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Whether `self` sits directly under `parent`.
    pub fn is_child_of(&self, parent: &ResourcePath) -> bool {
        self.0
            .strip_prefix(parent.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .is_some_and(|rest| !rest.contains(SEPARATOR))
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.split(SEPARATOR).count()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourcePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourcePath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ResourcePath> for String {
    fn from(value: ResourcePath) -> Self {
        value.0
    }
}

// Ord, Eq and Hash all come from the inner `String`, so lookups by `&str`
// agree with lookups by `ResourcePath`.
impl Borrow<str> for ResourcePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
