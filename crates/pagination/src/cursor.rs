//! Continuation cursor.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use nstor_core::{CoreError, CoreResult, ResourcePath};

/// Position in a stably ordered listing.
///
/// `After(path)` means "strictly after `path`", whether or not `path` still
/// exists. On the wire a cursor is a plain token: the empty string for
/// `Start`, the path otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cursor {
    /// Before the first record.
    #[default]
    Start,
    /// Strictly after the record with this path.
    After(ResourcePath),
}

impl Cursor {
    pub fn start() -> Self {
        Self::Start
    }

    pub fn after(path: ResourcePath) -> Self {
        Self::After(path)
    }

    /// Parse a wire token. Empty means `Start`.
    pub fn from_token(token: &str) -> CoreResult<Self> {
        if token.is_empty() {
            Ok(Self::Start)
        } else {
            ResourcePath::parse(token).map(Self::After)
        }
    }

    /// Wire token; empty for `Start`.
    pub fn to_token(&self) -> String {
        match self {
            Self::Start => String::new(),
            Self::After(path) => path.as_str().to_string(),
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    pub fn after_path(&self) -> Option<&ResourcePath> {
        match self {
            Self::Start => None,
            Self::After(path) => Some(path),
        }
    }

    /// Whether `path` lies past this cursor.
    pub fn admits(&self, path: &ResourcePath) -> bool {
        self.after_path().is_none_or(|after| path > after)
    }
}

impl core::fmt::Display for Cursor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Start => Ok(()),
            Self::After(path) => core::fmt::Display::fmt(path, f),
        }
    }
}

impl FromStr for Cursor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}

impl TryFrom<String> for Cursor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_token(&value)
    }
}

impl From<Cursor> for String {
    fn from(value: Cursor) -> Self {
        match value {
            Cursor::Start => String::new(),
            Cursor::After(path) => path.into(),
        }
    }
}

impl From<ResourcePath> for Cursor {
    fn from(value: ResourcePath) -> Self {
        Self::After(value)
    }
}
