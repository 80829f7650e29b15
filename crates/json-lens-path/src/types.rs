//! Type definitions for node paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single step into a JSON structure.
///
/// A tree/graph view addresses nodes with a mix of object keys and array
/// indices; the two access kinds are kept as distinct variants so the
/// resolver and formatter can match exhaustively instead of sniffing a
/// string for digits.
///
/// The serde representation is untagged, so a JSON path like
/// `["customer", 0]` deserializes directly into a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array index.
    Index(usize),
    /// Object key.
    Key(String),
}

impl PathSegment {
    /// Object-key segment.
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    /// Array-index segment.
    pub fn index(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A node path. The empty path addresses the document root.
pub type Path = Vec<PathSegment>;

/// Outcome of resolving a path against a document snapshot.
///
/// `Unresolved` covers both a document that fails to parse and a path that
/// does not address a reachable value. Neither is an error to the caller;
/// consumers fall back to row-based rendering instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Value),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }
}
