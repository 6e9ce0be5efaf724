#![deny(missing_docs)]

//! # Violations
//!
//! The records emitted by rule functions, and the path segments that locate
//! them inside a document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single step in a document location: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position.
    Index(usize),
    /// Object key.
    Key(String),
}

/// An ordered document location, root first.
pub type JsonPath = Vec<PathSegment>;

impl PathSegment {
    /// Returns the key if this segment addresses an object member.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Key(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        PathSegment::Index(value)
    }
}

/// Builds a path from anything convertible into segments.
///
/// ```
/// use oas_lint_core::violation::{path_of, PathSegment};
/// let p = path_of(["paths", "/users"]);
/// assert_eq!(p, vec![PathSegment::from("paths"), PathSegment::from("/users")]);
/// ```
pub fn path_of<I, S>(segments: I) -> JsonPath
where
    I: IntoIterator<Item = S>,
    S: Into<PathSegment>,
{
    segments.into_iter().map(Into::into).collect()
}

/// Joins segments with `/` without escaping, as used inside messages.
pub fn join_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Renders a path as an escaped JSON Pointer (`~` -> `~0`, `/` -> `~1`).
///
/// The empty path renders as the empty string (the document root).
pub fn to_json_pointer(path: &[PathSegment]) -> String {
    path.iter()
        .map(|s| {
            let raw = s.to_string();
            format!("/{}", raw.replace('~', "~0").replace('/', "~1"))
        })
        .collect()
}

/// A rule finding: a message and, optionally, where it applies.
///
/// When `path` is `None` the finding applies at the location the rule was
/// invoked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Human readable description of the problem.
    pub message: String,
    /// Location of the problem, if more precise than the invocation site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<JsonPath>,
}

impl Violation {
    /// Creates a violation reported at the invocation site.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Creates a violation at an explicit location.
    pub fn at(message: impl Into<String>, path: JsonPath) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(p) => write!(f, "{} ({})", self.message, to_json_pointer(p)),
            None => f.write_str(&self.message),
        }
    }
}
