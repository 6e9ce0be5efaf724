#![deny(missing_docs)]

//! # Documents & Rule Context
//!
//! A [`Document`] is one parsed API description plus the state scoped to a single
//! lint pass over it: the set of `$ref` targets that have already been checked
//! against an expected schema, keyed by that schema's name. Sharing that set per document (rather than per
//! process) keeps repeated references from being reported twice while keeping
//! unrelated documents independent.

use crate::error::{AppError, AppResult};
use crate::violation::JsonPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Specification flavour of a document, named like ruleset `formats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecFormat {
    /// Swagger 2.0
    #[serde(rename = "oas2")]
    Oas2,
    /// OpenAPI 3.0.x
    #[serde(rename = "oas3_0")]
    Oas3_0,
    /// OpenAPI 3.1.x
    #[serde(rename = "oas3_1")]
    Oas3_1,
    /// Any OpenAPI 3.x
    #[serde(rename = "oas3")]
    Oas3,
}

/// A parsed document under lint.
#[derive(Debug)]
pub struct Document {
    data: Value,
    validated_refs: Mutex<HashSet<(String, String)>>,
}

impl Document {
    /// Wraps an already parsed document.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            validated_refs: Mutex::new(HashSet::new()),
        }
    }

    /// Parses a YAML (or JSON) document.
    pub fn from_yaml(source: &str) -> AppResult<Self> {
        let data: Value = serde_yaml::from_str(source)?;
        if !data.is_object() {
            return Err(AppError::General(
                "API description root must be a mapping".into(),
            ));
        }
        Ok(Self::new(data))
    }

    /// The root value.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The formats this document satisfies, most specific first.
    ///
    /// A document without an `openapi` or `swagger` version satisfies none.
    pub fn formats(&self) -> Vec<SpecFormat> {
        if let Some(v) = self.data.get("openapi").and_then(Value::as_str) {
            if v.starts_with("3.0") {
                return vec![SpecFormat::Oas3_0, SpecFormat::Oas3];
            }
            if v.starts_with("3.1") {
                return vec![SpecFormat::Oas3_1, SpecFormat::Oas3];
            }
            if v.starts_with('3') {
                return vec![SpecFormat::Oas3];
            }
        }
        match self.data.get("swagger") {
            Some(Value::String(s)) if s == "2.0" => vec![SpecFormat::Oas2],
            _ => Vec::new(),
        }
    }

    /// Records `reference` as checked against the baseline `schema_name`.
    /// Returns `false` if it already was.
    pub fn mark_ref_validated(&self, schema_name: &str, reference: &str) -> bool {
        self.validated_refs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((schema_name.to_string(), reference.to_string()))
    }

    /// Whether `reference` has been checked against `schema_name` during this pass.
    pub fn is_ref_validated(&self, schema_name: &str, reference: &str) -> bool {
        self.validated_refs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(name, r)| name == schema_name && r == reference)
    }
}

/// The location a rule function is invoked at.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    /// The document being linted.
    pub document: &'a Document,
    /// Path of the target node from the document root.
    pub path: JsonPath,
    /// Whether functions may follow local `$ref`s nested inside the target.
    pub resolved: bool,
}

impl<'a> RuleContext<'a> {
    /// Creates a context that follows nested references.
    pub fn new(document: &'a Document, path: JsonPath) -> Self {
        Self {
            document,
            path,
            resolved: true,
        }
    }

    /// Sets whether nested references are followed.
    pub fn with_resolved(mut self, resolved: bool) -> Self {
        self.resolved = resolved;
        self
    }

    /// The last path segment as a key, e.g. the path template under `paths`.
    pub fn last_key(&self) -> Option<&str> {
        self.path.last().and_then(|s| s.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::path_of;

    #[test]
    fn test_formats_detection() {
        let d = Document::from_yaml("openapi: 3.0.3\ninfo: {}").unwrap();
        assert_eq!(d.formats(), vec![SpecFormat::Oas3_0, SpecFormat::Oas3]);

        let d = Document::from_yaml("openapi: 3.1.0").unwrap();
        assert_eq!(d.formats(), vec![SpecFormat::Oas3_1, SpecFormat::Oas3]);

        let d = Document::from_yaml("swagger: '2.0'").unwrap();
        assert_eq!(d.formats(), vec![SpecFormat::Oas2]);

        let d = Document::from_yaml("title: nope").unwrap();
        assert!(d.formats().is_empty());
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        assert!(Document::from_yaml("- a\n- b").is_err());
    }

    #[test]
    fn test_validated_refs_are_per_document() {
        let a = Document::from_yaml("openapi: 3.1.0").unwrap();
        let b = Document::from_yaml("openapi: 3.1.0").unwrap();

        assert!(a.mark_ref_validated("ErrorResponse", "#/components/schemas/Error"));
        assert!(!a.mark_ref_validated("ErrorResponse", "#/components/schemas/Error"));
        assert!(a.is_ref_validated("ErrorResponse", "#/components/schemas/Error"));
        assert!(!b.is_ref_validated("ErrorResponse", "#/components/schemas/Error"));
    }

    #[test]
    fn test_validated_refs_are_per_baseline() {
        let d = Document::from_yaml("openapi: 3.1.0").unwrap();
        assert!(d.mark_ref_validated("ErrorResponse", "#/components/schemas/Error"));
        assert!(!d.is_ref_validated("ProblemDetailResponse", "#/components/schemas/Error"));
        assert!(d.mark_ref_validated("ProblemDetailResponse", "#/components/schemas/Error"));
    }

    #[test]
    fn test_last_key() {
        let d = Document::from_yaml("openapi: 3.1.0").unwrap();
        let ctx = RuleContext::new(&d, path_of(["paths", "/users/{id}"]));
        assert_eq!(ctx.last_key(), Some("/users/{id}"));
    }
}
