#![deny(missing_docs)]

//! # OAS Lint Core
//!
//! Custom rule functions for linting OpenAPI descriptions, centred on a
//! narrowing-only schema compatibility check, plus the ruleset model that wires
//! them to document locations.

/// Shared error types.
pub mod error;

/// Rule findings and document paths.
pub mod violation;

/// Schema accessors, type sets and `$ref` resolution.
pub mod oas;

/// Linted documents and per-invocation context.
pub mod document;

/// Opt-in debug tracing.
pub mod diagnostics;

/// Rule functions and their registry.
pub mod functions;

/// Ruleset model and built-in rulesets.
pub mod ruleset;

/// Rule application.
pub mod linter;

pub use document::{Document, RuleContext, SpecFormat};
pub use error::{AppError, AppResult};
pub use functions::schema_matches_schema::{
    check_schema, compare_constraint, validate_object, SchemaMatchOptions,
};
pub use functions::{FunctionRegistry, RuleFunction};
pub use linter::{LintResult, Linter};
pub use oas::TypeInfo;
pub use ruleset::{RuleDefinition, RuleEntry, Ruleset, Severity};
pub use violation::{JsonPath, PathSegment, Violation};
