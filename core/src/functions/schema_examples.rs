#![deny(missing_docs)]

//! # Schema Examples
//!
//! Documentation-completeness checks for `example` / `examples` on Schema Objects.
//!
//! - OAS 3.0: the `example` key must exist (a `null` value counts).
//! - OAS 3.1: either `example`, or an `examples` value that is not an empty array.
//! - OAS 3.1: a lone `example` should move to `examples`.
//!
//! Unresolved `$ref` objects are skipped; the referenced schema is checked at its
//! own location.

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::RuleFunction;
use crate::violation::Violation;
use serde_json::{Map, Value};

fn schema_object(target: &Value) -> Option<&Map<String, Value>> {
    target.as_object().filter(|map| !map.contains_key("$ref"))
}

/// Violation for an OAS 3.0 schema without an `example` key.
pub fn oas3_0_requires_example(schema: &Value) -> Option<Violation> {
    let map = schema_object(schema)?;
    if map.contains_key("example") {
        return None;
    }
    Some(Violation::new(
        "Schema is missing a required 'example' (OAS 3.0 style)",
    ))
}

/// Violation for an OAS 3.1 schema with neither `example` nor usable `examples`.
///
/// `examples: null` and `examples: {}` are accepted; `examples: []` is not.
pub fn oas3_1_requires_example(schema: &Value) -> Option<Violation> {
    let map = schema_object(schema)?;

    let has_example = map.contains_key("example");
    let has_examples = match map.get("examples") {
        None => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    };

    if has_example || has_examples {
        return None;
    }
    Some(Violation::new(
        "Schema is missing either 'example' or 'examples' (OAS 3.1 style)",
    ))
}

/// Violation for an OAS 3.1 schema using `example` without `examples`.
pub fn oas3_1_prefer_examples(schema: &Value) -> Option<Violation> {
    let map = schema.as_object()?;
    if map.contains_key("example") && !map.contains_key("examples") {
        return Some(Violation::new(
            "Prefer 'examples' over (or in addition to) the deprecated 'example' in OAS 3.1 schemas",
        ));
    }
    None
}

/// `oas3_0-schema-requires-example`
#[derive(Debug, Clone, Copy, Default)]
pub struct Oas30SchemaRequiresExample;

impl RuleFunction for Oas30SchemaRequiresExample {
    fn name(&self) -> &'static str {
        "oas3_0-schema-requires-example"
    }

    fn run(&self, target: &Value, _: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        Ok(oas3_0_requires_example(target).into_iter().collect())
    }
}

/// `oas3_1-schema-requires-example`
#[derive(Debug, Clone, Copy, Default)]
pub struct Oas31SchemaRequiresExample;

impl RuleFunction for Oas31SchemaRequiresExample {
    fn name(&self) -> &'static str {
        "oas3_1-schema-requires-example"
    }

    fn run(&self, target: &Value, _: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        Ok(oas3_1_requires_example(target).into_iter().collect())
    }
}

/// `oas3_1-schema-has-example-but-no-examples`
#[derive(Debug, Clone, Copy, Default)]
pub struct Oas31PreferExamplesOverExample;

impl RuleFunction for Oas31PreferExamplesOverExample {
    fn name(&self) -> &'static str {
        "oas3_1-schema-has-example-but-no-examples"
    }

    fn run(&self, target: &Value, _: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        Ok(oas3_1_prefer_examples(target).into_iter().collect())
    }
}
