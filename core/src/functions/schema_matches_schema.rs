#![deny(missing_docs)]

//! # Schema Narrowing Check
//!
//! Validates that a schema found in a document is a *narrowing* of an expected
//! baseline schema: it may be equal to or stricter than the baseline, never looser.
//!
//! Allowed narrowing:
//! - extra `required` entries, dropped optional properties
//! - adding an `enum`, removing `enum` values
//! - raising minimums / lowering maximums
//! - removing nullability
//! - extra properties (unless `allowAdditionalProperties` is `false`)
//!
//! Forbidden widening:
//! - type changes outside the expected type set
//! - making a required property optional, or dropping it
//! - adding nullability, adding `enum` values, dropping an expected `enum` or `pattern`
//! - relaxing or dropping numeric / length constraints
//!
//! Composed schemas (`allOf`, `oneOf`, `anyOf` other than a two-branch null
//! union) are rejected outright at the entry point.

use crate::diagnostics::DebugLog;
use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::{parse_options, RuleFunction};
use crate::oas::pointer::{ref_to_path, resolve_json_pointer};
use crate::oas::schema_node::{is_truthy, SchemaNode};
use crate::oas::type_info::TypeInfo;
use crate::violation::{join_path, JsonPath, PathSegment, Violation};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Name of the function in rulesets.
pub const FUNCTION_NAME: &str = "oas3-schema-matches-schema";

/// Options of `oas3-schema-matches-schema`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaMatchOptions {
    /// The baseline schema. Required; its absence is reported as a violation.
    pub expected_schema: Option<Value>,
    /// Name used in messages. Defaults to `expected schema`.
    pub schema_name: String,
    /// Whether the actual schema may declare properties the baseline lacks.
    /// Defaults to `true`.
    pub allow_additional_properties: bool,
    /// Emits `tracing` debug events while comparing. Defaults to `false`.
    pub debug: bool,
}

impl Default for SchemaMatchOptions {
    fn default() -> Self {
        Self {
            expected_schema: None,
            schema_name: "expected schema".to_string(),
            allow_additional_properties: true,
            debug: false,
        }
    }
}

impl SchemaMatchOptions {
    /// Options comparing against `expected_schema` under `schema_name`.
    pub fn new(expected_schema: Value, schema_name: impl Into<String>) -> Self {
        Self {
            expected_schema: Some(expected_schema),
            schema_name: schema_name.into(),
            ..Self::default()
        }
    }
}

/// Ruleset entry point for [`check_schema`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMatchesSchema;

impl RuleFunction for SchemaMatchesSchema {
    fn name(&self) -> &'static str {
        FUNCTION_NAME
    }

    fn run(
        &self,
        target: &Value,
        options: &Value,
        ctx: &RuleContext<'_>,
    ) -> AppResult<Vec<Violation>> {
        let options: SchemaMatchOptions = parse_options(FUNCTION_NAME, options)?;
        Ok(check_schema(target, &options, ctx))
    }
}

/// Checks `schema` (inline or `$ref`) against `options.expected_schema`.
///
/// A `$ref` is resolved against the document root and checked at most once per
/// document and baseline; violations inside it are reported at the referenced
/// component's own location, not at the referring site.
///
/// When `ctx.resolved` is set, local `$ref`s nested under properties and
/// `items` are followed before comparing.
pub fn check_schema(
    schema: &Value,
    options: &SchemaMatchOptions,
    ctx: &RuleContext<'_>,
) -> Vec<Violation> {
    let log = DebugLog::new(FUNCTION_NAME, options.debug);
    log.debug(|| format!("Invoked at {}", join_path(&ctx.path)));

    let Some(expected) = options.expected_schema.as_ref() else {
        return vec![Violation::new(
            "Function misconfigured: expectedSchema is required",
        )];
    };

    let node = SchemaNode::new(schema);
    let schema_name = options.schema_name.as_str();

    if is_composed(node) {
        return vec![Violation::at(
            format!(
                "Composed schemas (allOf/oneOf/complex anyOf) are not supported for {}",
                schema_name
            ),
            ctx.path.clone(),
        )];
    }

    let validator = NarrowingValidator::new(options.allow_additional_properties, log);
    let validator = if ctx.resolved {
        validator.with_root(ctx.document.data())
    } else {
        validator
    };
    let expected = SchemaNode::new(expected);

    if let Some(reference) = node.reference() {
        log.debug(|| format!("Detected $ref: {}", reference));

        if !ctx.document.mark_ref_validated(schema_name, reference) {
            log.debug(|| format!("Reference already validated, skipping: {}", reference));
            return Vec::new();
        }

        let Some(resolved) = resolve_json_pointer(ctx.document.data(), reference) else {
            return vec![Violation::at(
                format!("Unable to resolve schema reference: {}", reference),
                ctx.path.clone(),
            )];
        };

        return validator.validate(
            SchemaNode::new(resolved),
            expected,
            &ref_to_path(reference),
            schema_name,
        );
    }

    log.debug(|| "Validating inline schema");
    validator.validate(node, expected, &ctx.path, schema_name)
}

/// Compares `actual` against `expected` without `$ref` handling or debug output.
///
/// Nested `$ref`s are left as they are; they compare as untyped schemas.
pub fn validate_object(
    actual: &Value,
    expected: &Value,
    base_path: &[PathSegment],
    schema_name: &str,
    allow_additional_properties: bool,
) -> Vec<Violation> {
    NarrowingValidator::new(
        allow_additional_properties,
        DebugLog::disabled(FUNCTION_NAME),
    )
    .validate(
        SchemaNode::new(actual),
        SchemaNode::new(expected),
        base_path,
        schema_name,
    )
}

/// `allOf`, `oneOf`, or an `anyOf` that is not a simple null union.
fn is_composed(node: SchemaNode<'_>) -> bool {
    if node.has("allOf") || node.has("oneOf") {
        return true;
    }
    if !node.has("anyOf") {
        return false;
    }
    !node.branches("anyOf").is_some_and(is_simple_null_union)
}

/// Exactly two branches, exactly one of which carries a truthy `type`, and one
/// of which is typed `"null"` (or YAML `null`).
fn is_simple_null_union(branches: &[Value]) -> bool {
    if branches.len() != 2 {
        return false;
    }
    let typed = branches
        .iter()
        .filter(|b| b.get("type").is_some_and(is_truthy))
        .count();
    let has_null = branches.iter().any(|b| match b.get("type") {
        Some(Value::Null) => true,
        Some(Value::String(s)) => s == "null",
        _ => false,
    });
    typed == 1 && has_null
}

/// Direction in which a numeric constraint tightens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// Larger is stricter (`minLength`, `minimum`, `minItems`).
    Lower,
    /// Smaller is stricter (`maxLength`, `maximum`, `maxItems`).
    Upper,
}

impl Bound {
    fn is_stricter_or_equal(self, actual: f64, expected: f64) -> bool {
        match self {
            Bound::Lower => actual >= expected,
            Bound::Upper => actual <= expected,
        }
    }
}

const CONSTRAINTS: [(&str, Bound); 6] = [
    ("minLength", Bound::Lower),
    ("maxLength", Bound::Upper),
    ("minimum", Bound::Lower),
    ("maximum", Bound::Upper),
    ("minItems", Bound::Lower),
    ("maxItems", Bound::Upper),
];

/// Compares one numeric constraint, requiring `actual` to be at least as strict.
///
/// Nothing is required when `expected` does not define `key`.
pub fn compare_constraint<F>(
    actual: SchemaNode<'_>,
    expected: SchemaNode<'_>,
    key: &str,
    path: &[PathSegment],
    violations: &mut Vec<Violation>,
    is_stricter_or_equal: F,
) where
    F: Fn(f64, f64) -> bool,
{
    let Some(wanted) = expected.constraint(key) else {
        return;
    };

    match actual.constraint(key) {
        None => violations.push(Violation::at(
            format!(
                "Property at {} must define {} (expected at least {})",
                join_path(path),
                key,
                render_number(wanted)
            ),
            path.to_vec(),
        )),
        Some(found) => {
            let (a, e) = (
                found.as_f64().unwrap_or(f64::NAN),
                wanted.as_f64().unwrap_or(f64::NAN),
            );
            if !is_stricter_or_equal(a, e) {
                violations.push(Violation::at(
                    format!(
                        "Property at {} has {} {} which is less restrictive than expected {}",
                        join_path(path),
                        key,
                        render_number(found),
                        render_number(wanted)
                    ),
                    path.to_vec(),
                ));
            }
        }
    }
}

fn child_path(base: &[PathSegment], segments: &[&str]) -> JsonPath {
    let mut path = base.to_vec();
    path.extend(segments.iter().map(|s| PathSegment::from(*s)));
    path
}

/// The recursive object comparison.
///
/// With a document root attached, local `$ref`s met under `properties` and
/// `items` of the actual schema are resolved against it.
#[derive(Debug, Clone, Copy)]
pub struct NarrowingValidator<'r> {
    allow_additional_properties: bool,
    log: DebugLog,
    root: Option<&'r Value>,
}

impl NarrowingValidator<'static> {
    /// Creates a validator that leaves nested references unresolved.
    pub fn new(allow_additional_properties: bool, log: DebugLog) -> Self {
        Self {
            allow_additional_properties,
            log,
            root: None,
        }
    }
}

impl<'r> NarrowingValidator<'r> {
    /// Resolves nested local references against `root`.
    pub fn with_root<'d>(self, root: &'d Value) -> NarrowingValidator<'d> {
        NarrowingValidator {
            allow_additional_properties: self.allow_additional_properties,
            log: self.log,
            root: Some(root),
        }
    }

    /// Follows `$ref` chains from `node`. Stops at a cycle or an unresolvable
    /// target and returns the last node reached.
    fn follow<'n>(&self, node: SchemaNode<'n>) -> SchemaNode<'n>
    where
        'r: 'n,
    {
        let Some(root) = self.root else {
            return node;
        };

        let mut current = node;
        let mut seen: Vec<&str> = Vec::new();
        while let Some(reference) = current.reference() {
            if seen.contains(&reference) {
                self.log.debug(|| format!("Circular $ref, not following: {}", reference));
                break;
            }
            seen.push(reference);
            match resolve_json_pointer(root, reference) {
                Some(target) => {
                    self.log.debug(|| format!("Following nested $ref: {}", reference));
                    current = SchemaNode::new(target);
                }
                None => break,
            }
        }
        current
    }

    /// Compares `actual` against `expected` at `base_path`.
    ///
    /// Violations are returned in discovery order: type mismatch, required
    /// retention, per expected property (in `expected.properties` order), then
    /// unexpected properties (in `actual.properties` order).
    pub fn validate<'n>(
        &self,
        actual: SchemaNode<'n>,
        expected: SchemaNode<'_>,
        base_path: &[PathSegment],
        schema_name: &str,
    ) -> Vec<Violation>
    where
        'r: 'n,
    {
        let mut violations = Vec::new();
        let location = || {
            let joined = join_path(base_path);
            if joined.is_empty() {
                "(root)".to_string()
            } else {
                joined
            }
        };

        self.log.debug(|| {
            format!(
                "Validating object at {} against {}",
                location(),
                schema_name
            )
        });

        let expected_info = TypeInfo::of(expected);
        let actual_info = TypeInfo::of(actual);
        if !actual_info.is_compatible_with(&expected_info) {
            violations.push(Violation::at(
                format!(
                    "Schema type mismatch for {}: expected '{}', found '{}'",
                    schema_name,
                    expected_info.describe(),
                    actual_info.describe()
                ),
                base_path.to_vec(),
            ));
        }

        let expected_required = expected.required();
        let actual_required = actual.required();
        for name in &expected_required {
            if !actual_required.contains(name) {
                violations.push(Violation::at(
                    format!(
                        "Required property '{}' in {} must remain required (cannot become optional)",
                        name, schema_name
                    ),
                    child_path(base_path, &["required"]),
                ));
            }
        }

        let empty = Map::new();
        let expected_props = expected.properties().unwrap_or(&empty);
        let actual_props = actual.properties().unwrap_or(&empty);

        for (name, expected_prop) in expected_props {
            if !is_truthy(expected_prop) {
                continue;
            }
            let expected_prop = SchemaNode::new(expected_prop);

            let Some(actual_prop) = actual.property(name).map(|p| self.follow(p)) else {
                if expected_required.contains(&name.as_str()) {
                    violations.push(Violation::at(
                        format!("Missing required property '{}' in {}", name, schema_name),
                        child_path(base_path, &["properties"]),
                    ));
                } else {
                    self.log.debug(|| {
                        format!("Optional property '{}' is missing -> allowed (narrowing)", name)
                    });
                }
                continue;
            };

            let prop_path = child_path(base_path, &["properties", name.as_str()]);
            self.validate_property(
                name,
                actual_prop,
                expected_prop,
                &prop_path,
                schema_name,
                &mut violations,
            );
        }

        if !self.allow_additional_properties {
            for name in actual_props.keys() {
                let declared = expected_props.get(name).is_some_and(is_truthy);
                if !declared {
                    violations.push(Violation::at(
                        format!(
                            "Unexpected property '{}' is not allowed in {}",
                            name, schema_name
                        ),
                        child_path(base_path, &["properties", name.as_str()]),
                    ));
                }
            }
        }

        self.log.debug(|| {
            format!(
                "Validation at {} completed. Violations: {}",
                location(),
                violations.len()
            )
        });
        violations
    }

    fn validate_property<'n>(
        &self,
        name: &str,
        actual: SchemaNode<'n>,
        expected: SchemaNode<'_>,
        path: &[PathSegment],
        schema_name: &str,
        violations: &mut Vec<Violation>,
    ) where
        'r: 'n,
    {
        let expected_info = TypeInfo::of(expected);
        let actual_info = TypeInfo::of(actual);

        if !actual_info.is_compatible_with(&expected_info) {
            violations.push(Violation::at(
                format!(
                    "Property '{}' type mismatch in {}: expected '{}', found '{}'",
                    name,
                    schema_name,
                    expected_info.describe(),
                    actual_info.describe()
                ),
                path.to_vec(),
            ));
        }

        match (expected_info.is_nullable, actual_info.is_nullable) {
            (true, false) => {
                self.log
                    .debug(|| format!("Property '{}' narrowing nullable -> allowed", name));
            }
            (false, true) => violations.push(Violation::at(
                format!(
                    "Property '{}' cannot be made nullable in {} (widening forbidden)",
                    name, schema_name
                ),
                path.to_vec(),
            )),
            _ => {}
        }

        if let Some(expected_enum) = expected.enum_values() {
            match actual.enum_values() {
                None => violations.push(Violation::at(
                    format!(
                        "Property '{}' must restrict values with enum in {} (expected: {})",
                        name,
                        schema_name,
                        render_values(expected_enum.iter())
                    ),
                    path.to_vec(),
                )),
                Some(actual_enum) => {
                    let extra: Vec<&Value> = actual_enum
                        .iter()
                        .filter(|v| !expected_enum.iter().any(|e| same_value(v, e)))
                        .collect();
                    if !extra.is_empty() {
                        violations.push(Violation::at(
                            format!(
                                "Property '{}' enum contains extra values not allowed in {}: {}",
                                name,
                                schema_name,
                                render_values(extra.into_iter())
                            ),
                            path.to_vec(),
                        ));
                    }
                }
            }
        } else if actual.enum_values().is_some() {
            self.log.debug(|| {
                format!("Property '{}' adds enum restriction -> allowed (narrowing)", name)
            });
        }

        for (key, bound) in CONSTRAINTS {
            compare_constraint(actual, expected, key, path, violations, |a, e| {
                bound.is_stricter_or_equal(a, e)
            });
        }

        match (expected.pattern(), actual.pattern()) {
            (Some(wanted), None) => violations.push(Violation::at(
                format!(
                    "Property '{}' must enforce pattern in {} (expected: {})",
                    name, schema_name, wanted
                ),
                path.to_vec(),
            )),
            (Some(wanted), Some(found)) if wanted != found => violations.push(Violation::at(
                format!(
                    "Property '{}' pattern mismatch in {}: expected {}, found {}",
                    name, schema_name, wanted, found
                ),
                path.to_vec(),
            )),
            _ => {}
        }

        if actual.type_name() == Some("object") && expected.type_name() == Some("object") {
            violations.extend(self.validate(
                actual,
                expected,
                path,
                &format!("{}.{}", schema_name, name),
            ));
        }

        if actual.type_name() == Some("array") {
            if let Some(expected_items) = expected.items() {
                let empty = Value::Object(Map::new());
                let actual_items = match actual.items() {
                    Some(items) => self.follow(items),
                    None => SchemaNode::new(&empty),
                };
                violations.extend(self.validate(
                    actual_items,
                    expected_items,
                    &child_path(path, &["items"]),
                    &format!("{}.{}.items", schema_name, name),
                ));
            }
        }
    }
}

/// Value equality where numbers compare by magnitude, so `1.0` equals `1`.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Whole-valued floats print without a fractional part (`5.0` as `5`).
fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn render_values<'v>(values: impl Iterator<Item = &'v Value>) -> String {
    values
        .map(|v| match v {
            Value::Number(n) => render_number(n),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
