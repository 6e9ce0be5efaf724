#![deny(missing_docs)]

//! # Linter
//!
//! Applies the rules of a resolved [`Ruleset`] through a [`FunctionRegistry`].
//!
//! Selecting nodes from `given` JSONPath expressions is the caller's job; the
//! linter runs one rule at one concrete location and turns the function's
//! violations into [`LintResult`]s.

use crate::document::{Document, RuleContext};
use crate::error::{AppError, AppResult};
use crate::functions::FunctionRegistry;
use crate::oas::resolve_path;
use crate::ruleset::{RuleDefinition, Ruleset, Severity, ThenAction};
use crate::violation::{join_path, to_json_pointer, JsonPath, PathSegment, Violation};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Selects the matched node's own key as the function target.
pub const KEY_FIELD: &str = "@key";

/// A reported finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintResult {
    /// Rule code.
    pub code: String,
    /// Rule severity.
    pub severity: Severity,
    /// Final message, after applying the rule's template.
    pub message: String,
    /// Location of the finding.
    pub path: JsonPath,
}

impl LintResult {
    /// The location as an escaped JSON Pointer.
    pub fn pointer(&self) -> String {
        to_json_pointer(&self.path)
    }
}

/// Runs ruleset rules on documents.
pub struct Linter {
    ruleset: Ruleset,
    registry: FunctionRegistry,
}

impl Linter {
    /// Creates a linter, checking that every enabled rule names a registered
    /// function.
    pub fn new(ruleset: Ruleset, registry: FunctionRegistry) -> AppResult<Self> {
        for (code, rule) in ruleset.definitions() {
            if rule.severity == Severity::Off {
                continue;
            }
            if let Some(then) = rule.then.iter().find(|t| !registry.contains(&t.function)) {
                return Err(AppError::Config(format!(
                    "Rule '{}' uses unknown function '{}'",
                    code, then.function
                )));
            }
        }
        Ok(Self { ruleset, registry })
    }

    /// A linter for a built-in ruleset with every shipped function.
    pub fn builtin(name: &str) -> AppResult<Self> {
        Self::new(Ruleset::builtin(name)?, FunctionRegistry::with_defaults())
    }

    /// The ruleset in use.
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Enabled rules that apply to `document`'s format.
    pub fn active_rules<'a>(
        &'a self,
        document: &Document,
    ) -> impl Iterator<Item = (&'a str, &'a RuleDefinition)> + 'a {
        let formats = document.formats();
        self.ruleset
            .definitions()
            .filter(move |(_, rule)| rule.severity != Severity::Off && rule.applies_to(&formats))
    }

    /// Runs rule `code` on the node at `path`.
    ///
    /// Returns nothing when the rule is disabled, does not apply to the
    /// document's format, or `path` does not exist.
    pub fn run_rule(
        &self,
        code: &str,
        document: &Document,
        path: &[PathSegment],
    ) -> AppResult<Vec<LintResult>> {
        let rule = self
            .ruleset
            .rule(code)
            .ok_or_else(|| AppError::Config(format!("Unknown rule '{}'", code)))?;

        if rule.severity == Severity::Off || !rule.applies_to(&document.formats()) {
            return Ok(Vec::new());
        }
        let Some(node) = resolve_path(document.data(), path) else {
            tracing::trace!(rule = code, path = %join_path(path), "no node at path");
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        for then in &rule.then {
            let (target, target_path) = select_target(then, node, path);
            let ctx = RuleContext::new(document, target_path).with_resolved(rule.resolved);
            let violations = self.registry.invoke(
                &then.function,
                &target,
                &then.function_options,
                &ctx,
            )?;
            tracing::debug!(
                rule = code,
                function = %then.function,
                count = violations.len(),
                "rule function finished"
            );
            results.extend(
                violations
                    .into_iter()
                    .map(|v| to_result(code, rule, v, &ctx.path)),
            );
        }
        Ok(results)
    }
}

fn select_target<'a>(
    then: &ThenAction,
    node: &'a Value,
    path: &[PathSegment],
) -> (Cow<'a, Value>, JsonPath) {
    match then.field.as_deref() {
        None => (Cow::Borrowed(node), path.to_vec()),
        Some(KEY_FIELD) => {
            let key = match path.last() {
                Some(segment) => Value::String(segment.to_string()),
                None => Value::Null,
            };
            (Cow::Owned(key), path.to_vec())
        }
        Some(field) => {
            let mut child = path.to_vec();
            child.push(PathSegment::from(field));
            let value = node.get(field).unwrap_or(&Value::Null);
            (Cow::Borrowed(value), child)
        }
    }
}

fn to_result(code: &str, rule: &RuleDefinition, violation: Violation, at: &[PathSegment]) -> LintResult {
    let path = violation.path.unwrap_or_else(|| at.to_vec());
    let message = match &rule.message {
        Some(template) => render_message(template, &violation.message, rule, &path),
        None => violation.message,
    };
    LintResult {
        code: code.to_string(),
        severity: rule.severity,
        message,
        path,
    }
}

fn render_message(template: &str, error: &str, rule: &RuleDefinition, path: &[PathSegment]) -> String {
    let property = path.last().map(ToString::to_string).unwrap_or_default();
    template
        .replace("{{error}}", error)
        .replace("{{description}}", rule.description.as_deref().unwrap_or_default())
        .replace("{{property}}", &property)
        .replace("{{path}}", &join_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::path_of;

    fn linter(rules: &str) -> AppResult<Linter> {
        Linter::new(Ruleset::load(rules)?, FunctionRegistry::with_defaults())
    }

    #[test]
    fn test_unknown_function_rejected() {
        let err = linter(
            r#"
rules:
  broken:
    given: $
    then: { function: does-not-exist }
"#,
        )
        .err()
        .unwrap();
        assert_eq!(
            err.to_string(),
            "Configuration Error: Rule 'broken' uses unknown function 'does-not-exist'"
        );
    }

    #[test]
    fn test_disabled_rule_may_name_unknown_function() {
        assert!(linter(
            r#"
rules:
  broken:
    severity: off
    given: $
    then: { function: does-not-exist }
"#,
        )
        .is_ok());
    }

    #[test]
    fn test_field_and_message_template() {
        let l = linter(
            r#"
rules:
  info-description:
    description: Info needs a description
    message: "{{description}}: {{error}} at {{path}}"
    severity: error
    given: $.info
    then:
      field: description
      function: truthy
"#,
        )
        .unwrap();
        let doc = Document::from_yaml("openapi: 3.1.0\ninfo:\n  title: x\n").unwrap();
        let out = l.run_rule("info-description", &doc, &path_of(["info"])).unwrap();
        assert_eq!(
            out,
            vec![LintResult {
                code: "info-description".into(),
                severity: Severity::Error,
                message: "Info needs a description: 'description' property must be truthy at info/description".into(),
                path: path_of(["info", "description"]),
            }]
        );
        assert_eq!(out[0].pointer(), "/info/description");
    }

    #[test]
    fn test_key_field() {
        let l = linter(
            r#"
rules:
  prop-case:
    given: "$..properties[*]"
    then:
      field: "@key"
      function: casing
      functionOptions: { type: camel }
"#,
        )
        .unwrap();
        let doc = Document::from_yaml(
            "openapi: 3.1.0\ncomponents:\n  schemas:\n    A:\n      properties:\n        first_name: { type: string }\n",
        )
        .unwrap();
        let path = path_of(["components", "schemas", "A", "properties", "first_name"]);
        let out = l.run_rule("prop-case", &doc, &path).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "'first_name' is not camel case");
        assert_eq!(out[0].path, path);
    }

    #[test]
    fn test_format_filter_and_missing_nodes() {
        let l = Linter::builtin("basic").unwrap();
        let doc = Document::from_yaml("openapi: 3.1.0\ninfo: {}\n").unwrap();
        assert!(l
            .run_rule("oas2-require-openapi-3", &doc, &[])
            .unwrap()
            .is_empty());
        assert!(l
            .run_rule("path-segments-kebab-case", &doc, &path_of(["paths", "/x"]))
            .unwrap()
            .is_empty());
        assert!(l
            .active_rules(&doc)
            .all(|(code, _)| !code.starts_with("oas3_0-")));
    }

    #[test]
    fn test_unknown_rule() {
        let l = Linter::builtin("basic").unwrap();
        let doc = Document::from_yaml("openapi: 3.1.0").unwrap();
        assert!(matches!(
            l.run_rule("nope", &doc, &[]),
            Err(AppError::Config(_))
        ));
    }
}
