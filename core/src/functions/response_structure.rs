#![deny(missing_docs)]

//! # Response Structure Rules
//!
//! Fixed baselines for error payloads, checked with the schema narrowing check:
//!
//! - `ErrorResponse` for internal (5xx) errors: `{ error, message, details? }`.
//! - `ProblemDetailResponse` for validation (4xx) errors: an RFC 9457 style
//!   problem document with an `errors` array describing each failed input.
//!
//! Each baseline exists in an OAS 3.0 flavour (`nullable: true`) and an OAS 3.1
//! flavour (`anyOf` with a `"null"` branch).

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::schema_matches_schema::{check_schema, SchemaMatchOptions};
use crate::functions::{parse_options, RuleFunction};
use crate::violation::Violation;
use serde::Deserialize;
use serde_json::{json, Value};

/// Schema name used in `ErrorResponse` messages.
pub const ERROR_RESPONSE_NAME: &str = "ErrorResponse";

/// Schema name used in `ProblemDetailResponse` messages.
pub const PROBLEM_DETAIL_RESPONSE_NAME: &str = "ProblemDetailResponse";

/// OpenAPI flavour a baseline is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum OasVersion {
    /// OAS 3.0: nullability through `nullable: true`.
    #[serde(rename = "3.0")]
    V3_0,
    /// OAS 3.1: nullability through a `"null"` type.
    #[default]
    #[serde(rename = "3.1")]
    V3_1,
}

/// Options shared by the response structure functions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseStructureOptions {
    /// Baseline flavour. Defaults to `3.1`.
    pub version: OasVersion,
    /// Forwarded to the narrowing check.
    pub debug: bool,
}

fn nullable(schema: Value, version: OasVersion) -> Value {
    match version {
        OasVersion::V3_0 => {
            let mut schema = schema;
            schema["nullable"] = json!(true);
            schema
        }
        OasVersion::V3_1 => json!({ "anyOf": [schema, { "type": "null" }] }),
    }
}

/// The `ErrorResponse` baseline.
pub fn error_response_schema(version: OasVersion) -> Value {
    json!({
        "type": "object",
        "required": ["error", "message"],
        "properties": {
            "error": { "type": "string" },
            "message": { "type": "string" },
            "details": nullable(
                json!({ "type": "object", "additionalProperties": true }),
                version
            )
        }
    })
}

/// The `ProblemDetailResponse` baseline.
pub fn problem_detail_response_schema(version: OasVersion) -> Value {
    let nullable_string = || nullable(json!({ "type": "string" }), version);

    json!({
        "type": "object",
        "required": ["type", "title", "status", "errors"],
        "properties": {
            "type": { "type": "string" },
            "title": { "type": "string" },
            "status": { "type": "integer" },
            "detail": nullable_string(),
            "errors": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["location", "code", "message", "type"],
                    "properties": {
                        "location": {
                            "type": "string",
                            "enum": ["body", "query", "header", "path", "cookie"]
                        },
                        "code": { "type": "string" },
                        "message": { "type": "string" },
                        "type": { "type": "string" },
                        "field": nullable_string(),
                        "detail": nullable_string(),
                        "received": nullable_string(),
                        "pointer": nullable_string(),
                        "constraints": nullable(
                            json!({ "type": "object", "additionalProperties": true }),
                            version
                        )
                    }
                }
            }
        }
    })
}

/// Checks a 5xx response schema against `ErrorResponse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalErrorResponseStructure;

impl RuleFunction for InternalErrorResponseStructure {
    fn name(&self) -> &'static str {
        "internal-error-response-structure"
    }

    fn run(
        &self,
        target: &Value,
        options: &Value,
        ctx: &RuleContext<'_>,
    ) -> AppResult<Vec<Violation>> {
        let options: ResponseStructureOptions = parse_options(self.name(), options)?;
        let mut check = SchemaMatchOptions::new(
            error_response_schema(options.version),
            ERROR_RESPONSE_NAME,
        );
        check.debug = options.debug;
        Ok(check_schema(target, &check, ctx))
    }
}

/// Checks a 4xx response schema against `ProblemDetailResponse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemDetailsResponseStructure;

impl RuleFunction for ProblemDetailsResponseStructure {
    fn name(&self) -> &'static str {
        "problem-details-response-structure"
    }

    fn run(
        &self,
        target: &Value,
        options: &Value,
        ctx: &RuleContext<'_>,
    ) -> AppResult<Vec<Violation>> {
        let options: ResponseStructureOptions = parse_options(self.name(), options)?;
        let mut check = SchemaMatchOptions::new(
            problem_detail_response_schema(options.version),
            PROBLEM_DETAIL_RESPONSE_NAME,
        );
        check.debug = options.debug;
        Ok(check_schema(target, &check, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::violation::path_of;

    fn run_error(schema_yaml: &str, version: &str) -> Vec<String> {
        let doc = Document::new(json!({}));
        let ctx = RuleContext::new(&doc, path_of(["schema"]));
        let schema: Value = serde_yaml::from_str(schema_yaml).unwrap();
        InternalErrorResponseStructure
            .run(&schema, &json!({ "version": version }), &ctx)
            .unwrap()
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn test_baseline_nullable_flavours() {
        let v30 = error_response_schema(OasVersion::V3_0);
        assert_eq!(v30["properties"]["details"]["nullable"], json!(true));

        let v31 = error_response_schema(OasVersion::V3_1);
        assert_eq!(
            v31["properties"]["details"]["anyOf"][1],
            json!({ "type": "null" })
        );
    }

    #[test]
    fn test_error_response_inline_matches_3_0() {
        let out = run_error(
            r#"
type: object
required: [error, message]
properties:
  error: { type: string }
  message: { type: string }
  details:
    type: object
    additionalProperties: true
    nullable: true
"#,
            "3.0",
        );
        assert!(out.is_empty(), "{out:?}");
    }

    #[test]
    fn test_error_response_any_of_subset_3_1() {
        let out = run_error(
            r#"
type: object
required: [error, message]
properties:
  error: { type: string }
  message: { type: string }
  details:
    anyOf:
      - type: object
        additionalProperties: true
"#,
            "3.1",
        );
        assert!(out.is_empty(), "{out:?}");
    }

    #[test]
    fn test_error_response_not_even_close() {
        let out = run_error("type: string", "3.1");
        assert_eq!(
            out,
            vec![
                "Schema type mismatch for ErrorResponse: expected 'object', found 'string'",
                "Required property 'error' in ErrorResponse must remain required (cannot become optional)",
                "Required property 'message' in ErrorResponse must remain required (cannot become optional)",
                "Missing required property 'error' in ErrorResponse",
                "Missing required property 'message' in ErrorResponse",
            ]
        );
    }

    #[test]
    fn test_problem_details_detail_type_mismatch() {
        let doc = Document::new(json!({}));
        let ctx = RuleContext::new(&doc, vec![]);
        let mut schema = problem_detail_response_schema(OasVersion::V3_1);
        schema["properties"]["detail"] = json!({ "type": "integer" });

        let out = ProblemDetailsResponseStructure
            .run(&schema, &Value::Null, &ctx)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].message,
            "Property 'detail' type mismatch in ProblemDetailResponse: expected 'string or null', found 'integer'"
        );
    }

    #[test]
    fn test_problem_details_bad_version() {
        let doc = Document::new(json!({}));
        let ctx = RuleContext::new(&doc, vec![]);
        let err = ProblemDetailsResponseStructure
            .run(&json!({}), &json!({ "version": "2.0" }), &ctx)
            .unwrap_err();
        assert!(format!("{err}").contains("problem-details-response-structure"));
    }
}
