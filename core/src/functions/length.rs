#![deny(missing_docs)]

//! # Length
//!
//! Generic `length` function: bounds the size of a value. Strings are measured
//! in characters, arrays and objects by entry count, numbers by their value.

use crate::document::RuleContext;
use crate::error::{AppError, AppResult};
use crate::functions::{parse_options, RuleFunction};
use crate::violation::Violation;
use serde::Deserialize;
use serde_json::Value;

/// Options of `length`. At least one bound is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LengthOptions {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
}

/// Size of `value`, or `None` for booleans and null.
pub fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(a) => Some(a.len() as f64),
        Value::Object(o) => Some(o.len() as f64),
        Value::Number(n) => n.as_f64(),
        Value::Bool(_) | Value::Null => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `length`
#[derive(Debug, Clone, Copy, Default)]
pub struct Length;

impl RuleFunction for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn run(&self, target: &Value, options: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        let options: LengthOptions = parse_options(self.name(), options)?;
        if options.min.is_none() && options.max.is_none() {
            return Err(AppError::Config(
                "Function 'length' requires 'min' or 'max'".into(),
            ));
        }

        let Some(size) = measure(target) else {
            return Ok(Vec::new());
        };

        let mut violations = Vec::new();
        if let Some(min) = options.min.filter(|min| size < *min) {
            violations.push(Violation::new(format!(
                "'{}' must be longer than {}",
                display(target),
                min
            )));
        }
        if let Some(max) = options.max.filter(|max| size > *max) {
            violations.push(Violation::new(format!(
                "'{}' must be shorter than {}",
                display(target),
                max
            )));
        }
        Ok(violations)
    }
}
