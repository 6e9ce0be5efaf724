#![deny(missing_docs)]

//! # Casing
//!
//! Generic `casing` function: asserts a string follows a naming convention.

use crate::document::RuleContext;
use crate::error::{AppError, AppResult};
use crate::functions::{parse_options, RuleFunction};
use crate::violation::Violation;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Supported naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    /// `flatcase`
    Flat,
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `kebab-case`
    Kebab,
    /// `COBOL-CASE`
    Cobol,
    /// `snake_case`
    Snake,
    /// `MACRO_CASE`
    Macro,
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseType::Flat => "flat",
            CaseType::Camel => "camel",
            CaseType::Pascal => "pascal",
            CaseType::Kebab => "kebab",
            CaseType::Cobol => "cobol",
            CaseType::Snake => "snake",
            CaseType::Macro => "macro",
        };
        f.write_str(name)
    }
}

impl CaseType {
    /// Anchored pattern for this convention. `D` in the templates stands for the
    /// digit class, which is empty when digits are disallowed.
    fn pattern(self, allow_digits: bool) -> String {
        let template = match self {
            CaseType::Flat => "[a-z][a-zD]*",
            CaseType::Camel => "[a-z][a-zD]*(?:[A-ZD](?:[a-zD]+|$))*",
            CaseType::Pascal => "[A-Z][a-zD]*(?:[A-ZD](?:[a-zD]+|$))*",
            CaseType::Kebab => "[a-z][a-zD]*(?:-[a-zD]+)*",
            CaseType::Cobol => "[A-Z][A-ZD]*(?:-[A-ZD]+)*",
            CaseType::Snake => "[a-z][a-zD]*(?:_[a-zD]+)*",
            CaseType::Macro => "[A-Z][A-ZD]*(?:_[A-ZD]+)*",
        };
        let digits = if allow_digits { "0-9" } else { "" };
        format!("^(?:{})$", template.replace('D', digits))
    }

    /// Whether `value` follows this convention.
    pub fn matches(self, value: &str, allow_digits: bool) -> bool {
        Regex::new(&self.pattern(allow_digits))
            .map(|re| re.is_match(value))
            .unwrap_or(false)
    }
}

/// Options of `casing`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasingOptions {
    /// Required convention.
    #[serde(rename = "type")]
    pub case_type: Option<CaseType>,
    /// Reject digits anywhere in the value.
    pub disallow_digits: bool,
}

/// `casing`
#[derive(Debug, Clone, Copy, Default)]
pub struct Casing;

impl RuleFunction for Casing {
    fn name(&self) -> &'static str {
        "casing"
    }

    fn run(&self, target: &Value, options: &Value, _: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        let options: CasingOptions = parse_options(self.name(), options)?;
        let case_type = options
            .case_type
            .ok_or_else(|| AppError::Config("Function 'casing' requires a 'type' option".into()))?;

        let Some(value) = target.as_str() else {
            return Ok(Vec::new());
        };
        if value.is_empty() || case_type.matches(value, !options.disallow_digits) {
            return Ok(Vec::new());
        }
        Ok(vec![Violation::new(format!(
            "'{}' is not {} case",
            value, case_type
        ))])
    }
}
