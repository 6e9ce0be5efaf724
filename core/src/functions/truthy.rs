#![deny(missing_docs)]

//! # Truthy
//!
//! Generic `truthy` function: the selected value must exist and be neither
//! `false`, `0`, `""` nor `null`.

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::RuleFunction;
use crate::oas::schema_node::is_truthy;
use crate::violation::Violation;
use serde_json::Value;

/// `truthy`
#[derive(Debug, Clone, Copy, Default)]
pub struct Truthy;

impl RuleFunction for Truthy {
    fn name(&self) -> &'static str {
        "truthy"
    }

    fn run(&self, target: &Value, _: &Value, ctx: &RuleContext<'_>) -> AppResult<Vec<Violation>> {
        if is_truthy(target) {
            return Ok(Vec::new());
        }
        let field = ctx.last_key().unwrap_or("value");
        Ok(vec![Violation::new(format!(
            "'{}' property must be truthy",
            field
        ))])
    }
}
