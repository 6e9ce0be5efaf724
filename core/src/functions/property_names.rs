#![deny(missing_docs)]

//! # Property Names
//!
//! Flags empty-string keys in a schema's `properties` map. Dynamic keys belong in
//! `additionalProperties`.
//!
//! Rules using this function should run on the unresolved document so that a
//! shared component is reported once, at its definition.

use crate::document::RuleContext;
use crate::error::AppResult;
use crate::functions::RuleFunction;
use crate::violation::{join_path, PathSegment, Violation};
use serde_json::Value;

/// `no-empty-property-names`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmptyPropertyNames;

impl RuleFunction for NoEmptyPropertyNames {
    fn name(&self) -> &'static str {
        "no-empty-property-names"
    }

    fn run(
        &self,
        target: &Value,
        _options: &Value,
        ctx: &RuleContext<'_>,
    ) -> AppResult<Vec<Violation>> {
        Ok(empty_property_names(target, ctx))
    }
}

/// One violation per empty key of the `properties` map at `ctx.path`.
pub fn empty_property_names(properties: &Value, ctx: &RuleContext<'_>) -> Vec<Violation> {
    let Some(map) = properties.as_object() else {
        return Vec::new();
    };

    map.keys()
        .filter(|k| k.is_empty())
        .map(|_| {
            let mut path = ctx.path.clone();
            path.push(PathSegment::from(""));
            Violation::at(
                format!(
                    "Empty string property name found in schema '{}'. Use 'additionalProperties' instead for dynamic or arbitrary keys.",
                    join_path(&ctx.path)
                ),
                path,
            )
        })
        .collect()
}
