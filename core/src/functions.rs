#![deny(missing_docs)]

//! # Rule Functions
//!
//! Defines the `RuleFunction` trait shared by every custom function a ruleset can
//! name in its `then.function`, and the `FunctionRegistry` that resolves those
//! names.
//!
//! Every function follows the engine's calling convention: the value found at the
//! matched location, the rule's `functionOptions`, and a [`RuleContext`].

pub mod casing;
pub mod length;
pub mod path_segments;
pub mod probable_verbs;
pub mod property_names;
pub mod response_structure;
pub mod schema_examples;
pub mod schema_matches_schema;
pub mod summary;
pub mod truthy;

use crate::document::RuleContext;
use crate::error::{AppError, AppResult};
use crate::violation::Violation;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// A custom rule function.
///
/// Implementors inspect a document fragment and report zero or more violations.
/// Document problems are violations; `Err` is reserved for misconfiguration such
/// as options that do not match the function's option schema.
pub trait RuleFunction: Send + Sync {
    /// The name rulesets refer to this function by.
    fn name(&self) -> &'static str;

    /// Runs the function on `target`.
    ///
    /// # Arguments
    ///
    /// * `target` - The value at the matched location (or its selected `field`).
    /// * `options` - The rule's `functionOptions` (`null` when omitted).
    /// * `ctx` - The document and path of the matched location.
    fn run(
        &self,
        target: &Value,
        options: &Value,
        ctx: &RuleContext<'_>,
    ) -> AppResult<Vec<Violation>>;
}

/// Deserializes function options, treating `null` as "all defaults".
pub(crate) fn parse_options<T>(function: &str, options: &Value) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(options.clone()).map_err(|e| {
        AppError::Config(format!("Invalid options for function '{}': {}", function, e))
    })
}

/// Name -> implementation lookup for rule functions.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<&'static str, Box<dyn RuleFunction>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every function shipped with this crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(schema_matches_schema::SchemaMatchesSchema);
        registry.register(response_structure::InternalErrorResponseStructure);
        registry.register(response_structure::ProblemDetailsResponseStructure);
        registry.register(property_names::NoEmptyPropertyNames);
        registry.register(schema_examples::Oas30SchemaRequiresExample);
        registry.register(schema_examples::Oas31SchemaRequiresExample);
        registry.register(schema_examples::Oas31PreferExamplesOverExample);
        registry.register(path_segments::PathSegmentsKebabCase);
        registry.register(path_segments::PathSegmentsNoVerbsBlacklist);
        registry.register(probable_verbs::PathSegmentsNoVerbsProbable::default());
        registry.register(summary::SummaryShorterThanDescription);
        registry.register(summary::SummaryNoMarkdownSingleLine);
        registry.register(casing::Casing);
        registry.register(length::Length);
        registry.register(truthy::Truthy);
        registry
    }

    /// Adds (or replaces) a function under its own name.
    pub fn register<F: RuleFunction + 'static>(&mut self, function: F) {
        self.functions.insert(function.name(), Box::new(function));
    }

    /// Looks a function up by name.
    pub fn get(&self, name: &str) -> Option<&dyn RuleFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    /// Whether a function is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    /// Invokes the function registered as `name`.
    pub fn invoke(
        &self,
        name: &str,
        target: &Value,
        options: &Value,
        ctx: &RuleContext<'_>,
    ) -> AppResult<Vec<Violation>> {
        let function = self
            .get(name)
            .ok_or_else(|| AppError::Config(format!("Unknown rule function '{}'", name)))?;
        function.run(target, options, ctx)
    }
}
