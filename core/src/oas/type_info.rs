#![deny(missing_docs)]

//! # Type Information
//!
//! Flattens the `type`, `nullable`, `anyOf` and `oneOf` keywords of a schema into
//! a set of primitive type names, a nullability flag and the composition keyword
//! that produced the set.

use crate::oas::schema_node::{SchemaNode, TypeDecl};
use indexmap::IndexSet;
use std::fmt;

/// The composition keyword a [`TypeInfo`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combiner {
    /// `anyOf`
    AnyOf,
    /// `oneOf`
    OneOf,
}

impl fmt::Display for Combiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combiner::AnyOf => f.write_str("anyOf"),
            Combiner::OneOf => f.write_str("oneOf"),
        }
    }
}

/// Effective typing of a schema, derived fresh for every comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeInfo {
    /// Distinct type names in discovery order.
    pub types: IndexSet<String>,
    /// Whether `null` is an accepted value.
    pub is_nullable: bool,
    /// Which composition keyword, if any, contributed the types.
    pub combiner: Option<Combiner>,
}

impl TypeInfo {
    /// Computes the type information of a schema node.
    ///
    /// - `type: T` contributes `T` as-is.
    /// - `type: [T, "null"]` contributes `T` and marks the schema nullable.
    /// - `nullable: true` marks the schema nullable.
    /// - `anyOf` (or else `oneOf`) unions the types and nullability of every branch.
    ///
    /// `allOf` is not inspected.
    pub fn of(schema: SchemaNode<'_>) -> Self {
        let mut info = TypeInfo::default();

        match schema.type_decl() {
            TypeDecl::Single(t) => {
                info.types.insert(t.to_string());
            }
            TypeDecl::Union(types) => {
                for t in types {
                    if t == "null" {
                        info.is_nullable = true;
                    } else {
                        info.types.insert(t.to_string());
                    }
                }
            }
            TypeDecl::Absent => {}
        }

        if schema.nullable_flag() {
            info.is_nullable = true;
        }

        let composition = if schema.has("anyOf") {
            Some((Combiner::AnyOf, schema.branches("anyOf")))
        } else if schema.has("oneOf") {
            Some((Combiner::OneOf, schema.branches("oneOf")))
        } else {
            None
        };

        if let Some((combiner, branches)) = composition {
            info.combiner = Some(combiner);
            for branch in branches.unwrap_or_default() {
                let sub = TypeInfo::of(SchemaNode::new(branch));
                info.types.extend(sub.types);
                if sub.is_nullable {
                    info.is_nullable = true;
                }
            }
        }

        info
    }

    /// Decides whether `self` (the actual schema) narrows `expected`.
    ///
    /// Nullability is deliberately left to the caller.
    pub fn is_compatible_with(&self, expected: &TypeInfo) -> bool {
        if let (Some(actual), Some(wanted)) = (self.combiner, expected.combiner) {
            if actual != wanted {
                return false;
            }
        }

        if !self.types.iter().all(|t| expected.types.contains(t)) {
            return false;
        }

        // Implied by the subset test while `types` is a set.
        self.types.len() <= expected.types.len()
    }

    /// The type names joined for messages, e.g. `string or null`.
    pub fn describe(&self) -> String {
        self.types
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}
