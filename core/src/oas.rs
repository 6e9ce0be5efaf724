#![deny(missing_docs)]

//! # OpenAPI Document Model
//!
//! - **pointer**: local `$ref` / JSON Pointer resolution.
//! - **schema_node**: read-only accessors over raw Schema Objects.
//! - **type_info**: effective type sets and the narrowing compatibility test.

pub mod pointer;
pub mod schema_node;
pub mod type_info;

pub use pointer::{ref_to_path, resolve_json_pointer, resolve_path};
pub use schema_node::{SchemaNode, TypeDecl};
pub use type_info::{Combiner, TypeInfo};
