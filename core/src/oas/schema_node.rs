#![deny(missing_docs)]

//! # Schema Node Accessors
//!
//! A borrowed, read-only view over a raw JSON value that is treated as an
//! OpenAPI Schema Object. The linted documents are arbitrary user input, so the
//! accessors never fail: a keyword of the wrong shape reads as absent.

use serde_json::{Map, Value};

/// JSON truthiness as used by rule options and keyword presence checks.
///
/// `null`, `false`, `0`, `""` are falsy; every array and object is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The shape of the `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl<'a> {
    /// No usable `type` keyword.
    Absent,
    /// `type: string`
    Single(&'a str),
    /// `type: [string, "null"]` (OAS 3.1)
    Union(Vec<&'a str>),
}

/// Read-only view of a Schema Object.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a>(&'a Value);

impl<'a> SchemaNode<'a> {
    /// Wraps a raw value.
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// The underlying value.
    pub fn value(&self) -> &'a Value {
        self.0
    }

    /// Raw keyword lookup. Non-object nodes have no keywords.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    /// True if the keyword is present with a truthy value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// The `type` keyword.
    pub fn type_decl(&self) -> TypeDecl<'a> {
        match self.get("type") {
            Some(Value::String(s)) if !s.is_empty() => TypeDecl::Single(s),
            Some(Value::Array(items)) => {
                TypeDecl::Union(items.iter().filter_map(Value::as_str).collect())
            }
            _ => TypeDecl::Absent,
        }
    }

    /// The `type` keyword when it is a single type name.
    pub fn type_name(&self) -> Option<&'a str> {
        self.get("type").and_then(Value::as_str)
    }

    /// True if `nullable: true` (OAS 3.0).
    pub fn nullable_flag(&self) -> bool {
        matches!(self.get("nullable"), Some(Value::Bool(true)))
    }

    /// Branches of a composition keyword (`anyOf`, `oneOf`, `allOf`).
    pub fn branches(&self, keyword: &str) -> Option<&'a [Value]> {
        self.get(keyword).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// The `properties` map.
    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.get("properties").and_then(Value::as_object)
    }

    /// A single property schema. A `null` or `false` entry counts as missing.
    pub fn property(&self, name: &str) -> Option<SchemaNode<'a>> {
        self.properties()
            .and_then(|props| props.get(name))
            .filter(|v| is_truthy(v))
            .map(SchemaNode::new)
    }

    /// Names listed under `required`. Non-string entries are ignored.
    pub fn required(&self) -> Vec<&'a str> {
        self.get("required")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The `enum` list when it is an array.
    pub fn enum_values(&self) -> Option<&'a [Value]> {
        self.get("enum").and_then(Value::as_array).map(Vec::as_slice)
    }

    /// The `pattern` keyword when it is a non-empty string.
    pub fn pattern(&self) -> Option<&'a str> {
        self.get("pattern")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
    }

    /// A numeric constraint keyword (`minLength`, `maximum`, ...).
    ///
    /// Non-numeric values are treated as undefined.
    pub fn constraint(&self, key: &str) -> Option<&'a serde_json::Number> {
        match self.get(key) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// The `items` schema when it is an object.
    pub fn items(&self) -> Option<SchemaNode<'a>> {
        self.get("items")
            .filter(|v| v.is_object())
            .map(SchemaNode::new)
    }

    /// The `$ref` string.
    pub fn reference(&self) -> Option<&'a str> {
        self.get("$ref")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_decl_variants() {
        let single = json!({ "type": "string" });
        let union = json!({ "type": ["string", "null"] });
        let yaml_null: Value = serde_yaml::from_str("type: null").unwrap();

        assert_eq!(SchemaNode::new(&single).type_decl(), TypeDecl::Single("string"));
        assert_eq!(
            SchemaNode::new(&union).type_decl(),
            TypeDecl::Union(vec!["string", "null"])
        );
        assert_eq!(SchemaNode::new(&yaml_null).type_decl(), TypeDecl::Absent);
    }

    #[test]
    fn test_required_and_properties() {
        let v = json!({
            "required": ["a", 3, "b"],
            "properties": { "a": { "type": "string" }, "b": null }
        });
        let node = SchemaNode::new(&v);
        assert_eq!(node.required(), vec!["a", "b"]);
        assert!(node.property("a").is_some());
        assert!(node.property("b").is_none());
        assert!(node.property("c").is_none());
    }

    #[test]
    fn test_non_object_node_reads_as_empty() {
        let v = json!(true);
        let node = SchemaNode::new(&v);
        assert!(node.properties().is_none());
        assert!(node.required().is_empty());
        assert_eq!(node.type_decl(), TypeDecl::Absent);
        assert!(node.reference().is_none());
    }

    #[test]
    fn test_constraint_ignores_non_numbers() {
        let v = json!({ "minLength": 3, "maxLength": "10" });
        let node = SchemaNode::new(&v);
        assert_eq!(node.constraint("minLength").and_then(|n| n.as_u64()), Some(3));
        assert!(node.constraint("maxLength").is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
