use oas_lint_core::violation::path_of;
use oas_lint_core::{
    check_schema, Document, JsonPath, PathSegment, RuleContext, SchemaMatchOptions, Violation,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

const DOCUMENT: &str = r#"
openapi: 3.1.0
info:
  title: Orders
  version: 1.0.0
paths:
  /orders:
    get:
      responses:
        '200':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
    post:
      responses:
        '201':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
components:
  schemas:
    Order:
      type: object
      required: [id]
      properties:
        id:
          type: string
        status:
          type: string
          enum: [open, closed, lost]
        total:
          type: number
          minimum: -1
"#;

fn expected_order() -> Value {
    json!({
        "type": "object",
        "required": ["id", "status"],
        "properties": {
            "id": { "type": "string" },
            "status": { "type": "string", "enum": ["open", "closed"] },
            "total": { "type": "number", "minimum": 0 }
        }
    })
}

fn schema_path(method: &str, status: &str) -> Vec<PathSegment> {
    path_of([
        "paths",
        "/orders",
        method,
        "responses",
        status,
        "content",
        "application/json",
        "schema",
    ])
}

fn run(doc: &Document, method: &str, status: &str, options: &SchemaMatchOptions) -> Vec<Violation> {
    let path = schema_path(method, status);
    let target = oas_lint_core::oas::resolve_path(doc.data(), &path).unwrap();
    check_schema(target, options, &RuleContext::new(doc, path))
}

fn at(suffix: &[&str]) -> Option<JsonPath> {
    let mut path = path_of(["components", "schemas", "Order"]);
    path.extend(path_of(suffix.iter().copied()));
    Some(path)
}

#[test]
fn test_reference_reported_at_component_once_per_document() {
    let doc = Document::from_yaml(DOCUMENT).unwrap();
    let options = SchemaMatchOptions::new(expected_order(), "Order");

    let first = run(&doc, "get", "200", &options);

    assert_eq!(
        first,
        vec![
            Violation {
                message: "Required property 'status' in Order must remain required (cannot become optional)".into(),
                path: at(&["required"]),
            },
            Violation {
                message: "Property 'status' enum contains extra values not allowed in Order: \"lost\"".into(),
                path: at(&["properties", "status"]),
            },
            Violation {
                message: "Property at components/schemas/Order/properties/total has minimum -1 which is less restrictive than expected 0".into(),
                path: at(&["properties", "total"]),
            },
        ]
    );

    assert!(run(&doc, "post", "201", &options).is_empty());
    assert!(doc.is_ref_validated("Order", "#/components/schemas/Order"));

    let other = Document::from_yaml(DOCUMENT).unwrap();
    assert_eq!(run(&other, "post", "201", &options).len(), 3);
}

#[test]
fn test_unresolvable_reference() {
    let doc = Document::from_yaml(
        r#"
openapi: 3.1.0
paths:
  /orders:
    get:
      responses:
        '200':
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Missing'
"#,
    )
    .unwrap();
    let out = run(&doc, "get", "200", &SchemaMatchOptions::new(expected_order(), "Order"));
    assert_eq!(
        out,
        vec![Violation {
            message: "Unable to resolve schema reference: #/components/schemas/Missing".into(),
            path: Some(schema_path("get", "200")),
        }]
    );
}

#[test]
fn test_missing_expected_schema() {
    let doc = Document::from_yaml(DOCUMENT).unwrap();
    let out = run(&doc, "get", "200", &SchemaMatchOptions::default());
    assert_eq!(
        out,
        vec![Violation::new("Function misconfigured: expectedSchema is required")]
    );
    assert!(!doc.is_ref_validated("Order", "#/components/schemas/Order"));
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured_debug_output(debug: bool) -> String {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .finish();

    let doc = Document::from_yaml(DOCUMENT).unwrap();
    let mut options = SchemaMatchOptions::new(expected_order(), "Order");
    options.debug = debug;
    tracing::subscriber::with_default(subscriber, || {
        run(&doc, "get", "200", &options);
    });

    let bytes = sink.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_debug_option_gates_trace_output() {
    let enabled = captured_debug_output(true);
    assert!(enabled.contains("Detected $ref: #/components/schemas/Order"), "{enabled}");
    assert!(enabled.contains("oas3-schema-matches-schema"), "{enabled}");

    let disabled = captured_debug_output(false);
    assert!(!disabled.contains("Detected $ref"), "{disabled}");
}
