//! Integration tests: dialect dispatch and message normalization through
//! the text-level `validate` entry point.

use jsed_schema::{validate, Dialect};
use serde_json::json;

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";
const DRAFT_2019_09: &str = "https://json-schema.org/draft/2019-09/schema";

#[test]
fn test_2020_12_integer_rejects_fraction() {
    let schema = json!({"$schema": DRAFT_2020_12, "type": "integer"}).to_string();
    let errors = validate(&schema, "3.5");
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.contains("integer")), "{errors:?}");
    assert!(errors[0].starts_with("'#/type': "), "{errors:?}");
}

#[test]
fn test_2020_12_integer_accepts_integer() {
    let schema = json!({"$schema": DRAFT_2020_12, "type": "integer"}).to_string();
    assert!(validate(&schema, "3").is_empty());
}

#[test]
fn test_2019_09_enforces_dependent_required() {
    let with_dialect = json!({
        "$schema": DRAFT_2019_09,
        "dependentRequired": {"card": ["billing"]}
    })
    .to_string();
    let errors = validate(&with_dialect, r#"{"card": 1}"#);
    assert_eq!(errors.len(), 1, "{errors:?}");

    // The default engine predates the keyword and ignores it.
    let without_dialect = json!({"dependentRequired": {"card": ["billing"]}}).to_string();
    assert!(validate(&without_dialect, r#"{"card": 1}"#).is_empty());
}

#[test]
fn test_declared_draft_06_compiles_with_draft_06_engine() {
    let schema = json!({
        "$schema": "http://json-schema.org/draft-06/schema#",
        "type": "number",
        "exclusiveMinimum": 0
    });
    assert_eq!(Dialect::detect(&schema), Dialect::Draft6);
    let schema = schema.to_string();
    assert!(validate(&schema, "0.5").is_empty());
    assert_eq!(validate(&schema, "0").len(), 1);
}

#[test]
fn test_formats_asserted_in_every_dialect() {
    for dialect in [None, Some(DRAFT_2019_09), Some(DRAFT_2020_12)] {
        let mut schema = json!({"type": "string", "format": "email"});
        if let Some(uri) = dialect {
            schema["$schema"] = json!(uri);
        }
        let schema = schema.to_string();
        assert_eq!(validate(&schema, r#""not-an-email""#).len(), 1, "{dialect:?}");
        assert!(validate(&schema, r#""a@example.com""#).is_empty(), "{dialect:?}");
    }
}

#[test]
fn test_additional_property_messages() {
    let schema = json!({
        "$schema": DRAFT_2020_12,
        "type": "object",
        "properties": {"name": {"type": "string"}},
        "additionalProperties": false
    })
    .to_string();
    let errors = validate(&schema, r#"{"name": "x", "extra": true}"#);
    assert_eq!(errors, vec!["must NOT have additional properties: 'extra'"]);
}

#[test]
fn test_local_definitions_resolve() {
    let schema = json!({
        "$schema": DRAFT_2020_12,
        "type": "object",
        "properties": {"home": {"$ref": "#/$defs/Address"}},
        "$defs": {
            "Address": {
                "type": "object",
                "properties": {"zip": {"type": "string", "pattern": "^[0-9]{5}$"}},
                "required": ["zip"]
            }
        }
    })
    .to_string();
    assert!(validate(&schema, r#"{"home": {"zip": "12345"}}"#).is_empty());
    let errors = validate(&schema, r#"{"home": {"zip": "12"}}"#);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("pattern"), "{errors:?}");
}

#[test]
fn test_self_referencing_schema_validates() {
    let schema = json!({
        "$schema": DRAFT_2020_12,
        "$defs": {
            "Node": {
                "type": "object",
                "properties": {
                    "children": {"type": "array", "items": {"$ref": "#/$defs/Node"}}
                }
            }
        },
        "$ref": "#/$defs/Node"
    })
    .to_string();
    assert!(validate(&schema, r#"{"children": [{"children": []}]}"#).is_empty());
    assert_eq!(validate(&schema, r#"{"children": [{"children": 1}]}"#).len(), 1);
}

#[test]
fn test_external_reference_is_a_schema_error() {
    let schema = json!({"$ref": "https://example.invalid/other.schema.json"}).to_string();
    let errors = validate(&schema, "1");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Invalid schema: "), "{errors:?}");
}

#[test]
fn test_parse_failures_are_single_messages() {
    let data_error = validate(r#"{"type": "string"}"#, "{");
    assert_eq!(data_error.len(), 1);
    assert!(data_error[0].starts_with("Invalid JSON: "));

    let schema_error = validate("[", r#""ok""#);
    assert_eq!(schema_error.len(), 1);
    assert!(schema_error[0].starts_with("Invalid schema JSON: "));
}
