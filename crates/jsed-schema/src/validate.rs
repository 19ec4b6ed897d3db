//! # Validation
//!
//! Validates a data document against a schema document. The schema is
//! compiled on every call; schemas change between edits, so nothing is
//! cached.
//!
//! ## Error Normalization
//!
//! Each raw validator error becomes one display string:
//!
//! - an unexpected property: `must NOT have additional properties: '<name>'`,
//!   one string per property;
//! - otherwise, with a schema location: `'#<schema path>': <message>`;
//! - otherwise the bare message.
//!
//! Parse and compile failures are never raised to the caller of
//! [`validate`]; they become a single message instead.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::dialect::Dialect;

/// Message used for each unexpected property.
const ADDITIONAL_PROPERTY_MESSAGE: &str = "must NOT have additional properties";

/// Failure before validation could run.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The data text is not JSON.
    #[error("Invalid JSON: {0}")]
    DataParse(#[source] serde_json::Error),

    /// The schema text is not JSON.
    #[error("Invalid schema JSON: {0}")]
    SchemaParse(#[source] serde_json::Error),

    /// The schema does not compile under its dialect.
    #[error("Invalid schema: {reason}")]
    Compile {
        /// Dialect the schema was compiled with.
        dialect: Dialect,
        /// Compiler message.
        reason: String,
    },
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the failing value in the data.
    pub instance_path: String,
    /// JSON Pointer to the failing keyword in the schema.
    pub schema_path: String,
    /// Validator message.
    pub message: String,
    /// The unexpected property, for additional-property failures.
    pub property: Option<String>,
}

impl Violation {
    /// Normalize one raw validator error. Additional-property errors
    /// expand to one violation per unexpected property.
    fn from_error(error: &ValidationError<'_>) -> Vec<Self> {
        let instance_path = error.instance_path.to_string();
        let schema_path = error.schema_path.to_string();
        match &error.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
                .iter()
                .map(|name| Self {
                    instance_path: instance_path.clone(),
                    schema_path: schema_path.clone(),
                    message: ADDITIONAL_PROPERTY_MESSAGE.to_string(),
                    property: Some(name.clone()),
                })
                .collect(),
            // A `false` subschema under `additionalProperties` fails on the
            // property value itself; the name is the last instance segment.
            _ if schema_path.ends_with("/additionalProperties") => {
                let split = split_last_segment(&instance_path)
                    .map(|(parent, name)| (parent.to_string(), name));
                match split {
                    Some((parent, name)) => vec![Self {
                        instance_path: parent,
                        schema_path,
                        message: ADDITIONAL_PROPERTY_MESSAGE.to_string(),
                        property: Some(name),
                    }],
                    None => vec![Self {
                        instance_path,
                        schema_path,
                        message: error.to_string(),
                        property: None,
                    }],
                }
            }
            _ => vec![Self {
                instance_path,
                schema_path,
                message: error.to_string(),
                property: None,
            }],
        }
    }
}

/// Split a JSON Pointer into its parent pointer and unescaped last segment.
fn split_last_segment(pointer: &str) -> Option<(&str, String)> {
    let (parent, last) = pointer.rsplit_once('/')?;
    Some((parent, last.replace("~1", "/").replace("~0", "~")))
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "{}: '{property}'", self.message),
            None if !self.schema_path.is_empty() => {
                write!(f, "'#{}': {}", self.schema_path, self.message)
            }
            None => f.write_str(&self.message),
        }
    }
}

/// All violations of one validation run. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether the data is valid.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations in validator order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Display strings, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::to_string).collect()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compile a schema with the engine its `$schema` selects.
///
/// # Errors
///
/// Returns `SchemaValidationError::Compile` when the schema violates its
/// dialect's meta-schema or references an external resource.
pub fn compile(schema: &Value) -> Result<Validator, SchemaValidationError> {
    let dialect = Dialect::detect(schema);
    dialect.options().build(schema).map_err(|e| {
        tracing::warn!(dialect = %dialect, error = %e, "schema failed to compile");
        SchemaValidationError::Compile {
            dialect,
            reason: e.to_string(),
        }
    })
}

/// Validate parsed data against a parsed schema.
///
/// # Errors
///
/// Returns `SchemaValidationError::Compile` when the schema does not
/// compile. Data that fails validation is not an error.
pub fn validate_value(
    schema: &Value,
    data: &Value,
) -> Result<ValidationViolations, SchemaValidationError> {
    let validator = compile(schema)?;
    let violations: Vec<Violation> = validator
        .iter_errors(data)
        .flat_map(|e| Violation::from_error(&e))
        .collect();
    tracing::debug!(violations = violations.len(), "validated document");
    Ok(ValidationViolations { violations })
}

/// Validate data text against schema text.
///
/// # Errors
///
/// Returns `DataParse` or `SchemaParse` for text that is not JSON (data is
/// checked first), or `Compile` for a schema that does not compile.
pub fn validate_text(
    schema_text: &str,
    data_text: &str,
) -> Result<ValidationViolations, SchemaValidationError> {
    let data: Value = serde_json::from_str(data_text).map_err(SchemaValidationError::DataParse)?;
    let schema: Value =
        serde_json::from_str(schema_text).map_err(SchemaValidationError::SchemaParse)?;
    validate_value(&schema, &data)
}

/// Validate data text against schema text, returning display strings.
///
/// Never fails: an empty list means valid, and a parse or compile failure
/// is reported as a single message.
pub fn validate(schema_text: &str, data_text: &str) -> Vec<String> {
    match validate_text(schema_text, data_text) {
        Ok(violations) => violations.messages(),
        Err(e) => vec![e.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document_has_no_violations() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "integer"}}});
        let result = validate_value(&schema, &json!({"a": 1})).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_type_violation_carries_schema_path() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "integer"}}});
        let result = validate_value(&schema, &json!({"a": "x"})).unwrap();
        assert_eq!(result.len(), 1);
        let v = &result.violations()[0];
        assert_eq!(v.instance_path, "/a");
        assert_eq!(v.schema_path, "/properties/a/type");
        assert!(v.to_string().starts_with("'#/properties/a/type': "));
    }

    #[test]
    fn test_additional_properties_one_message_per_property() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {}},
            "additionalProperties": false
        });
        let result = validate_value(&schema, &json!({"a": 1, "x": 2, "y": 3})).unwrap();
        let mut messages = result.messages();
        messages.sort();
        assert_eq!(
            messages,
            vec![
                "must NOT have additional properties: 'x'",
                "must NOT have additional properties: 'y'",
            ]
        );
    }

    #[test]
    fn test_additional_properties_without_declared_properties() {
        let schema = json!({"type": "object", "additionalProperties": false});
        let result = validate_value(&schema, &json!({"x": 1, "a/b": 2})).unwrap();
        let mut messages = result.messages();
        messages.sort();
        assert_eq!(
            messages,
            vec![
                "must NOT have additional properties: 'a/b'",
                "must NOT have additional properties: 'x'",
            ]
        );
        assert!(result.violations().iter().all(|v| v.instance_path.is_empty()));
    }

    #[test]
    fn test_nested_additional_properties_reports_parent_path() {
        let schema = json!({
            "type": "object",
            "properties": {"inner": {"type": "object", "additionalProperties": false}}
        });
        let result = validate_value(&schema, &json!({"inner": {"y": true}})).unwrap();
        assert_eq!(result.len(), 1);
        let v = &result.violations()[0];
        assert_eq!(v.instance_path, "/inner");
        assert_eq!(v.property.as_deref(), Some("y"));
    }

    #[test]
    fn test_split_last_segment_unescapes() {
        assert_eq!(split_last_segment("/a/b~1c~0d"), Some(("/a", "b/c~d".to_string())));
        assert_eq!(split_last_segment(""), None);
    }

    #[test]
    fn test_violation_display_without_schema_path() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: String::new(),
            message: "boom".to_string(),
            property: None,
        };
        assert_eq!(v.to_string(), "boom");
    }

    #[test]
    fn test_data_is_parsed_before_schema() {
        let messages = validate("{not json", "{also not json");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Invalid JSON: "), "{messages:?}");
    }

    #[test]
    fn test_schema_parse_failure() {
        let messages = validate("{", "1");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Invalid schema JSON: "), "{messages:?}");
    }

    #[test]
    fn test_compile_failure() {
        let messages = validate(r#"{"type": 12}"#, "1");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Invalid schema: "), "{messages:?}");
    }

    #[test]
    fn test_compile_error_names_dialect() {
        let schema = json!({"$schema": "https://json-schema.org/draft/2020-12/schema", "minimum": "x"});
        let err = compile(&schema).unwrap_err();
        assert!(matches!(
            err,
            SchemaValidationError::Compile {
                dialect: Dialect::Draft202012,
                ..
            }
        ));
    }

    #[test]
    fn test_violations_display_joins_lines() {
        let schema = json!({"type": "array", "items": {"type": "string"}});
        let result = validate_value(&schema, &json!([1, 2])).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.to_string().lines().count(), 2);
    }
}
