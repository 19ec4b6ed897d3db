//! # jsed-schema — Dialect-Aware Validation
//!
//! Validates data documents against the schema being edited.
//!
//! - [`Dialect`] selects the validator engine from `$schema`: 2019-09 and
//!   2020-12 by exact URI, draft-07 for everything else (draft-06 when
//!   declared explicitly).
//! - [`validate`] is the editor's entry point: text in, display strings
//!   out, never failing.
//! - [`document`] loads JSON or YAML files for the command-line front end.
//!
//! ## Crate Policy
//!
//! - No compiled validator is cached; each call compiles the schema anew.
//! - `$ref` is resolved inside the document only. External references fail
//!   compilation instead of reaching the network.
//! - Format assertions are on for every dialect.

pub mod dialect;
pub mod document;
pub mod validate;

pub use dialect::Dialect;
pub use document::{load_document, load_text, yaml_to_json, DocumentError, YamlConversionError};
pub use validate::{
    compile, validate, validate_text, validate_value, SchemaValidationError,
    ValidationViolations, Violation,
};
