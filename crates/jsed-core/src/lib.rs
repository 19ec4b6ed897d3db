//! # jsed-core — Schema Tree Model
//!
//! This crate is the leaf of the editor workspace. It defines the in-memory
//! tree a schema builder manipulates, the helper pair that moves JSON
//! literals in and out of editable text, and the persistent edit operations
//! that produce a new tree for every builder action.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged node body.** A node is either `Simple` (type constraints,
//!    value specification, per-type constraint bags) or `Combinator`
//!    (`oneOf`/`anyOf`/`allOf` branches). The choice is made by matching on
//!    [`NodeKind`], never by looking up a field named after a runtime string.
//!
//! 2. **Literals are text.** `const`, `enum`, `default` and `examples`
//!    values are stored as JSON-encoded strings so any JSON value can be
//!    edited in a plain text field. Every parse of such text goes through
//!    [`literal::parse_literal`], so all four sites fail the same way.
//!
//! 3. **Persistent updates.** Child nodes are held behind `Arc`. Edits take
//!    `&SchemaNode` and return a new node that shares every untouched
//!    subtree, so the previous tree stays valid for undo and comparison.
//!
//! 4. **No eager dereferencing.** `$ref` strings are opaque text here.
//!    Cyclic schemas are representable because nothing in this crate
//!    follows a reference.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsed-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod constraints;
pub mod edit;
pub mod error;
pub mod literal;
pub mod node;

pub use constraints::{
    AdditionalProperties, ArrayConstraints, NumericConstraints, ObjectConstraints,
    PatternProperty, Property, StringConstraints,
};
pub use edit::{NodePath, PathSegment};
pub use error::{EditError, LiteralError, LiteralSite};
pub use literal::{parse_literal, parse_literal_list, parse_number_literal, stringify_literal};
pub use node::{
    Branches, CombinatorNode, CombinatorTag, DefaultValue, Definition, Definitions, NodeKind, NodeType,
    PrimitiveType, SchemaNode, SimpleFields, Specification, SpecificationMode, TypeTags,
};
