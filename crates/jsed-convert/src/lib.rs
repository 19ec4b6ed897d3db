//! # jsed-convert — Tree / JSON Schema Conversion
//!
//! Two pure functions connect the builder's tree to JSON Schema text:
//!
//! - [`to_json_schema`] — tree to JSON value. Fails only when a stored
//!   literal (`const`, `enum`, `default`, `examples`) is not valid JSON.
//! - [`from_json_schema`] — JSON value to tree. Never fails; keywords the
//!   tree cannot represent are dropped.
//!
//! [`render`] holds the text side: pretty rendering of a converted schema
//! and the editor's beautify action.
//!
//! ## Round Trip
//!
//! For trees built from supported fields, converting to JSON and back
//! reproduces every populated field. Known asymmetries:
//!
//! - A `reference` node emits no `type`, so its tags come back unconstrained.
//! - An array without `items` comes back with the initial schema as items.
//! - Only the authoritative combinator list is emitted; a combinator node
//!   with no branches emits no combinator keyword and comes back simple.
//! - Constraint bags of tags not in `type` are not emitted.
//!
//! Converting a second time is stable: `to(from(to(t))) == to(t)`.
//!
//! ## Crate Policy
//!
//! - `$ref` strings are copied, never followed.
//! - Object keys keep insertion order (`serde_json` `preserve_order`).

pub mod emit;
pub mod error;
pub mod parse;
pub mod render;

pub use emit::to_json_schema;
pub use error::ConvertError;
pub use parse::from_json_schema;
pub use render::{beautify, render_pretty, DEFAULT_INDENT};
