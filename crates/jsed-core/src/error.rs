//! # Error Types
//!
//! Errors raised by the tree model. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Literal errors name the site (`const`, `enum[i]`, `default`,
//!   `examples[i]`) so the caller can point the user at the broken field.
//! - Edit errors carry the operation and the offending index or name.

use std::fmt;

use thiserror::Error;

/// Location of a JSON literal inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralSite {
    /// The `const` value.
    Const,
    /// An entry of the `enum` list.
    Enum(usize),
    /// The `default` value.
    Default,
    /// An entry of the `examples` list.
    Examples(usize),
}

impl fmt::Display for LiteralSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const => f.write_str("const"),
            Self::Enum(i) => write!(f, "enum[{i}]"),
            Self::Default => f.write_str("default"),
            Self::Examples(i) => write!(f, "examples[{i}]"),
        }
    }
}

/// A stored literal could not be turned back into a JSON value.
#[derive(Error, Debug)]
pub enum LiteralError {
    /// The text is not valid JSON.
    #[error("invalid JSON in {site}: {source}")]
    Malformed {
        /// Where the literal lives.
        site: LiteralSite,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A numeric default holds something other than a JSON number.
    #[error("{site} value {literal:?} is not a number")]
    NotANumber {
        /// Where the literal lives.
        site: LiteralSite,
        /// The offending text.
        literal: String,
    },
}

impl LiteralError {
    /// The literal site that failed.
    pub fn site(&self) -> LiteralSite {
        match self {
            Self::Malformed { site, .. } | Self::NotANumber { site, .. } => *site,
        }
    }
}

/// A builder edit was rejected. The input tree is never modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The edit only applies to simple nodes.
    #[error("{operation} requires a simple node")]
    NotSimple {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The edit only applies to combinator nodes.
    #[error("{operation} requires a combinator node")]
    NotCombinator {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The node's type does not include the tag owning these constraints.
    #[error("node has no {group} constraints; add the matching type first")]
    MissingConstraints {
        /// Constraint group (`string`, `numeric`, `object`, `array`).
        group: &'static str,
    },

    /// A list index is past the end of the list.
    #[error("{list} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Which list was indexed.
        list: &'static str,
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// No definition with the given name exists.
    #[error("definition '{0}' not found")]
    UnknownDefinition(String),

    /// A definition with the given name already exists.
    #[error("definition '{0}' already exists")]
    DuplicateDefinition(String),

    /// Another entry of the same object already uses this key.
    #[error("{list} already contains '{name}'")]
    DuplicateKey {
        /// `properties` or `patternProperties`.
        list: &'static str,
        /// The rejected key.
        name: String,
    },

    /// Definition names must be non-empty.
    #[error("definition name must not be empty")]
    EmptyDefinitionName,
}
