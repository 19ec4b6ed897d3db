//! # Conversion Errors

use jsed_core::{LiteralError, NodePath};
use thiserror::Error;

/// Error converting a tree to JSON Schema.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A stored literal is not valid JSON.
    #[error("invalid literal at {path}: {source}")]
    Literal {
        /// Node holding the literal, relative to the converted root.
        path: NodePath,
        /// The literal failure.
        #[source]
        source: LiteralError,
    },
}
