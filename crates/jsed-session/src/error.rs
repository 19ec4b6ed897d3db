//! # Session Errors
//!
//! A failed session operation leaves the session exactly as it was.

use thiserror::Error;

use jsed_convert::ConvertError;
use jsed_core::EditError;

use crate::mode::EditorMode;

/// Errors from editor session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The builder tree could not be rendered as schema text.
    #[error("cannot switch from {from} to {to}: {source}")]
    Render {
        /// Mode before the attempted switch.
        from: EditorMode,
        /// Requested mode.
        to: EditorMode,
        /// Conversion failure.
        #[source]
        source: ConvertError,
    },

    /// The schema text could not be loaded into the builder.
    #[error("cannot switch from {from} to {to}: Invalid schema JSON: {source}")]
    SchemaText {
        /// Mode before the attempted switch.
        from: EditorMode,
        /// Requested mode.
        to: EditorMode,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Text to beautify is not JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The operation needs a different mode.
    #[error("{operation} requires {required} mode (current mode: {current})")]
    WrongMode {
        /// Rejected operation.
        operation: &'static str,
        /// Mode the operation needs.
        required: EditorMode,
        /// Mode the session is in.
        current: EditorMode,
    },

    /// A builder edit was rejected.
    #[error(transparent)]
    Edit(#[from] EditError),
}
