//! # Session Configuration

use serde::{Deserialize, Serialize};

use jsed_convert::DEFAULT_INDENT;

/// Default number of trees kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Tunables for an [`EditorSession`](crate::EditorSession).
///
/// Every field has a default, so an empty document deserializes to
/// `SessionConfig::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Spaces per indent level for rendered schema text and beautified data.
    pub indent_width: usize,
    /// Maximum number of previous trees kept for undo. Zero disables undo.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
