//! # Editor Modes
//!
//! ```text
//! schema-text ◀──render── builder
//!      │                     ▲
//!      └───────parse─────────┘
//!
//! json-input: entered and left without conversion
//! ```
//!
//! Any mode may switch to any other. Converting between the two schema
//! representations happens only when entering a schema mode whose
//! representation is stale; see [`SchemaSource`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The pane the user is working in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorMode {
    /// Raw JSON Schema text.
    SchemaText,
    /// The visual tree builder.
    Builder,
    /// The data document to validate.
    JsonInput,
}

impl EditorMode {
    /// Canonical mode name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SchemaText => "schema-text",
            Self::Builder => "builder",
            Self::JsonInput => "json-input",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which schema representation holds the latest edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaSource {
    /// The builder tree; schema text is stale.
    Builder,
    /// The schema text; the tree is stale.
    Text,
    /// The text was rendered from the tree and has not been edited since.
    Synced,
}

/// Record of one mode switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Mode before the switch.
    pub from_mode: EditorMode,
    /// Mode after the switch.
    pub to_mode: EditorMode,
    /// When the switch happened (UTC).
    pub timestamp: DateTime<Utc>,
    /// Whether the schema was converted between representations.
    pub converted: bool,
}
