//! # jsed-session — Editor Session
//!
//! The state the editor keeps between user actions: the builder tree, the
//! schema text, the data pane and the active mode.
//!
//! ## Modes
//!
//! - `schema-text` edits raw JSON Schema.
//! - `builder` edits the tree through persistent edit operations.
//! - `json-input` edits the data document validated against the schema.
//!
//! Entering `schema-text` renders the tree when the text is stale;
//! entering `builder` parses the text only when it was edited after the
//! last render. A failed
//! conversion leaves the session untouched and reports a
//! [`SessionError`].

pub mod config;
pub mod error;
pub mod mode;
pub mod session;

pub use config::{SessionConfig, DEFAULT_HISTORY_LIMIT};
pub use error::SessionError;
pub use mode::{EditorMode, SchemaSource, TransitionRecord};
pub use session::EditorSession;
