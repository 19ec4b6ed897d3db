//! # Editor Session
//!
//! Holds both schema representations (builder tree and schema text), the
//! data pane, the current mode and the undo history.
//!
//! ## Invariants
//!
//! - A failed operation changes nothing: mode, tree, text and history are
//!   left as they were.
//! - The tree is replaced wholesale on every edit; the previous tree goes
//!   to the history, bounded by `history_limit`.
//! - Validation uses whichever schema representation holds the latest
//!   edits ([`SchemaSource`]).
//! - Schema text is parsed into the tree only when it was edited after the
//!   last render, so an unedited round trip keeps the tree as it was.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use jsed_convert::{beautify, from_json_schema, render_pretty, to_json_schema};
use jsed_core::{EditError, NodePath, SchemaNode};
use jsed_schema::{validate_value, SchemaValidationError};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::mode::{EditorMode, SchemaSource, TransitionRecord};

/// One editing session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: SessionConfig,
    mode: EditorMode,
    source: SchemaSource,
    tree: Arc<SchemaNode>,
    schema_text: String,
    data_text: String,
    history: VecDeque<Arc<SchemaNode>>,
    transition_log: Vec<TransitionRecord>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditorSession {
    /// Start in builder mode with the initial schema and empty panes.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            mode: EditorMode::Builder,
            source: SchemaSource::Builder,
            tree: Arc::new(SchemaNode::initial()),
            schema_text: String::new(),
            data_text: String::new(),
            history: VecDeque::new(),
            transition_log: Vec::new(),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Which representation holds the latest schema edits.
    pub fn schema_source(&self) -> SchemaSource {
        self.source
    }

    /// The builder tree.
    pub fn tree(&self) -> &SchemaNode {
        &self.tree
    }

    /// Shared handle to the builder tree.
    pub fn tree_handle(&self) -> Arc<SchemaNode> {
        Arc::clone(&self.tree)
    }

    /// The schema text pane.
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    /// The data pane.
    pub fn data_text(&self) -> &str {
        &self.data_text
    }

    /// Every successful mode switch, oldest first.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    /// Number of trees available to [`undo`](Self::undo).
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ─── Mode switching ──────────────────────────────────────────────

    /// Switch to `to`, converting the schema if the target representation
    /// is stale.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Render` when a stored literal in the tree is
    /// not JSON, or `SessionError::SchemaText` when the schema text is not
    /// JSON. The session is unchanged in both cases.
    pub fn switch_mode(&mut self, to: EditorMode) -> Result<(), SessionError> {
        let from = self.mode;
        if from == to {
            return Ok(());
        }

        let converted = match (to, self.source) {
            (EditorMode::SchemaText, SchemaSource::Builder) => {
                self.schema_text = self.render_tree(from, to)?;
                self.source = SchemaSource::Synced;
                true
            }
            (EditorMode::Builder, SchemaSource::Text) => {
                let json: Value = serde_json::from_str(&self.schema_text).map_err(|source| {
                    tracing::warn!(%from, %to, error = %source, "schema text is not JSON");
                    SessionError::SchemaText { from, to, source }
                })?;
                self.replace_tree(from_json_schema(&json));
                self.source = SchemaSource::Builder;
                true
            }
            _ => false,
        };

        self.mode = to;
        self.transition_log.push(TransitionRecord {
            from_mode: from,
            to_mode: to,
            timestamp: Utc::now(),
            converted,
        });
        tracing::debug!(%from, %to, converted, "switched editor mode");
        Ok(())
    }

    fn render_tree(&self, from: EditorMode, to: EditorMode) -> Result<String, SessionError> {
        let json = to_json_schema(&self.tree, true).map_err(|source| {
            tracing::warn!(%from, %to, error = %source, "tree cannot be rendered");
            SessionError::Render { from, to, source }
        })?;
        Ok(render_pretty(&json, self.config.indent_width))
    }

    // ─── Builder edits ───────────────────────────────────────────────

    /// Apply a builder edit to the whole tree.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongMode` outside builder mode, or the
    /// edit's own error.
    pub fn edit(
        &mut self,
        f: impl FnOnce(&SchemaNode) -> Result<SchemaNode, EditError>,
    ) -> Result<(), SessionError> {
        self.require_mode("edit", EditorMode::Builder)?;
        let next = f(self.tree.as_ref())?;
        self.replace_tree(next);
        self.source = SchemaSource::Builder;
        Ok(())
    }

    /// Apply a builder edit to the node at `path`.
    ///
    /// # Errors
    ///
    /// As [`edit`](Self::edit), plus `EditError::IndexOutOfRange` when the
    /// path does not resolve.
    pub fn edit_at(
        &mut self,
        path: &NodePath,
        f: impl FnOnce(&SchemaNode) -> Result<SchemaNode, EditError>,
    ) -> Result<(), SessionError> {
        self.edit(|tree| tree.update_at(path, f))
    }

    /// Restore the tree before the last edit or text load.
    ///
    /// Returns `false` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongMode` outside builder mode.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        self.require_mode("undo", EditorMode::Builder)?;
        match self.history.pop_back() {
            Some(previous) => {
                self.tree = previous;
                self.source = SchemaSource::Builder;
                tracing::debug!(remaining = self.history.len(), "undid tree edit");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn replace_tree(&mut self, next: SchemaNode) {
        if self.config.history_limit > 0 {
            self.history.push_back(Arc::clone(&self.tree));
            while self.history.len() > self.config.history_limit {
                self.history.pop_front();
            }
        }
        self.tree = Arc::new(next);
    }

    fn require_mode(&self, operation: &'static str, required: EditorMode) -> Result<(), SessionError> {
        if self.mode == required {
            Ok(())
        } else {
            Err(SessionError::WrongMode {
                operation,
                required,
                current: self.mode,
            })
        }
    }

    // ─── Text panes ──────────────────────────────────────────────────

    /// Replace the schema text. The text becomes the latest schema.
    pub fn set_schema_text(&mut self, text: impl Into<String>) {
        self.schema_text = text.into();
        self.source = SchemaSource::Text;
    }

    /// Replace the data text.
    pub fn set_data_text(&mut self, text: impl Into<String>) {
        self.data_text = text.into();
    }

    /// Re-indent the data pane.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidJson` and keeps the text when it is
    /// not JSON.
    pub fn beautify_data(&mut self) -> Result<(), SessionError> {
        self.data_text =
            beautify(&self.data_text, self.config.indent_width).map_err(SessionError::InvalidJson)?;
        Ok(())
    }

    /// Re-indent the schema text pane.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidJson` and keeps the text when it is
    /// not JSON.
    pub fn beautify_schema_text(&mut self) -> Result<(), SessionError> {
        self.schema_text = beautify(&self.schema_text, self.config.indent_width)
            .map_err(SessionError::InvalidJson)?;
        Ok(())
    }

    // ─── Validation ──────────────────────────────────────────────────

    /// Validate the data pane against the latest schema.
    ///
    /// Never fails: an empty list means valid. The data is parsed first,
    /// so malformed data is reported even when the schema is also broken.
    pub fn validate(&self) -> Vec<String> {
        let data: Value = match serde_json::from_str(&self.data_text) {
            Ok(data) => data,
            Err(e) => return vec![SchemaValidationError::DataParse(e).to_string()],
        };
        let schema = match self.source {
            SchemaSource::Builder | SchemaSource::Synced => {
                match to_json_schema(&self.tree, true) {
                    Ok(schema) => schema,
                    Err(e) => return vec![format!("Invalid schema: {e}")],
                }
            }
            SchemaSource::Text => match serde_json::from_str(&self.schema_text) {
                Ok(schema) => schema,
                Err(e) => return vec![SchemaValidationError::SchemaParse(e).to_string()],
            },
        };
        match validate_value(&schema, &data) {
            Ok(violations) => violations.messages(),
            Err(e) => vec![e.to_string()],
        }
    }
}
