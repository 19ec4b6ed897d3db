//! # jsed-cli — Command-Line Front End
//!
//! Runs the editor core on files instead of editor panes.
//!
//! ## Subcommands
//!
//! - `jsed validate --schema <file> --data <file>` — validate a data document.
//! - `jsed normalize <file>` — round-trip a schema through the builder tree.
//! - `jsed beautify <file>` — pretty-print a document.
//! - `jsed dialect <file>` — report which validator dialect a schema selects.
//!
//! Files ending in `.yaml` or `.yml` are read as YAML.
//!
//! ## Exit codes
//!
//! `0` success, `1` the data is invalid, `2` operational error (unreadable
//! file, malformed config, schema that cannot be rendered).

pub mod schema;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use jsed_session::SessionConfig;

/// Load the session configuration from a YAML file.
///
/// `None` yields the defaults.
///
/// # Errors
///
/// Fails when the file cannot be read or holds unknown or mistyped fields.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(SessionConfig::default());
    }
    let config: SessionConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::debug!(
        indent_width = config.indent_width,
        history_limit = config.history_limit,
        "loaded session config"
    );
    Ok(config)
}
