//! # Text Rendering
//!
//! Pretty printing with a configurable indent width. The editor's schema
//! and data panes both use it.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Indent width used by the editor panes.
pub const DEFAULT_INDENT: usize = 4;

/// Render `value` as indented JSON text.
pub fn render_pretty(value: &Value, indent: usize) -> String {
    let pad = vec![b' '; indent];
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&pad));
    // Writing a `Value` into a `Vec` cannot fail.
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Re-indent JSON text, keeping key order.
///
/// # Errors
///
/// Returns the parser error when `text` is not valid JSON; the caller keeps
/// the original text in that case.
pub fn beautify(text: &str, indent: usize) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(render_pretty(&value, indent))
}
