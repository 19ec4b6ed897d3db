//! # Literal Strings
//!
//! The builder stores `const`, `enum`, `default` and `examples` values as
//! JSON-encoded text. This module is the only place that text is parsed
//! or produced, so every site reports malformed input the same way.

use serde_json::Value;

use crate::error::{LiteralError, LiteralSite};

/// Parse a stored literal back into a JSON value.
///
/// # Errors
///
/// Returns `LiteralError::Malformed` when `text` is not valid JSON.
pub fn parse_literal(site: LiteralSite, text: &str) -> Result<Value, LiteralError> {
    serde_json::from_str(text).map_err(|source| LiteralError::Malformed { site, source })
}

/// Parse a literal that must be a JSON number (numeric defaults).
///
/// Surrounding whitespace is accepted.
///
/// # Errors
///
/// Returns `LiteralError::NotANumber` for any non-number value, including
/// text that is not JSON at all.
pub fn parse_number_literal(site: LiteralSite, text: &str) -> Result<Value, LiteralError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Number(_)) => Ok(value),
        _ => Err(LiteralError::NotANumber {
            site,
            literal: text.to_string(),
        }),
    }
}

/// Parse every non-empty literal of a list, preserving order.
///
/// Empty strings are skipped (they are blank rows in the editor), but the
/// site index reported on failure is the position in the original list.
///
/// # Errors
///
/// Returns the first `LiteralError` encountered.
pub fn parse_literal_list(
    site: fn(usize) -> LiteralSite,
    items: &[String],
) -> Result<Vec<Value>, LiteralError> {
    items
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(i, text)| parse_literal(site(i), text))
        .collect()
}

/// Encode a JSON value as compact literal text.
pub fn stringify_literal(value: &Value) -> String {
    value.to_string()
}
