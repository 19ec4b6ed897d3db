//! # Document Loading
//!
//! Reads schema and data documents from disk. Files ending in `.yaml` or
//! `.yml` are parsed as YAML and converted to the equivalent JSON value;
//! everything else is parsed as JSON.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// A document could not be loaded.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path of the document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid for its format.
    #[error("cannot parse '{path}': {reason}")]
    Parse {
        /// Path of the document.
        path: String,
        /// Parser message.
        reason: String,
    },
}

/// Whether `path` names a YAML document.
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Read a document as raw text, converting YAML to JSON text.
///
/// # Errors
///
/// Returns `DocumentError` when the file cannot be read or parsed.
pub fn load_text(path: &Path) -> Result<String, DocumentError> {
    let content = read(path)?;
    if is_yaml(path) {
        let value = parse_yaml(path, &content)?;
        Ok(value.to_string())
    } else {
        Ok(content)
    }
}

/// Read and parse a document.
///
/// # Errors
///
/// Returns `DocumentError` when the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = read(path)?;
    if is_yaml(path) {
        parse_yaml(path, &content)
    } else {
        serde_json::from_str(&content).map_err(|e| DocumentError::Parse {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }
}

fn read(path: &Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_yaml(path: &Path, content: &str) -> Result<Value, DocumentError> {
    let parse_error = |reason: String| DocumentError::Parse {
        path: path.display().to_string(),
        reason,
    };
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| parse_error(format!("invalid YAML: {e}")))?;
    yaml_to_json(&yaml).map_err(|e| parse_error(e.to_string()))
}

// ─── YAML to JSON ──────────────────────────────────────────────────

/// A YAML value with no JSON equivalent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("YAML value at '#{pointer}' has no JSON form: {reason}")]
pub struct YamlConversionError {
    /// JSON Pointer to the offending value.
    pub pointer: String,
    /// What could not be converted.
    pub reason: String,
}

/// Convert a parsed YAML document into the JSON value a schema or data
/// pane would hold.
///
/// Scalar mapping keys become their text, so `200:` under `properties`
/// names the property `"200"`. Two keys with the same text, a non-scalar
/// key, or a non-finite number are rejected with the pointer of the
/// failing value. Tags are ignored.
///
/// # Errors
///
/// Returns `YamlConversionError` for the first value with no JSON form.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, YamlConversionError> {
    convert(yaml, &mut Vec::new())
}

fn convert(
    yaml: &serde_yaml::Value,
    pointer: &mut Vec<String>,
) -> Result<Value, YamlConversionError> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Number(n) => {
            number(n).ok_or_else(|| failure(pointer, format!("number {n} is not finite")))
        }
        Yaml::Tagged(tagged) => convert(&tagged.value, pointer),
        Yaml::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                pointer.push(i.to_string());
                out.push(convert(item, pointer)?);
                pointer.pop();
            }
            Ok(Value::Array(out))
        }
        Yaml::Mapping(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                let key = mapping_key(key)
                    .ok_or_else(|| failure(pointer, "mapping key is not a scalar".to_string()))?;
                if out.contains_key(&key) {
                    return Err(failure(pointer, format!("key '{key}' appears twice")));
                }
                pointer.push(key.clone());
                let converted = convert(value, pointer)?;
                pointer.pop();
                out.insert(key, converted);
            }
            Ok(Value::Object(out))
        }
    }
}

fn number(n: &serde_yaml::Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        Some(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(Value::from(u))
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64).map(Value::Number)
    }
}

fn mapping_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => mapping_key(&tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

fn failure(pointer: &[String], reason: String) -> YamlConversionError {
    let pointer = pointer
        .iter()
        .map(|seg| format!("/{}", seg.replace('~', "~0").replace('/', "~1")))
        .collect();
    YamlConversionError { pointer, reason }
}
