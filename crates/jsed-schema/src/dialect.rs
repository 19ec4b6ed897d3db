//! # Dialect Dispatch
//!
//! The validator engine is chosen from the schema's `$schema` keyword by
//! exact string match. Unrecognized or absent URIs fall back to the
//! draft-07 engine, which also serves draft-06 documents; a schema that
//! names the draft-06 meta-schema explicitly gets the draft-06 engine.
//!
//! Every engine asserts string formats (`email`, `uuid`, `date-time`, ...)
//! and resolves `$ref` offline only.

use std::fmt;

use jsonschema::{Draft, Retrieve, Uri, ValidationOptions};
use serde_json::Value;

const DRAFT_2019_09_URIS: &[&str] = &[
    "https://json-schema.org/draft/2019-09/schema",
    "http://json-schema.org/draft/2019-09/schema",
];

const DRAFT_2020_12_URIS: &[&str] = &[
    "https://json-schema.org/draft/2020-12/schema",
    "http://json-schema.org/draft/2020-12/schema",
];

const DRAFT_06_URIS: &[&str] = &[
    "http://json-schema.org/draft-06/schema#",
    "http://json-schema.org/draft-06/schema",
    "https://json-schema.org/draft-06/schema#",
    "https://json-schema.org/draft-06/schema",
];

/// Validator engine selected for a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Draft-06, only when declared explicitly.
    Draft6,
    /// Draft-07; the default engine.
    Draft7,
    /// Draft 2019-09.
    Draft201909,
    /// Draft 2020-12.
    Draft202012,
}

impl Dialect {
    /// Select the engine for a schema document.
    pub fn detect(schema: &Value) -> Self {
        let dialect = schema
            .get("$schema")
            .and_then(Value::as_str)
            .map_or(Self::Draft7, Self::from_uri);
        tracing::debug!(dialect = %dialect, "selected validator dialect");
        dialect
    }

    /// Select the engine for a `$schema` URI.
    pub fn from_uri(uri: &str) -> Self {
        if DRAFT_2020_12_URIS.contains(&uri) {
            Self::Draft202012
        } else if DRAFT_2019_09_URIS.contains(&uri) {
            Self::Draft201909
        } else if DRAFT_06_URIS.contains(&uri) {
            Self::Draft6
        } else {
            Self::Draft7
        }
    }

    /// The `jsonschema` draft backing this dialect.
    pub fn draft(&self) -> Draft {
        match self {
            Self::Draft6 => Draft::Draft6,
            Self::Draft7 => Draft::Draft7,
            Self::Draft201909 => Draft::Draft201909,
            Self::Draft202012 => Draft::Draft202012,
        }
    }

    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft6 => "draft-06",
            Self::Draft7 => "draft-07",
            Self::Draft201909 => "2019-09",
            Self::Draft202012 => "2020-12",
        }
    }

    /// Compilation options for this dialect.
    pub fn options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(self.draft())
            .should_validate_formats(true)
            .with_retriever(OfflineRetriever);
        opts
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Refuses every external resource so that `$ref` never reaches the network.
///
/// References inside the document (`#/$defs/...`) resolve without a
/// retriever; anything else fails compilation.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(uri = uri.as_str(), "refused to retrieve external schema");
        Err(format!("external reference '{}' cannot be resolved offline", uri.as_str()).into())
    }
}
