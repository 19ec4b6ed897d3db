//! # Validate Subcommand
//!
//! Validates a data document against a schema through an editor session,
//! so the output is exactly what the editor's error pane would show.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jsed_schema::load_text;
use jsed_session::{EditorSession, SessionConfig};

/// Arguments for the `jsed validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Data document to validate (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the data is valid, 1 when it is not.
pub fn run_validate(args: &ValidateArgs, config: SessionConfig) -> Result<u8> {
    let errors = validation_messages(args, config)?;
    if errors.is_empty() {
        println!("JSON is valid");
        return Ok(0);
    }
    for error in &errors {
        println!("{error}");
    }
    tracing::info!(count = errors.len(), "validation failed");
    Ok(1)
}

/// Normalized validation messages for the files in `args`. Empty means valid.
///
/// Malformed JSON in either file is a validation message, not an error.
///
/// # Errors
///
/// Fails when a file cannot be read, or a YAML file cannot be parsed.
pub fn validation_messages(args: &ValidateArgs, config: SessionConfig) -> Result<Vec<String>> {
    let schema_text = load_text(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    let data_text = load_text(&args.data)
        .with_context(|| format!("failed to load data {}", args.data.display()))?;

    let mut session = EditorSession::new(config);
    session.set_schema_text(schema_text);
    session.set_data_text(data_text);
    Ok(session.validate())
}
