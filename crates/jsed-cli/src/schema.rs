//! # Document Subcommands
//!
//! `normalize`, `beautify` and `dialect`: single-file commands that print a
//! result to stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use jsed_convert::{beautify, from_json_schema, render_pretty, to_json_schema};
use jsed_schema::{load_document, load_text, Dialect};
use jsed_session::SessionConfig;

/// A single input document.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Document path (JSON, or YAML for `.yaml`/`.yml`).
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

// ─── normalize ───────────────────────────────────────────────────────

/// Execute the normalize subcommand.
pub fn run_normalize(args: &FileArgs, config: SessionConfig) -> Result<u8> {
    println!("{}", normalize(&args.path, config.indent_width)?);
    Ok(0)
}

/// Load a schema into the builder tree and render it back.
///
/// The output holds only what the builder keeps.
///
/// # Errors
///
/// Fails when the file cannot be loaded or a stored literal is not JSON.
pub fn normalize(path: &Path, indent: usize) -> Result<String> {
    let schema = load_document(path)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    let tree = from_json_schema(&schema);
    let normalized = to_json_schema(&tree, true)
        .with_context(|| format!("failed to render schema {}", path.display()))?;
    Ok(render_pretty(&normalized, indent))
}

// ─── beautify ────────────────────────────────────────────────────────

/// Execute the beautify subcommand.
pub fn run_beautify(args: &FileArgs, config: SessionConfig) -> Result<u8> {
    println!("{}", beautify_file(&args.path, config.indent_width)?);
    Ok(0)
}

/// Pretty-print a document with `indent` spaces.
///
/// # Errors
///
/// Fails when the file cannot be read or is not JSON.
pub fn beautify_file(path: &Path, indent: usize) -> Result<String> {
    let text = load_text(path).with_context(|| format!("failed to load {}", path.display()))?;
    beautify(&text, indent).with_context(|| format!("Invalid JSON in {}", path.display()))
}

// ─── dialect ─────────────────────────────────────────────────────────

/// Execute the dialect subcommand.
pub fn run_dialect(args: &FileArgs) -> Result<u8> {
    println!("{}", detect_dialect(&args.path)?);
    Ok(0)
}

/// The validator dialect `path`'s schema dispatches to.
///
/// # Errors
///
/// Fails when the file cannot be loaded.
pub fn detect_dialect(path: &Path) -> Result<Dialect> {
    let schema = load_document(path)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    let dialect = Dialect::detect(&schema);
    tracing::debug!(%dialect, path = %path.display(), "detected dialect");
    Ok(dialect)
}
