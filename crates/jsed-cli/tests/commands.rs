//! End-to-end tests of the `jsed` binary: output and exit codes.

use std::io::Write;
use std::process::{Command, Output};

fn jsed(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jsed"))
        .args(args)
        .output()
        .unwrap()
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.display().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_validate_valid_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_file(&dir, "s.json", r#"{"type": "integer"}"#);
    let data = write_file(&dir, "d.json", "3");
    let out = jsed(&["validate", "--schema", &schema, "--data", &data]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out).trim(), "JSON is valid");
}

#[test]
fn test_validate_invalid_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_file(
        &dir,
        "s.json",
        r#"{"$schema": "https://json-schema.org/draft/2020-12/schema", "type": "integer"}"#,
    );
    let data = write_file(&dir, "d.json", "3.5");
    let out = jsed(&["validate", "--schema", &schema, "--data", &data]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("'#/type': "), "{}", stdout(&out));
}

#[test]
fn test_missing_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "d.json", "1");
    let missing = dir.path().join("missing.json").display().to_string();
    let out = jsed(&["validate", "--schema", &missing, "--data", &data]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_normalize_uses_config_indent() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(&dir, "jsed.yaml", "indent_width: 2\n");
    let schema = write_file(&dir, "s.json", r#"{"type": "boolean", "not": {}}"#);
    let out = jsed(&["--config", &config, "normalize", &schema]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "{\n  \"type\": \"boolean\"\n}\n");
}

#[test]
fn test_bad_config_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(&dir, "jsed.yaml", "tabs: true\n");
    let schema = write_file(&dir, "s.json", "{}");
    let out = jsed(&["--config", &config, "dialect", &schema]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_dialect_output() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_file(
        &dir,
        "s.yaml",
        "$schema: http://json-schema.org/draft-06/schema#\ntype: string\n",
    );
    let out = jsed(&["dialect", &schema]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out).trim(), "draft-06");
}

#[test]
fn test_beautify_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "d.json", r#"{"a":true}"#);
    let out = jsed(&["beautify", &file]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "{\n    \"a\": true\n}\n");
}
