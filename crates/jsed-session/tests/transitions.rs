//! Integration tests: mode switching between the schema representations
//! and validation from the session.

use jsed_core::{AdditionalProperties, PathSegment, PrimitiveType, NodePath, TypeTags};
use jsed_session::{EditorMode, EditorSession, SchemaSource, SessionError};

fn object_session() -> EditorSession {
    let mut session = EditorSession::default();
    session
        .edit(|t| {
            t.with_types(Some(TypeTags::single(PrimitiveType::Object)))
                .map_object(|o| {
                    Ok(o.with_property("age")?
                        .with_property_required(0, true)?
                        .with_additional_properties(AdditionalProperties::Forbidden))
                })
        })
        .unwrap();
    let age = NodePath::root().child(PathSegment::Property(0));
    session
        .edit_at(&age, |n| Ok(n.with_types(Some(TypeTags::single(PrimitiveType::Integer)))))
        .unwrap();
    session
}

#[test]
fn test_builder_text_builder_round_trip() {
    let mut session = object_session();
    let before = session.tree().clone();

    session.switch_mode(EditorMode::SchemaText).unwrap();
    assert!(session.schema_text().contains("\"additionalProperties\": false"));

    session.switch_mode(EditorMode::Builder).unwrap();
    // The text was not edited, so the tree is not reparsed.
    assert_eq!(*session.tree(), before);
    assert!(!session.transition_log()[1].converted);
}

#[test]
fn test_text_edit_is_loaded_into_builder() {
    let mut session = EditorSession::default();
    session.switch_mode(EditorMode::SchemaText).unwrap();
    session.set_schema_text(r#"{"type": ["string", "null"], "title": "Nick"}"#);
    session.switch_mode(EditorMode::Builder).unwrap();

    assert_eq!(session.tree().title, "Nick");
    assert!(session.tree().has_type(PrimitiveType::Null));
    assert_eq!(session.schema_source(), SchemaSource::Builder);

    // Loading text is undoable like any other tree change.
    assert!(session.undo().unwrap());
    assert_eq!(session.tree().title, "");
}

#[test]
fn test_invalid_schema_text_blocks_switch() {
    let mut session = EditorSession::default();
    session.switch_mode(EditorMode::SchemaText).unwrap();
    session.set_schema_text("{\"type\": ");
    let err = session.switch_mode(EditorMode::Builder).unwrap_err();
    assert!(matches!(
        err,
        SessionError::SchemaText {
            from: EditorMode::SchemaText,
            to: EditorMode::Builder,
            ..
        }
    ));
    assert_eq!(session.mode(), EditorMode::SchemaText);
    assert_eq!(session.schema_text(), "{\"type\": ");
    assert_eq!(session.schema_source(), SchemaSource::Text);
}

#[test]
fn test_json_input_does_not_convert() {
    let mut session = object_session();
    session.switch_mode(EditorMode::JsonInput).unwrap();
    assert!(session.schema_text().is_empty());
    assert!(!session.transition_log()[0].converted);

    // Leaving json-input for schema-text renders the still-newer tree.
    session.switch_mode(EditorMode::SchemaText).unwrap();
    assert!(session.schema_text().contains("\"required\""));
    assert!(session.transition_log()[1].converted);
}

#[test]
fn test_validate_against_builder_tree() {
    let mut session = object_session();
    session.set_data_text(r#"{"age": 3}"#);
    assert!(session.validate().is_empty());

    session.set_data_text(r#"{"age": 3.5, "extra": 1}"#);
    let mut errors = session.validate();
    errors.sort();
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert_eq!(errors[1], "must NOT have additional properties: 'extra'");
    assert!(errors[0].starts_with("'#/properties/age/type': "), "{errors:?}");
}

#[test]
fn test_validate_against_edited_text() {
    let mut session = object_session();
    session.switch_mode(EditorMode::SchemaText).unwrap();
    session.set_schema_text(r#"{"$schema": "https://json-schema.org/draft/2020-12/schema", "type": "integer"}"#);
    session.set_data_text("3.5");
    assert_eq!(session.validate().len(), 1);
    session.set_data_text("3");
    assert!(session.validate().is_empty());
}

#[test]
fn test_validate_reports_uncompilable_text() {
    let mut session = EditorSession::default();
    session.set_schema_text(r#"{"type": 12}"#);
    session.set_data_text("1");
    let errors = session.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Invalid schema: "), "{errors:?}");
}
