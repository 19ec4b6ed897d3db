//! Integration tests: tree -> JSON Schema -> tree round trips.
//!
//! Trees built only from fields the builder supports come back equal after a
//! round trip. Second-pass emission is always stable, including for
//! arbitrary source documents the builder only partially understands.

use jsed_convert::{from_json_schema, to_json_schema};
use jsed_core::{
    AdditionalProperties, CombinatorTag, NodePath, NodeType, PathSegment, PrimitiveType,
    SchemaNode, Specification, StringConstraints, TypeTags,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn typed(tags: &[PrimitiveType]) -> SchemaNode {
    SchemaNode::unconstrained().with_types(TypeTags::new(tags.iter().copied()))
}

fn round_trip(tree: &SchemaNode) -> SchemaNode {
    let json = to_json_schema(tree, true).expect("tree converts");
    from_json_schema(&json)
}

fn assert_idempotent(tree: &SchemaNode) {
    let first = to_json_schema(tree, true).expect("tree converts");
    let second = to_json_schema(&from_json_schema(&first), true).expect("reparsed tree converts");
    assert_eq!(first, second);
}

/// A person record exercising most of the builder's fields.
fn person() -> SchemaNode {
    let name = typed(&[PrimitiveType::String])
        .with_title("Name")
        .map_string(|s| StringConstraints {
            min_length: Some(1),
            max_length: Some(64),
            ..s.clone()
        })
        .unwrap();
    let age = typed(&[PrimitiveType::Integer, PrimitiveType::Null])
        .map_numeric(|n| n.with_minimum(Some(0.0)).with_maximum(Some(150.0)))
        .unwrap()
        .with_default(Some("18".into()))
        .unwrap();
    let tags = typed(&[PrimitiveType::Array])
        .map_array(|a| a.with_items(typed(&[PrimitiveType::String])))
        .unwrap();
    let address = SchemaNode::unconstrained()
        .with_specification(Specification::Reference("#/$defs/Address".into()))
        .unwrap();

    let address_def = typed(&[PrimitiveType::Object])
        .map_object(|o| {
            Ok(o.with_property("street")?
                .with_property_schema(0, typed(&[PrimitiveType::String]))?
                .with_additional_properties(AdditionalProperties::Forbidden))
        })
        .unwrap();

    typed(&[PrimitiveType::Object])
        .with_title("Person")
        .with_description("A person record")
        .with_dialect(Some("https://json-schema.org/draft/2020-12/schema".into()))
        .with_id(Some("https://example.com/person.schema.json".into()))
        .map_object(|o| {
            Ok(o.with_property("name")?
                .with_property_schema(0, name)?
                .with_property_required(0, true)?
                .with_property("age")?
                .with_property_schema(1, age)?
                .with_property("tags")?
                .with_property_schema(2, tags)?
                .with_property("address")?
                .with_property_schema(3, address)?
                .with_pattern_property("^x-")?
                .with_pattern_schema(0, typed(&[PrimitiveType::Boolean]))?
                .with_additional_properties(AdditionalProperties::Allowed))
        })
        .unwrap()
        .with_definition_inserted("Address", address_def)
        .unwrap()
}

#[test]
fn test_person_round_trip_is_exact() {
    let tree = person();
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn test_person_emission() {
    let json = to_json_schema(&person(), true).unwrap();
    assert_eq!(
        json,
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$id": "https://example.com/person.schema.json",
            "title": "Person",
            "description": "A person record",
            "type": "object",
            "additionalProperties": true,
            "properties": {
                "name": {"title": "Name", "type": "string", "minLength": 1, "maxLength": 64},
                "age": {"type": ["integer", "null"], "default": 18, "minimum": 0, "maximum": 150},
                "tags": {"type": "array", "items": {"type": "string"}},
                "address": {"$ref": "#/$defs/Address"}
            },
            "required": ["name"],
            "patternProperties": {"^x-": {"type": "boolean"}},
            "$defs": {
                "Address": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {"street": {"type": "string"}}
                }
            }
        })
    );
}

#[test]
fn test_person_is_idempotent() {
    assert_idempotent(&person());
}

#[test]
fn test_const_and_enum_round_trip() {
    let tree = typed(&[PrimitiveType::String])
        .with_specification(Specification::Enum(vec!["\"a\"".into(), "\"b\"".into()]))
        .unwrap();
    assert_eq!(round_trip(&tree), tree);

    let tree = typed(&[PrimitiveType::Object])
        .with_specification(Specification::Const(r#"{"k":[1,2]}"#.into()))
        .unwrap();
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn test_reference_drops_type_on_round_trip() {
    let tree = typed(&[PrimitiveType::String])
        .with_specification(Specification::Reference("#/$defs/Foo".into()))
        .unwrap();
    let json = to_json_schema(&tree, true).unwrap();
    assert_eq!(json, json!({"$ref": "#/$defs/Foo"}));
    let back = from_json_schema(&json);
    assert_eq!(back.types, None);
    assert_eq!(
        back.simple().unwrap().specification,
        Specification::Reference("#/$defs/Foo".into())
    );
}

#[test]
fn test_combinator_round_trip() {
    let tree = SchemaNode::unconstrained()
        .with_node_type(NodeType::Combinator(CombinatorTag::AnyOf))
        .with_branch_added()
        .unwrap()
        .with_branch_added()
        .unwrap()
        .with_branch(1, typed(&[PrimitiveType::Null]))
        .unwrap();
    let back = round_trip(&tree);
    assert_eq!(back.node_type(), NodeType::Combinator(CombinatorTag::AnyOf));
    assert_eq!(back.combinator().unwrap().children().len(), 2);
    assert_idempotent(&tree);
}

#[test]
fn test_non_designated_lists_survive_parse_but_not_emission() {
    let source = json!({
        "oneOf": [{"type": "string"}],
        "allOf": [{"type": "integer"}]
    });
    let tree = from_json_schema(&source);
    let emitted = to_json_schema(&tree, true).unwrap();
    assert_eq!(emitted, json!({"oneOf": [{"type": "string"}]}));

    let switched = tree.with_node_type(NodeType::Combinator(CombinatorTag::AllOf));
    let emitted = to_json_schema(&switched, true).unwrap();
    assert_eq!(emitted, json!({"allOf": [{"type": "integer"}]}));
}

#[test]
fn test_defaults_survive_normalization() {
    for source in [
        json!({"type": ["integer", "null"], "default": null}),
        json!({"type": ["boolean", "null"], "default": null}),
        json!({"type": ["string", "null"], "default": null}),
        json!({"type": "string", "default": 5}),
        json!({"type": ["null", "number"], "default": 2.5}),
        json!({"type": "boolean", "default": false}),
    ] {
        let emitted = to_json_schema(&from_json_schema(&source), true).unwrap();
        assert_eq!(emitted, source);
    }
}

#[test]
fn test_empty_combinator_is_idempotent() {
    let source = json!({"type": "array", "oneOf": []});
    let emitted = to_json_schema(&from_json_schema(&source), true).unwrap();
    assert_eq!(emitted, source);
    assert_idempotent(&from_json_schema(&source));
}

#[test]
fn test_boolean_items_do_not_become_string_items() {
    let source = json!({"type": "array", "items": true});
    let emitted = to_json_schema(&from_json_schema(&source), true).unwrap();
    assert_eq!(emitted, json!({"type": "array", "items": {}}));
}

#[test]
fn test_definitions_absent_vs_empty() {
    let none = from_json_schema(&json!({"type": "string"}));
    assert!(none.definitions.is_none());
    let json = to_json_schema(&none, true).unwrap();
    assert!(json.get("$defs").is_none());
}

#[test]
fn test_nested_edit_then_round_trip() {
    let tree = person();
    let path = NodePath::root()
        .child(PathSegment::Property(2))
        .child(PathSegment::Items);
    let tree = tree
        .update_at(&path, |n| {
            n.with_specification(Specification::Enum(vec!["\"red\"".into()]))
        })
        .unwrap();
    let json = to_json_schema(&tree, true).unwrap();
    assert_eq!(
        json["properties"]["tags"]["items"],
        json!({"type": "string", "enum": ["red"]})
    );
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn test_foreign_keywords_are_dropped() {
    let source = json!({
        "type": "object",
        "dependentRequired": {"a": ["b"]},
        "unevaluatedProperties": false,
        "properties": {"a": {"type": "string", "contentEncoding": "base64"}}
    });
    let json = to_json_schema(&from_json_schema(&source), true).unwrap();
    assert_eq!(
        json,
        json!({"type": "object", "properties": {"a": {"type": "string"}}})
    );
}

// ─── Property tests ──────────────────────────────────────────────────

fn type_name() -> impl Strategy<Value = Value> {
    prop::sample::select(vec![
        "string", "boolean", "number", "integer", "object", "array", "null", "bogus",
    ])
    .prop_map(|s| Value::String(s.to_string()))
}

fn literal() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
    ]
}

fn annotation_keyword() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        type_name().prop_map(|t| ("type".to_string(), t)),
        prop::collection::vec(type_name(), 0..4).prop_map(|t| ("type".to_string(), Value::Array(t))),
        "[A-Za-z ]{0,10}".prop_map(|s| ("title".to_string(), Value::String(s))),
        "[A-Za-z ]{0,10}".prop_map(|s| ("description".to_string(), Value::String(s))),
        literal().prop_map(|v| ("const".to_string(), v)),
        prop::collection::vec(literal(), 0..4).prop_map(|v| ("enum".to_string(), Value::Array(v))),
        literal().prop_map(|v| ("default".to_string(), v)),
        prop::collection::vec(literal(), 0..3).prop_map(|v| ("examples".to_string(), Value::Array(v))),
        "#/\\$defs/[A-Z][a-z]{0,4}".prop_map(|s| ("$ref".to_string(), Value::String(s))),
    ]
}

fn constraint_keyword() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        (0u64..20).prop_map(|n| ("minLength".to_string(), json!(n))),
        (0u64..20).prop_map(|n| ("maxItems".to_string(), json!(n))),
        (-50i64..50).prop_map(|n| ("minimum".to_string(), json!(n))),
        (-50i64..50).prop_map(|n| ("maximum".to_string(), json!(n))),
        (1i64..10).prop_map(|n| ("multipleOf".to_string(), json!(n))),
        any::<bool>().prop_map(|b| ("additionalProperties".to_string(), Value::Bool(b))),
        prop::collection::vec("[a-c]", 0..3).prop_map(|names| {
            let names = names.into_iter().map(Value::String).collect();
            ("required".to_string(), Value::Array(names))
        }),
    ]
}

fn keyword() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![annotation_keyword(), constraint_keyword()]
}

fn flat_schema() -> impl Strategy<Value = Value> {
    prop::collection::vec(keyword(), 0..8).prop_map(|entries| {
        let map: Map<String, Value> = entries.into_iter().collect();
        Value::Object(map)
    })
}

fn schema() -> impl Strategy<Value = Value> {
    flat_schema().prop_recursive(3, 32, 4, |inner| {
        (
            flat_schema(),
            prop::collection::btree_map("[a-c]", inner.clone(), 0..3),
            prop::option::of(inner.clone()),
            prop::option::of((
                prop::sample::select(vec!["oneOf", "anyOf", "allOf"]),
                prop::collection::vec(inner.clone(), 0..3),
            )),
            prop::collection::btree_map("[A-C]", inner, 0..2),
        )
            .prop_map(|(base, properties, items, combinator, defs)| {
                let mut map = match base {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                if !properties.is_empty() {
                    map.insert("properties".into(), Value::Object(properties.into_iter().collect()));
                }
                if let Some(items) = items {
                    map.insert("items".into(), items);
                }
                if let Some((keyword, branches)) = combinator {
                    map.insert(keyword.into(), Value::Array(branches));
                }
                if !defs.is_empty() {
                    map.insert("$defs".into(), Value::Object(defs.into_iter().collect()));
                }
                Value::Object(map)
            })
    })
}

proptest! {
    /// `to(from(to(t))) == to(t)` for trees parsed from arbitrary documents.
    #[test]
    fn emission_is_idempotent(source in schema()) {
        let tree = from_json_schema(&source);
        // Parsed literals are always valid JSON, so emission cannot fail.
        let first = to_json_schema(&tree, true);
        prop_assert!(first.is_ok(), "first pass failed: {:?}", first.err());
        let first = first.unwrap();
        let second = to_json_schema(&from_json_schema(&first), true);
        prop_assert!(second.is_ok(), "second pass failed: {:?}", second.err());
        prop_assert_eq!(second.unwrap(), first);
    }

    /// Parsing never panics, whatever the document shape.
    #[test]
    fn parsing_accepts_any_document(source in schema()) {
        let tree = from_json_schema(&source);
        prop_assert!(tree.definitions.as_ref().map_or(true, |d| !d.is_empty()));
    }
}
