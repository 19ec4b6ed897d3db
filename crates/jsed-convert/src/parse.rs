//! # JSON Schema to Tree
//!
//! Parsing never fails. Keywords outside the editor's vocabulary are
//! dropped, malformed keyword values are treated as absent, and a schema
//! that is not a JSON object becomes an unconstrained node.

use std::sync::Arc;

use serde_json::{Map, Value};

use jsed_core::{
    stringify_literal, AdditionalProperties, ArrayConstraints, Branches, CombinatorNode,
    CombinatorTag, DefaultValue, Definition, Definitions, NodeKind, NumericConstraints, ObjectConstraints,
    PatternProperty, PrimitiveType, Property, SchemaNode, SimpleFields, Specification,
    StringConstraints, TypeTags,
};

/// Convert a JSON Schema value to a tree.
///
/// When several combinator keywords are present, `oneOf` wins over `anyOf`,
/// which wins over `allOf`. The other lists are kept on the node but are
/// not emitted again.
pub fn from_json_schema(json: &Value) -> SchemaNode {
    let node = parse_node(json);
    tracing::debug!(
        node_type = %node.node_type(),
        definitions = node.definitions.as_ref().map_or(0, Definitions::len),
        "parsed JSON Schema into tree"
    );
    node
}

fn parse_node(json: &Value) -> SchemaNode {
    let Value::Object(schema) = json else {
        return SchemaNode::unconstrained();
    };

    let types = parse_types(schema.get("type"));
    let fields = parse_simple(schema, types.as_ref());
    let branches = parse_branches(schema);

    let kind = match branches.designated() {
        Some(tag) => NodeKind::Combinator(CombinatorNode {
            tag,
            branches,
            dormant: fields,
        }),
        None => NodeKind::Simple(fields),
    };

    SchemaNode {
        title: text(schema, "title").unwrap_or_default(),
        description: text(schema, "description").unwrap_or_default(),
        id: text(schema, "$id"),
        dialect: text(schema, "$schema"),
        types,
        kind,
        definitions: parse_definitions(schema.get("$defs")),
    }
}

/// `type` as a string or a list of strings. Unknown names are skipped.
fn parse_types(value: Option<&Value>) -> Option<TypeTags> {
    let parse = |v: &Value| v.as_str().and_then(|s| s.parse::<PrimitiveType>().ok());
    match value? {
        Value::Array(items) => TypeTags::new(items.iter().filter_map(parse)),
        single => TypeTags::new(parse(single)),
    }
}

fn parse_simple(schema: &Map<String, Value>, types: Option<&TypeTags>) -> SimpleFields {
    let specification = if let Some(value) = schema.get("const") {
        Specification::Const(stringify_literal(value))
    } else if let Some(Value::Array(items)) = schema.get("enum") {
        Specification::Enum(items.iter().map(stringify_literal).collect())
    } else if let Some(reference) = text(schema, "$ref") {
        Specification::Reference(reference)
    } else {
        Specification::None
    };

    let examples = match schema.get("examples") {
        Some(Value::Array(items)) => items.iter().map(stringify_literal).collect(),
        _ => Vec::new(),
    };

    let mut fields = SimpleFields {
        specification,
        default: schema.get("default").map(|v| parse_default(types, v)),
        examples,
        ..SimpleFields::default()
    };

    if let Some(types) = types {
        for tag in types.as_slice() {
            match tag {
                PrimitiveType::String => fields.string = Some(parse_string(schema)),
                PrimitiveType::Number | PrimitiveType::Integer => {
                    fields.numeric = Some(parse_numeric(schema));
                }
                PrimitiveType::Object => fields.object = Some(parse_object(schema)),
                PrimitiveType::Array => fields.array = Some(parse_array(schema)),
                PrimitiveType::Boolean | PrimitiveType::Null => {}
            }
        }
        fields.ensure_bags(types);
    }
    fields
}

/// A default matching the first non-null tag becomes editor text (`hello`
/// rather than `"hello"`). Anything else, `null` included, is kept as a JSON
/// literal so emission reproduces it unchanged.
fn parse_default(types: Option<&TypeTags>, value: &Value) -> DefaultValue {
    match (types.and_then(TypeTags::first_non_null), value) {
        (Some(PrimitiveType::String), Value::String(s)) => DefaultValue::Text(s.clone()),
        (Some(PrimitiveType::Number | PrimitiveType::Integer), Value::Number(n)) => {
            DefaultValue::Text(n.to_string())
        }
        (Some(PrimitiveType::Boolean), Value::Bool(b)) => DefaultValue::Text(b.to_string()),
        (Some(PrimitiveType::Object), Value::Object(_))
        | (Some(PrimitiveType::Array), Value::Array(_)) => {
            DefaultValue::Text(stringify_literal(value))
        }
        _ => DefaultValue::Literal(stringify_literal(value)),
    }
}

fn parse_string(schema: &Map<String, Value>) -> StringConstraints {
    StringConstraints {
        min_length: count(schema, "minLength"),
        max_length: count(schema, "maxLength"),
        pattern: text(schema, "pattern"),
        format: text(schema, "format"),
    }
}

fn parse_numeric(schema: &Map<String, Value>) -> NumericConstraints {
    let number = |key: &str| schema.get(key).and_then(Value::as_f64);
    NumericConstraints {
        minimum: number("minimum"),
        maximum: number("maximum"),
        exclusive_minimum: number("exclusiveMinimum"),
        exclusive_maximum: number("exclusiveMaximum"),
        multiple_of: number("multipleOf"),
    }
}

fn parse_object(schema: &Map<String, Value>) -> ObjectConstraints {
    let required: Vec<&str> = match schema.get("required") {
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    let properties = match schema.get("properties") {
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, child)| Property {
                name: name.clone(),
                required: required.contains(&name.as_str()),
                schema: Arc::new(parse_node(child)),
            })
            .collect(),
        _ => Vec::new(),
    };

    let pattern_properties = match schema.get("patternProperties") {
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(pattern, child)| PatternProperty {
                pattern: pattern.clone(),
                schema: Arc::new(parse_node(child)),
            })
            .collect(),
        _ => Vec::new(),
    };

    // Schema-valued `additionalProperties` has no builder control.
    let additional_properties = AdditionalProperties::from_bool(
        schema.get("additionalProperties").and_then(Value::as_bool),
    );

    ObjectConstraints {
        properties,
        pattern_properties,
        additional_properties,
        min_properties: count(schema, "minProperties"),
        max_properties: count(schema, "maxProperties"),
    }
}

fn parse_array(schema: &Map<String, Value>) -> ArrayConstraints {
    // Boolean and tuple forms have no builder control and parse as
    // unconstrained; only a missing `items` gets the initial schema.
    let items = schema
        .get("items")
        .map_or_else(SchemaNode::initial, parse_node);
    ArrayConstraints {
        items: Some(Arc::new(items)),
        min_items: count(schema, "minItems"),
        max_items: count(schema, "maxItems"),
    }
}

fn parse_branches(schema: &Map<String, Value>) -> Branches {
    CombinatorTag::precedence()
        .iter()
        .fold(Branches::default(), |branches, tag| match schema.get(tag.keyword()) {
            Some(Value::Array(items)) => branches.with(
                *tag,
                items.iter().map(|item| Arc::new(parse_node(item))).collect(),
            ),
            _ => branches,
        })
}

/// A non-empty `$defs` object. An empty one is treated as absent.
fn parse_definitions(value: Option<&Value>) -> Option<Definitions> {
    let Some(Value::Object(entries)) = value else {
        return None;
    };
    if entries.is_empty() {
        return None;
    }
    Some(Definitions::collect_unique(entries.iter().map(
        |(name, body)| Definition {
            name: name.clone(),
            schema: Arc::new(parse_node(body)),
        },
    )))
}

fn text(schema: &Map<String, Value>, key: &str) -> Option<String> {
    schema.get(key).and_then(Value::as_str).map(str::to_string)
}

fn count(schema: &Map<String, Value>, key: &str) -> Option<u64> {
    schema.get(key).and_then(Value::as_u64)
}
