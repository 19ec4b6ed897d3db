//! # Tree to JSON Schema
//!
//! Emission order follows the editor's text view: dialect and id, title and
//! description, `type`, the value specification, `examples`, then the
//! per-type keywords, combinator branches and finally `$defs`.
//!
//! Empty strings and empty lists are omitted rather than emitted as empty
//! values. The authoritative combinator list is the exception: it is
//! emitted even when empty.

use serde_json::{Map, Number, Value};

use jsed_core::{
    parse_literal, parse_literal_list, parse_number_literal, ArrayConstraints, DefaultValue,
    LiteralError, LiteralSite, NodeKind, NodePath, NumericConstraints, ObjectConstraints,
    PathSegment, PrimitiveType, SchemaNode, SimpleFields, Specification, StringConstraints,
    TypeTags,
};

use crate::error::ConvertError;

/// Largest integer magnitude an `f64` holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert a tree to a JSON Schema value.
///
/// `$id`, `$schema` and `$defs` are only emitted when `is_root` is set.
///
/// # Errors
///
/// Returns `ConvertError::Literal` when a `const`, `enum`, `default` or
/// `examples` literal anywhere in the tree is not valid JSON.
pub fn to_json_schema(node: &SchemaNode, is_root: bool) -> Result<Value, ConvertError> {
    let value = emit_node(node, is_root, &NodePath::root())?;
    tracing::debug!(
        is_root,
        node_type = %node.node_type(),
        "converted schema tree to JSON Schema"
    );
    Ok(value)
}

fn emit_node(node: &SchemaNode, is_root: bool, path: &NodePath) -> Result<Value, ConvertError> {
    let literal = |source: LiteralError| ConvertError::Literal {
        path: path.clone(),
        source,
    };

    let mut schema = Map::new();

    if is_root {
        insert_text(&mut schema, "$schema", node.dialect.as_deref());
        insert_text(&mut schema, "$id", node.id.as_deref());
    }
    insert_text(&mut schema, "title", Some(&node.title));
    insert_text(&mut schema, "description", Some(&node.description));

    match &node.kind {
        NodeKind::Combinator(combinator) => {
            emit_type(&mut schema, node.types.as_ref());
            let children = combinator
                .children()
                .iter()
                .enumerate()
                .map(|(i, child)| emit_node(child, false, &path.child(PathSegment::Branch(i))))
                .collect::<Result<Vec<_>, _>>()?;
            // Always present, even empty, so the node parses back as a combinator.
            schema.insert(combinator.tag.keyword().to_string(), Value::Array(children));
        }
        NodeKind::Simple(fields) => {
            emit_simple(&mut schema, node.types.as_ref(), fields, path).map_err(|e| match e {
                EmitFailure::Literal(source) => literal(source),
                EmitFailure::Nested(err) => err,
            })?;
        }
    }

    if is_root {
        if let Some(definitions) = node.definitions.as_ref().filter(|d| !d.is_empty()) {
            let mut defs = Map::new();
            for (i, definition) in definitions.iter().enumerate() {
                let def_path = path.child(PathSegment::Definition(i));
                defs.insert(
                    definition.name.clone(),
                    emit_node(&definition.schema, false, &def_path)?,
                );
            }
            schema.insert("$defs".to_string(), Value::Object(defs));
        }
    }

    Ok(Value::Object(schema))
}

/// Failure inside a simple node: either its own literal or a child's error.
enum EmitFailure {
    Literal(LiteralError),
    Nested(ConvertError),
}

impl From<LiteralError> for EmitFailure {
    fn from(err: LiteralError) -> Self {
        Self::Literal(err)
    }
}

impl From<ConvertError> for EmitFailure {
    fn from(err: ConvertError) -> Self {
        Self::Nested(err)
    }
}

fn emit_simple(
    schema: &mut Map<String, Value>,
    types: Option<&TypeTags>,
    fields: &SimpleFields,
    path: &NodePath,
) -> Result<(), EmitFailure> {
    let is_reference = matches!(fields.specification, Specification::Reference(_));
    if !is_reference {
        emit_type(schema, types);
    }

    match &fields.specification {
        Specification::None => {}
        Specification::Const(text) => {
            if !text.is_empty() {
                schema.insert("const".into(), parse_literal(LiteralSite::Const, text)?);
            }
        }
        Specification::Enum(items) => {
            let values = parse_literal_list(LiteralSite::Enum, items)?;
            if !values.is_empty() {
                schema.insert("enum".into(), Value::Array(values));
            }
        }
        Specification::Reference(reference) => {
            insert_text(schema, "$ref", Some(reference));
        }
    }

    let examples = parse_literal_list(LiteralSite::Examples, &fields.examples)?;
    if !examples.is_empty() {
        schema.insert("examples".into(), Value::Array(examples));
    }

    // A reference carries no sibling constraints.
    if is_reference {
        return Ok(());
    }
    let Some(types) = types else {
        return Ok(());
    };

    if let Some(default) = emit_default(types, fields.default.as_ref())? {
        schema.insert("default".into(), default);
    }

    let mut numeric_done = false;
    for tag in types.as_slice() {
        match tag {
            PrimitiveType::String => {
                if let Some(string) = &fields.string {
                    emit_string(schema, string);
                }
            }
            PrimitiveType::Number | PrimitiveType::Integer => {
                if let (false, Some(numeric)) = (numeric_done, &fields.numeric) {
                    emit_numeric(schema, numeric);
                }
                numeric_done = true;
            }
            PrimitiveType::Object => {
                if let Some(object) = &fields.object {
                    emit_object(schema, object, path)?;
                }
            }
            PrimitiveType::Array => {
                if let Some(array) = &fields.array {
                    emit_array(schema, array, path)?;
                }
            }
            PrimitiveType::Boolean | PrimitiveType::Null => {}
        }
    }

    Ok(())
}

fn emit_type(schema: &mut Map<String, Value>, types: Option<&TypeTags>) {
    let Some(types) = types else {
        return;
    };
    let value = match types.as_slice() {
        [single] => Value::String(single.as_str().to_string()),
        tags => Value::Array(
            tags.iter()
                .map(|t| Value::String(t.as_str().to_string()))
                .collect(),
        ),
    };
    schema.insert("type".into(), value);
}

/// Interpret default text according to the first non-null type tag, or
/// parse a stored JSON literal as is.
fn emit_default(
    types: &TypeTags,
    default: Option<&DefaultValue>,
) -> Result<Option<Value>, LiteralError> {
    let text = match default {
        Some(DefaultValue::Text(text)) if !text.is_empty() => text,
        Some(DefaultValue::Literal(text)) if !text.is_empty() => {
            return parse_literal(LiteralSite::Default, text).map(Some);
        }
        _ => return Ok(None),
    };
    let value = match types.first_non_null() {
        None => return Ok(None),
        Some(PrimitiveType::String) => Value::String(text.to_string()),
        Some(PrimitiveType::Number | PrimitiveType::Integer) => {
            parse_number_literal(LiteralSite::Default, text)?
        }
        Some(PrimitiveType::Boolean) => Value::Bool(text == "true"),
        Some(PrimitiveType::Object | PrimitiveType::Array) => {
            parse_literal(LiteralSite::Default, text)?
        }
        Some(PrimitiveType::Null) => return Ok(None),
    };
    Ok(Some(value))
}

fn emit_string(schema: &mut Map<String, Value>, string: &StringConstraints) {
    insert_count(schema, "minLength", string.min_length);
    insert_count(schema, "maxLength", string.max_length);
    insert_text(schema, "pattern", string.pattern.as_deref());
    insert_text(schema, "format", string.format.as_deref());
}

fn emit_numeric(schema: &mut Map<String, Value>, numeric: &NumericConstraints) {
    let fields = [
        ("minimum", numeric.minimum),
        ("exclusiveMinimum", numeric.exclusive_minimum),
        ("maximum", numeric.maximum),
        ("exclusiveMaximum", numeric.exclusive_maximum),
        ("multipleOf", numeric.multiple_of),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            schema.insert(key.into(), number_value(value));
        }
    }
}

fn emit_object(
    schema: &mut Map<String, Value>,
    object: &ObjectConstraints,
    path: &NodePath,
) -> Result<(), ConvertError> {
    if let Some(allowed) = object.additional_properties.as_bool() {
        schema.insert("additionalProperties".into(), Value::Bool(allowed));
    }
    insert_count(schema, "minProperties", object.min_properties);
    insert_count(schema, "maxProperties", object.max_properties);

    if !object.properties.is_empty() {
        let mut properties = Map::new();
        for (i, property) in object.properties.iter().enumerate() {
            let child = emit_node(&property.schema, false, &path.child(PathSegment::Property(i)))?;
            properties.insert(property.name.clone(), child);
        }
        schema.insert("properties".into(), Value::Object(properties));

        let required = object.required_names();
        if !required.is_empty() {
            schema.insert(
                "required".into(),
                Value::Array(required.into_iter().map(|n| Value::String(n.to_string())).collect()),
            );
        }
    }

    if !object.pattern_properties.is_empty() {
        let mut patterns = Map::new();
        for (i, entry) in object.pattern_properties.iter().enumerate() {
            let child = emit_node(
                &entry.schema,
                false,
                &path.child(PathSegment::PatternProperty(i)),
            )?;
            patterns.insert(entry.pattern.clone(), child);
        }
        schema.insert("patternProperties".into(), Value::Object(patterns));
    }
    Ok(())
}

fn emit_array(
    schema: &mut Map<String, Value>,
    array: &ArrayConstraints,
    path: &NodePath,
) -> Result<(), ConvertError> {
    insert_count(schema, "minItems", array.min_items);
    insert_count(schema, "maxItems", array.max_items);
    if let Some(items) = &array.items {
        let child = emit_node(items, false, &path.child(PathSegment::Items))?;
        schema.insert("items".into(), child);
    }
    Ok(())
}

fn insert_text(schema: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        schema.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn insert_count(schema: &mut Map<String, Value>, key: &str, value: Option<u64>) {
    if let Some(value) = value {
        schema.insert(key.to_string(), Value::from(value));
    }
}

/// Integral values are written without a fractional part.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}
