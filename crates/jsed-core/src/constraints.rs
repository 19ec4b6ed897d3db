//! # Per-Type Constraint Bags
//!
//! One bag per type family. A bag is attached to a simple node when the
//! matching type tag is added, and is only emitted while that tag is
//! present.
//!
//! ## Numeric Ordering
//!
//! The range setters on [`NumericConstraints`] keep `minimum <= maximum`
//! and `exclusiveMinimum <= exclusiveMaximum` after every edit: setting one
//! end past the other drags the other end along.

use std::sync::Arc;

use crate::error::EditError;
use crate::node::SchemaNode;

/// Constraints for `string`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringConstraints {
    /// `minLength`
    pub min_length: Option<u64>,
    /// `maxLength`
    pub max_length: Option<u64>,
    /// `pattern`; empty means absent.
    pub pattern: Option<String>,
    /// `format`; empty means absent.
    pub format: Option<String>,
}

/// Constraints for `number` and `integer`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericConstraints {
    /// `minimum`
    pub minimum: Option<f64>,
    /// `maximum`
    pub maximum: Option<f64>,
    /// `exclusiveMinimum`
    pub exclusive_minimum: Option<f64>,
    /// `exclusiveMaximum`
    pub exclusive_maximum: Option<f64>,
    /// `multipleOf`
    pub multiple_of: Option<f64>,
}

impl NumericConstraints {
    /// Set `minimum`, raising `maximum` to match if it would fall below.
    pub fn with_minimum(self, value: Option<f64>) -> Self {
        Self {
            minimum: value,
            maximum: raise(self.maximum, value),
            ..self
        }
    }

    /// Set `maximum`, lowering `minimum` to match if it would rise above.
    pub fn with_maximum(self, value: Option<f64>) -> Self {
        Self {
            maximum: value,
            minimum: lower(self.minimum, value),
            ..self
        }
    }

    /// Set `exclusiveMinimum`, raising `exclusiveMaximum` if needed.
    pub fn with_exclusive_minimum(self, value: Option<f64>) -> Self {
        Self {
            exclusive_minimum: value,
            exclusive_maximum: raise(self.exclusive_maximum, value),
            ..self
        }
    }

    /// Set `exclusiveMaximum`, lowering `exclusiveMinimum` if needed.
    pub fn with_exclusive_maximum(self, value: Option<f64>) -> Self {
        Self {
            exclusive_maximum: value,
            exclusive_minimum: lower(self.exclusive_minimum, value),
            ..self
        }
    }

    /// Set `multipleOf`.
    pub fn with_multiple_of(self, value: Option<f64>) -> Self {
        Self {
            multiple_of: value,
            ..self
        }
    }
}

fn raise(upper: Option<f64>, new_lower: Option<f64>) -> Option<f64> {
    match (upper, new_lower) {
        (Some(upper), Some(lower)) => Some(upper.max(lower)),
        (upper, _) => upper,
    }
}

fn lower(current_lower: Option<f64>, new_upper: Option<f64>) -> Option<f64> {
    match (current_lower, new_upper) {
        (Some(lower), Some(upper)) => Some(lower.min(upper)),
        (lower, _) => lower,
    }
}

/// Tri-state `additionalProperties`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AdditionalProperties {
    /// Keyword omitted.
    #[default]
    Unspecified,
    /// `"additionalProperties": true`
    Allowed,
    /// `"additionalProperties": false`
    Forbidden,
}

impl AdditionalProperties {
    /// The boolean to emit, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Unspecified => None,
            Self::Allowed => Some(true),
            Self::Forbidden => Some(false),
        }
    }

    /// Tri-state from an optional boolean keyword value.
    pub fn from_bool(value: Option<bool>) -> Self {
        match value {
            None => Self::Unspecified,
            Some(true) => Self::Allowed,
            Some(false) => Self::Forbidden,
        }
    }
}

/// A named object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Whether the name is listed in `required`.
    pub required: bool,
    /// Property schema.
    pub schema: Arc<SchemaNode>,
}

/// A `patternProperties` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternProperty {
    /// Regular expression matched against property names.
    pub pattern: String,
    /// Schema for matching properties.
    pub schema: Arc<SchemaNode>,
}

/// Constraints for `object`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectConstraints {
    /// `properties` in insertion order, with `required` flags.
    pub properties: Vec<Property>,
    /// `patternProperties` in insertion order.
    pub pattern_properties: Vec<PatternProperty>,
    /// `additionalProperties`
    pub additional_properties: AdditionalProperties,
    /// `minProperties`
    pub min_properties: Option<u64>,
    /// `maxProperties`
    pub max_properties: Option<u64>,
}

impl ObjectConstraints {
    /// Append an optional property with the initial schema.
    ///
    /// # Errors
    ///
    /// Returns `EditError::DuplicateKey` when the name is already used.
    pub fn with_property(&self, name: impl Into<String>) -> Result<Self, EditError> {
        let name = name.into();
        self.check_property_name(&name, None)?;
        let mut next = self.clone();
        next.properties.push(Property {
            name,
            required: false,
            schema: Arc::new(SchemaNode::initial()),
        });
        Ok(next)
    }

    /// Remove the property at `index`.
    pub fn without_property(&self, index: usize) -> Result<Self, EditError> {
        check_index("properties", index, self.properties.len())?;
        let mut next = self.clone();
        next.properties.remove(index);
        Ok(next)
    }

    /// Rename the property at `index`.
    ///
    /// # Errors
    ///
    /// Returns `EditError::DuplicateKey` when another property has the name.
    pub fn with_property_renamed(
        &self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<Self, EditError> {
        let name = name.into();
        check_index("properties", index, self.properties.len())?;
        self.check_property_name(&name, Some(index))?;
        self.map_property(index, |p| Property {
            name: name.into(),
            ..p.clone()
        })
    }

    /// Set the `required` flag of the property at `index`.
    pub fn with_property_required(&self, index: usize, required: bool) -> Result<Self, EditError> {
        self.map_property(index, |p| Property {
            required,
            ..p.clone()
        })
    }

    /// Replace the schema of the property at `index`.
    pub fn with_property_schema(&self, index: usize, schema: SchemaNode) -> Result<Self, EditError> {
        self.map_property(index, |p| Property {
            schema: Arc::new(schema),
            ..p.clone()
        })
    }

    /// Property names become object keys, so two entries may not share one.
    fn check_property_name(&self, name: &str, skip: Option<usize>) -> Result<(), EditError> {
        let taken = self
            .properties
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != skip && p.name == name);
        if taken {
            return Err(EditError::DuplicateKey {
                list: "properties",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_pattern(&self, pattern: &str, skip: Option<usize>) -> Result<(), EditError> {
        let taken = self
            .pattern_properties
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != skip && p.pattern == pattern);
        if taken {
            return Err(EditError::DuplicateKey {
                list: "patternProperties",
                name: pattern.to_string(),
            });
        }
        Ok(())
    }

    fn map_property(
        &self,
        index: usize,
        f: impl FnOnce(&Property) -> Property,
    ) -> Result<Self, EditError> {
        check_index("properties", index, self.properties.len())?;
        let mut next = self.clone();
        next.properties[index] = f(&self.properties[index]);
        Ok(next)
    }

    /// Append a pattern property with the initial schema.
    ///
    /// # Errors
    ///
    /// Returns `EditError::DuplicateKey` when the pattern is already used.
    pub fn with_pattern_property(&self, pattern: impl Into<String>) -> Result<Self, EditError> {
        let pattern = pattern.into();
        self.check_pattern(&pattern, None)?;
        let mut next = self.clone();
        next.pattern_properties.push(PatternProperty {
            pattern,
            schema: Arc::new(SchemaNode::initial()),
        });
        Ok(next)
    }

    /// Remove the pattern property at `index`.
    pub fn without_pattern_property(&self, index: usize) -> Result<Self, EditError> {
        check_index("patternProperties", index, self.pattern_properties.len())?;
        let mut next = self.clone();
        next.pattern_properties.remove(index);
        Ok(next)
    }

    /// Change the pattern of the entry at `index`.
    pub fn with_pattern_renamed(
        &self,
        index: usize,
        pattern: impl Into<String>,
    ) -> Result<Self, EditError> {
        let pattern = pattern.into();
        check_index("patternProperties", index, self.pattern_properties.len())?;
        self.check_pattern(&pattern, Some(index))?;
        let mut next = self.clone();
        next.pattern_properties[index].pattern = pattern;
        Ok(next)
    }

    /// Replace the schema of the pattern property at `index`.
    pub fn with_pattern_schema(&self, index: usize, schema: SchemaNode) -> Result<Self, EditError> {
        check_index("patternProperties", index, self.pattern_properties.len())?;
        let mut next = self.clone();
        next.pattern_properties[index].schema = Arc::new(schema);
        Ok(next)
    }

    /// Set the `additionalProperties` tri-state.
    pub fn with_additional_properties(&self, value: AdditionalProperties) -> Self {
        Self {
            additional_properties: value,
            ..self.clone()
        }
    }

    /// Names flagged as required, in property order.
    pub fn required_names(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Constraints for `array`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayConstraints {
    /// `items`
    pub items: Option<Arc<SchemaNode>>,
    /// `minItems`
    pub min_items: Option<u64>,
    /// `maxItems`
    pub max_items: Option<u64>,
}

impl ArrayConstraints {
    /// An array bag whose items are the initial schema.
    pub fn with_initial_items() -> Self {
        Self {
            items: Some(Arc::new(SchemaNode::initial())),
            ..Self::default()
        }
    }

    /// Replace the item schema.
    pub fn with_items(&self, items: SchemaNode) -> Self {
        Self {
            items: Some(Arc::new(items)),
            ..self.clone()
        }
    }
}

pub(crate) fn check_index(list: &'static str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange { list, index, len })
    }
}
