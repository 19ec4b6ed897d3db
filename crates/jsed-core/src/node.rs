//! # Schema Tree
//!
//! The recursive node type the builder edits. A node carries shared
//! metadata (title, description, `$id`, `$schema`, type tags, root
//! definitions) and a [`NodeKind`] body that is either a simple node or a
//! combinator node.
//!
//! ## Invariants
//!
//! - Exactly one body is authoritative per node, selected by [`NodeKind`].
//! - [`TypeTags`] is never empty; "no type constraint" is `None`.
//! - [`Definitions`] names are unique.
//! - Per-type constraint bags exist independently of the type tags so a
//!   tag can be toggled off and on without losing what the user typed.
//!   Only the bags whose tag is present are emitted.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constraints::{ArrayConstraints, NumericConstraints, ObjectConstraints, StringConstraints};
use crate::error::EditError;

// ─── Primitive types ─────────────────────────────────────────────────

/// A JSON Schema primitive type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    /// `"string"`
    String,
    /// `"boolean"`
    Boolean,
    /// `"number"`
    Number,
    /// `"integer"`
    Integer,
    /// `"object"`
    Object,
    /// `"array"`
    Array,
    /// `"null"`
    Null,
}

impl PrimitiveType {
    /// All tags, in the order the builder offers them.
    pub fn all() -> &'static [PrimitiveType] {
        &[
            Self::String,
            Self::Boolean,
            Self::Number,
            Self::Integer,
            Self::Object,
            Self::Array,
            Self::Null,
        ]
    }

    /// The keyword spelling of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown type tag: {s}"))
    }
}

/// Ordered, non-empty, duplicate-free list of type tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTags(Vec<PrimitiveType>);

impl TypeTags {
    /// Build a tag list, dropping duplicates after their first occurrence.
    ///
    /// Returns `None` when no tag remains; callers treat that as an
    /// unconstrained type.
    pub fn new(tags: impl IntoIterator<Item = PrimitiveType>) -> Option<Self> {
        let mut out: Vec<PrimitiveType> = Vec::new();
        for tag in tags {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(Self(out))
        }
    }

    /// A single-tag list.
    pub fn single(tag: PrimitiveType) -> Self {
        Self(vec![tag])
    }

    /// Tags in stored order.
    pub fn as_slice(&self) -> &[PrimitiveType] {
        &self.0
    }

    /// Whether `tag` is present.
    pub fn contains(&self, tag: PrimitiveType) -> bool {
        self.0.contains(&tag)
    }

    /// Whether `number` or `integer` is present.
    pub fn is_numeric(&self) -> bool {
        self.contains(PrimitiveType::Number) || self.contains(PrimitiveType::Integer)
    }

    /// Number of tags. Always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First tag that is not `null`, used to coerce defaults.
    pub fn first_non_null(&self) -> Option<PrimitiveType> {
        self.0.iter().copied().find(|t| *t != PrimitiveType::Null)
    }
}

// ─── Node type and combinators ───────────────────────────────────────

/// The combinator keywords, in parse precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinatorTag {
    /// `oneOf`
    OneOf,
    /// `anyOf`
    AnyOf,
    /// `allOf`
    AllOf,
}

impl CombinatorTag {
    /// Tags in the order a parser designates the authoritative one.
    pub fn precedence() -> &'static [CombinatorTag] {
        &[Self::OneOf, Self::AnyOf, Self::AllOf]
    }

    /// The keyword spelling of this combinator.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::AllOf => "allOf",
        }
    }
}

impl fmt::Display for CombinatorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Builder-facing node type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Direct type constraints.
    Simple,
    /// A combinator over child schemas.
    Combinator(CombinatorTag),
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Combinator(tag) => tag.fmt(f),
        }
    }
}

/// Branch lists of a combinator node, one slot per keyword.
///
/// A source document may carry several combinator keywords at once. All of
/// them are kept; only the one named by [`CombinatorNode::tag`] is emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branches {
    /// `oneOf` branches, if the keyword was present.
    pub one_of: Option<Vec<Arc<SchemaNode>>>,
    /// `anyOf` branches, if the keyword was present.
    pub any_of: Option<Vec<Arc<SchemaNode>>>,
    /// `allOf` branches, if the keyword was present.
    pub all_of: Option<Vec<Arc<SchemaNode>>>,
}

impl Branches {
    /// Branch list for `tag`, if present.
    pub fn get(&self, tag: CombinatorTag) -> Option<&[Arc<SchemaNode>]> {
        match tag {
            CombinatorTag::OneOf => self.one_of.as_deref(),
            CombinatorTag::AnyOf => self.any_of.as_deref(),
            CombinatorTag::AllOf => self.all_of.as_deref(),
        }
    }

    /// Replace the branch list for `tag`.
    pub fn with(&self, tag: CombinatorTag, branches: Vec<Arc<SchemaNode>>) -> Self {
        let mut next = self.clone();
        let slot = match tag {
            CombinatorTag::OneOf => &mut next.one_of,
            CombinatorTag::AnyOf => &mut next.any_of,
            CombinatorTag::AllOf => &mut next.all_of,
        };
        *slot = Some(branches);
        next
    }

    /// First tag in precedence order whose keyword is present.
    pub fn designated(&self) -> Option<CombinatorTag> {
        CombinatorTag::precedence()
            .iter()
            .copied()
            .find(|tag| self.get(*tag).is_some())
    }
}

/// Body of a combinator node.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinatorNode {
    /// The authoritative combinator.
    pub tag: CombinatorTag,
    /// All branch lists known for this node.
    pub branches: Branches,
    /// Simple-node fields kept while the combinator is authoritative, so
    /// switching the node back to simple restores them.
    pub dormant: SimpleFields,
}

impl CombinatorNode {
    /// Children of the authoritative combinator.
    pub fn children(&self) -> &[Arc<SchemaNode>] {
        self.branches.get(self.tag).unwrap_or(&[])
    }
}

// ─── Simple body ─────────────────────────────────────────────────────

/// Value-constraint mode layered on top of the type tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Specification {
    /// No value constraint.
    #[default]
    None,
    /// `const`, as a JSON literal.
    Const(String),
    /// `enum`, as a list of JSON literals.
    Enum(Vec<String>),
    /// `$ref`, copied verbatim.
    Reference(String),
}

impl Specification {
    /// The mode of this specification, without payload.
    pub fn mode(&self) -> SpecificationMode {
        match self {
            Self::None => SpecificationMode::None,
            Self::Const(_) => SpecificationMode::Const,
            Self::Enum(_) => SpecificationMode::Enum,
            Self::Reference(_) => SpecificationMode::Reference,
        }
    }
}

/// Payload-free specification selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecificationMode {
    /// `none`
    None,
    /// `const`
    Const,
    /// `enum`
    Enum,
    /// `reference`
    Reference,
}

impl SpecificationMode {
    /// An empty specification of this mode.
    pub fn empty(&self) -> Specification {
        match self {
            Self::None => Specification::None,
            Self::Const => Specification::Const(String::new()),
            Self::Enum => Specification::Enum(Vec::new()),
            Self::Reference => Specification::Reference(String::new()),
        }
    }
}

/// A stored `default` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Editor text, interpreted by the first non-null type tag on emission
    /// (`hello` for a string, `5` for a number, `true` for a boolean).
    Text(String),
    /// A JSON literal emitted unchanged. Holds values the first non-null
    /// tag cannot express, such as `null` or a number under a string type.
    Literal(String),
}

impl DefaultValue {
    /// The stored text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Literal(text) => text,
        }
    }
}

/// Fields of a simple node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleFields {
    /// Value constraint mode and payload.
    pub specification: Specification,
    /// Default value; see [`DefaultValue`].
    pub default: Option<DefaultValue>,
    /// Example values as JSON literals.
    pub examples: Vec<String>,
    /// Constraints applied when the type includes `string`.
    pub string: Option<StringConstraints>,
    /// Constraints applied when the type includes `number` or `integer`.
    pub numeric: Option<NumericConstraints>,
    /// Constraints applied when the type includes `object`.
    pub object: Option<ObjectConstraints>,
    /// Constraints applied when the type includes `array`.
    pub array: Option<ArrayConstraints>,
}

impl SimpleFields {
    /// Create the constraint bag for every tag in `tags` that lacks one.
    pub fn ensure_bags(&mut self, tags: &TypeTags) {
        for tag in tags.as_slice() {
            match tag {
                PrimitiveType::String => {
                    self.string.get_or_insert_with(StringConstraints::default);
                }
                PrimitiveType::Number | PrimitiveType::Integer => {
                    self.numeric.get_or_insert_with(NumericConstraints::default);
                }
                PrimitiveType::Object => {
                    self.object.get_or_insert_with(ObjectConstraints::default);
                }
                PrimitiveType::Array => {
                    self.array.get_or_insert_with(ArrayConstraints::with_initial_items);
                }
                PrimitiveType::Boolean | PrimitiveType::Null => {}
            }
        }
    }
}

/// Node body.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Direct type constraints.
    Simple(SimpleFields),
    /// Combinator over child schemas.
    Combinator(CombinatorNode),
}

// ─── Definitions ─────────────────────────────────────────────────────

/// One named, reusable schema reachable as `#/$defs/<name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Definition name, unique within its collection.
    pub name: String,
    /// The definition body.
    pub schema: Arc<SchemaNode>,
}

/// Ordered collection of definitions with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions(Vec<Definition>);

impl Definitions {
    /// Build a collection, rejecting duplicate or empty names.
    ///
    /// # Errors
    ///
    /// Returns `EditError::DuplicateDefinition` or
    /// `EditError::EmptyDefinitionName`.
    pub fn try_from_entries(entries: Vec<Definition>) -> Result<Self, EditError> {
        let mut out = Self::default();
        for entry in entries {
            out.check_name(&entry.name)?;
            out.0.push(entry);
        }
        Ok(out)
    }

    /// Build a collection from parsed entries, keeping the first entry for
    /// each name and skipping unnamed ones.
    pub fn collect_unique(entries: impl IntoIterator<Item = Definition>) -> Self {
        let mut out = Self::default();
        for entry in entries {
            if out.check_name(&entry.name).is_ok() {
                out.0.push(entry);
            }
        }
        out
    }

    pub(crate) fn check_name(&self, name: &str) -> Result<(), EditError> {
        if name.is_empty() {
            return Err(EditError::EmptyDefinitionName);
        }
        if self.contains(name) {
            return Err(EditError::DuplicateDefinition(name.to_string()));
        }
        Ok(())
    }

    pub(crate) fn entries(&self) -> &[Definition] {
        &self.0
    }

    pub(crate) fn from_vec_unchecked(entries: Vec<Definition>) -> Self {
        Self(entries)
    }

    /// Iterate definitions in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.0.iter()
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.0.iter().find(|d| d.name == name)
    }

    /// Whether a definition named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Definition names in collection order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|d| d.name.as_str()).collect()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ─── The node ────────────────────────────────────────────────────────

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// `title`; empty means absent.
    pub title: String,
    /// `description`; empty means absent.
    pub description: String,
    /// `$id`, emitted on the root only.
    pub id: Option<String>,
    /// `$schema` dialect URI, emitted on the root only.
    pub dialect: Option<String>,
    /// Type tags; `None` leaves the type unconstrained.
    pub types: Option<TypeTags>,
    /// Simple or combinator body.
    pub kind: NodeKind,
    /// Root-level `$defs`. `None` and an empty collection are distinct.
    pub definitions: Option<Definitions>,
}

impl SchemaNode {
    /// The starting schema of a session: a simple string leaf.
    pub fn initial() -> Self {
        let types = TypeTags::single(PrimitiveType::String);
        let mut fields = SimpleFields::default();
        fields.ensure_bags(&types);
        Self {
            title: String::new(),
            description: String::new(),
            id: None,
            dialect: None,
            types: Some(types),
            kind: NodeKind::Simple(fields),
            definitions: None,
        }
    }

    /// A simple node with no type constraint and no fields.
    pub fn unconstrained() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            id: None,
            dialect: None,
            types: None,
            kind: NodeKind::Simple(SimpleFields::default()),
            definitions: None,
        }
    }

    /// The builder node type of this node.
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Simple(_) => NodeType::Simple,
            NodeKind::Combinator(c) => NodeType::Combinator(c.tag),
        }
    }

    /// Simple fields, if this is a simple node.
    pub fn simple(&self) -> Option<&SimpleFields> {
        match &self.kind {
            NodeKind::Simple(fields) => Some(fields),
            NodeKind::Combinator(_) => None,
        }
    }

    /// Combinator body, if this is a combinator node.
    pub fn combinator(&self) -> Option<&CombinatorNode> {
        match &self.kind {
            NodeKind::Simple(_) => None,
            NodeKind::Combinator(c) => Some(c),
        }
    }

    /// Whether the type tags include `tag`.
    pub fn has_type(&self, tag: PrimitiveType) -> bool {
        self.types.as_ref().is_some_and(|t| t.contains(tag))
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self::initial()
    }
}
