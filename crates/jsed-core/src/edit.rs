//! # Persistent Edits
//!
//! Every builder action is a method taking `&SchemaNode` and returning a
//! new node. The receiver is never modified; children that the edit does
//! not touch are shared through their `Arc`.
//!
//! Nested nodes are addressed with a [`NodePath`]. [`SchemaNode::update_at`]
//! rebuilds only the spine from the root to the addressed node.

use std::fmt;
use std::sync::Arc;

use crate::constraints::{
    check_index, ArrayConstraints, NumericConstraints, ObjectConstraints, StringConstraints,
};
use crate::error::EditError;
use crate::node::{
    Branches, CombinatorNode, DefaultValue, Definition, Definitions, NodeKind, NodeType,
    SchemaNode, SimpleFields, Specification, SpecificationMode, TypeTags,
};

/// Base name for definitions created by [`SchemaNode::with_definition_added`].
const NEW_DEFINITION_NAME: &str = "definition";

// ─── Paths ───────────────────────────────────────────────────────────

/// One step from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Entry of `properties`, by position.
    Property(usize),
    /// Entry of `patternProperties`, by position.
    PatternProperty(usize),
    /// The `items` schema.
    Items,
    /// Branch of the authoritative combinator, by position.
    Branch(usize),
    /// Root definition, by position.
    Definition(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(i) => write!(f, "properties[{i}]"),
            Self::PatternProperty(i) => write!(f, "patternProperties[{i}]"),
            Self::Items => f.write_str("items"),
            Self::Branch(i) => write!(f, "branch[{i}]"),
            Self::Definition(i) => write!(f, "$defs[{i}]"),
        }
    }
}

/// Address of a node relative to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    /// The root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut next = self.0.clone();
        next.push(segment);
        Self(next)
    }

    /// Segments from the root downwards.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl From<Vec<PathSegment>> for NodePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

// ─── Edits ───────────────────────────────────────────────────────────

impl SchemaNode {
    /// Set `title`.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Set `description`.
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Set `$id`.
    pub fn with_id(&self, id: Option<String>) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Set the `$schema` dialect URI.
    pub fn with_dialect(&self, dialect: Option<String>) -> Self {
        Self {
            dialect,
            ..self.clone()
        }
    }

    /// Replace the type tags. `None` makes the type unconstrained.
    ///
    /// Tags gaining a constraint group get an empty bag; bags of removed
    /// tags are kept so re-adding the tag restores them.
    pub fn with_types(&self, types: Option<TypeTags>) -> Self {
        let mut next = self.clone();
        if let Some(tags) = &types {
            match &mut next.kind {
                NodeKind::Simple(fields) => fields.ensure_bags(tags),
                NodeKind::Combinator(c) => c.dormant.ensure_bags(tags),
            }
        }
        next.types = types;
        next
    }

    /// Switch between simple and combinator bodies.
    ///
    /// Simple fields survive a round trip through a combinator. Branch
    /// lists are dropped when switching to simple.
    pub fn with_node_type(&self, node_type: NodeType) -> Self {
        let kind = match (&self.kind, node_type) {
            (NodeKind::Simple(_), NodeType::Simple) => return self.clone(),
            (NodeKind::Simple(fields), NodeType::Combinator(tag)) => {
                NodeKind::Combinator(CombinatorNode {
                    tag,
                    branches: Branches::default().with(tag, Vec::new()),
                    dormant: fields.clone(),
                })
            }
            (NodeKind::Combinator(c), NodeType::Simple) => NodeKind::Simple(c.dormant.clone()),
            (NodeKind::Combinator(c), NodeType::Combinator(tag)) => {
                let branches = if c.branches.get(tag).is_some() {
                    c.branches.clone()
                } else {
                    c.branches.with(tag, Vec::new())
                };
                NodeKind::Combinator(CombinatorNode {
                    tag,
                    branches,
                    dormant: c.dormant.clone(),
                })
            }
        };
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Apply `f` to the simple fields of this node.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotSimple` for combinator nodes, or whatever `f`
    /// returns.
    pub fn map_simple(
        &self,
        operation: &'static str,
        f: impl FnOnce(&SimpleFields) -> Result<SimpleFields, EditError>,
    ) -> Result<Self, EditError> {
        match &self.kind {
            NodeKind::Simple(fields) => Ok(Self {
                kind: NodeKind::Simple(f(fields)?),
                ..self.clone()
            }),
            NodeKind::Combinator(_) => Err(EditError::NotSimple { operation }),
        }
    }

    /// Replace the specification, payload included.
    pub fn with_specification(&self, specification: Specification) -> Result<Self, EditError> {
        self.map_simple("set specification", |f| {
            Ok(SimpleFields {
                specification,
                ..f.clone()
            })
        })
    }

    /// Switch the specification mode. Staying in the same mode keeps the
    /// payload; switching starts from an empty payload.
    pub fn with_specification_mode(&self, mode: SpecificationMode) -> Result<Self, EditError> {
        self.map_simple("set specification mode", |f| {
            if f.specification.mode() == mode {
                return Ok(f.clone());
            }
            Ok(SimpleFields {
                specification: mode.empty(),
                ..f.clone()
            })
        })
    }

    /// Set the default as editor text. An empty string is stored but never
    /// emitted.
    pub fn with_default(&self, default: Option<String>) -> Result<Self, EditError> {
        self.with_default_value(default.map(DefaultValue::Text))
    }

    /// Set the default, text or JSON literal.
    pub fn with_default_value(&self, default: Option<DefaultValue>) -> Result<Self, EditError> {
        self.map_simple("set default", |f| {
            Ok(SimpleFields {
                default,
                ..f.clone()
            })
        })
    }

    /// Replace the example literals.
    pub fn with_examples(&self, examples: Vec<String>) -> Result<Self, EditError> {
        self.map_simple("set examples", |f| {
            Ok(SimpleFields {
                examples,
                ..f.clone()
            })
        })
    }

    /// Edit string constraints.
    pub fn map_string(
        &self,
        f: impl FnOnce(&StringConstraints) -> StringConstraints,
    ) -> Result<Self, EditError> {
        self.map_simple("edit string constraints", |fields| {
            let current = fields
                .string
                .as_ref()
                .ok_or(EditError::MissingConstraints { group: "string" })?;
            Ok(SimpleFields {
                string: Some(f(current)),
                ..fields.clone()
            })
        })
    }

    /// Edit numeric constraints.
    pub fn map_numeric(
        &self,
        f: impl FnOnce(NumericConstraints) -> NumericConstraints,
    ) -> Result<Self, EditError> {
        self.map_simple("edit numeric constraints", |fields| {
            let current = fields
                .numeric
                .ok_or(EditError::MissingConstraints { group: "numeric" })?;
            Ok(SimpleFields {
                numeric: Some(f(current)),
                ..fields.clone()
            })
        })
    }

    /// Edit object constraints.
    pub fn map_object(
        &self,
        f: impl FnOnce(&ObjectConstraints) -> Result<ObjectConstraints, EditError>,
    ) -> Result<Self, EditError> {
        self.map_simple("edit object constraints", |fields| {
            let current = fields
                .object
                .as_ref()
                .ok_or(EditError::MissingConstraints { group: "object" })?;
            Ok(SimpleFields {
                object: Some(f(current)?),
                ..fields.clone()
            })
        })
    }

    /// Edit array constraints.
    pub fn map_array(
        &self,
        f: impl FnOnce(&ArrayConstraints) -> ArrayConstraints,
    ) -> Result<Self, EditError> {
        self.map_simple("edit array constraints", |fields| {
            let current = fields
                .array
                .as_ref()
                .ok_or(EditError::MissingConstraints { group: "array" })?;
            Ok(SimpleFields {
                array: Some(f(current)),
                ..fields.clone()
            })
        })
    }

    // ─── Combinator branches ─────────────────────────────────────────

    fn map_branches(
        &self,
        operation: &'static str,
        f: impl FnOnce(&[Arc<SchemaNode>]) -> Result<Vec<Arc<SchemaNode>>, EditError>,
    ) -> Result<Self, EditError> {
        match &self.kind {
            NodeKind::Combinator(c) => {
                let children = f(c.children())?;
                Ok(Self {
                    kind: NodeKind::Combinator(CombinatorNode {
                        tag: c.tag,
                        branches: c.branches.with(c.tag, children),
                        dormant: c.dormant.clone(),
                    }),
                    ..self.clone()
                })
            }
            NodeKind::Simple(_) => Err(EditError::NotCombinator { operation }),
        }
    }

    /// Append an initial-schema branch to the authoritative combinator.
    pub fn with_branch_added(&self) -> Result<Self, EditError> {
        self.map_branches("add branch", |children| {
            let mut next = children.to_vec();
            next.push(Arc::new(SchemaNode::initial()));
            Ok(next)
        })
    }

    /// Remove the branch at `index`.
    pub fn without_branch(&self, index: usize) -> Result<Self, EditError> {
        self.map_branches("remove branch", |children| {
            check_index("branches", index, children.len())?;
            let mut next = children.to_vec();
            next.remove(index);
            Ok(next)
        })
    }

    /// Replace the branch at `index`.
    pub fn with_branch(&self, index: usize, branch: SchemaNode) -> Result<Self, EditError> {
        self.map_branches("replace branch", |children| {
            check_index("branches", index, children.len())?;
            let mut next = children.to_vec();
            next[index] = Arc::new(branch);
            Ok(next)
        })
    }

    // ─── Definitions ─────────────────────────────────────────────────

    fn definition_entries(&self) -> &[Definition] {
        self.definitions.as_ref().map_or(&[], |d| d.entries())
    }

    fn with_definition_entries(&self, entries: Vec<Definition>) -> Self {
        Self {
            definitions: Some(Definitions::from_vec_unchecked(entries)),
            ..self.clone()
        }
    }

    fn definition_index(&self, name: &str) -> Result<usize, EditError> {
        self.definition_entries()
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| EditError::UnknownDefinition(name.to_string()))
    }

    /// Append a definition holding the initial schema under a fresh name
    /// (`definition`, `definition_1`, `definition_2`, ...).
    pub fn with_definition_added(&self) -> Self {
        let defs = self.definitions.clone().unwrap_or_default();
        let name = (0..)
            .map(|n| match n {
                0 => NEW_DEFINITION_NAME.to_string(),
                n => format!("{NEW_DEFINITION_NAME}_{n}"),
            })
            .find(|candidate| !defs.contains(candidate))
            .unwrap_or_else(|| NEW_DEFINITION_NAME.to_string());
        let mut entries = self.definition_entries().to_vec();
        entries.push(Definition {
            name,
            schema: Arc::new(SchemaNode::initial()),
        });
        self.with_definition_entries(entries)
    }

    /// Insert a named definition at the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns `EditError::DuplicateDefinition` or `EditError::EmptyDefinitionName`.
    pub fn with_definition_inserted(
        &self,
        name: impl Into<String>,
        schema: SchemaNode,
    ) -> Result<Self, EditError> {
        let name = name.into();
        self.definitions
            .clone()
            .unwrap_or_default()
            .check_name(&name)?;
        let mut entries = self.definition_entries().to_vec();
        entries.push(Definition {
            name,
            schema: Arc::new(schema),
        });
        Ok(self.with_definition_entries(entries))
    }

    /// Remove the definition named `name`.
    pub fn without_definition(&self, name: &str) -> Result<Self, EditError> {
        let index = self.definition_index(name)?;
        let mut entries = self.definition_entries().to_vec();
        entries.remove(index);
        Ok(self.with_definition_entries(entries))
    }

    /// Rename a definition, keeping its position.
    ///
    /// References to the old name are left as they are; `$ref` strings are
    /// free text.
    pub fn with_definition_renamed(&self, from: &str, to: impl Into<String>) -> Result<Self, EditError> {
        let to = to.into();
        let index = self.definition_index(from)?;
        if from == to {
            return Ok(self.clone());
        }
        self.definitions
            .clone()
            .unwrap_or_default()
            .check_name(&to)?;
        let mut entries = self.definition_entries().to_vec();
        entries[index].name = to;
        Ok(self.with_definition_entries(entries))
    }

    /// Replace the body of the definition named `name`.
    pub fn with_definition_schema(&self, name: &str, schema: SchemaNode) -> Result<Self, EditError> {
        let index = self.definition_index(name)?;
        let mut entries = self.definition_entries().to_vec();
        entries[index].schema = Arc::new(schema);
        Ok(self.with_definition_entries(entries))
    }

    /// `$ref` suggestions for the builder, one per definition.
    pub fn reference_suggestions(&self) -> Vec<String> {
        self.definition_entries()
            .iter()
            .map(|d| format!("#/$defs/{}", d.name))
            .collect()
    }

    // ─── Path addressing ─────────────────────────────────────────────

    fn child(&self, segment: PathSegment) -> Option<&Arc<SchemaNode>> {
        match segment {
            PathSegment::Property(i) => self
                .simple()?
                .object
                .as_ref()?
                .properties
                .get(i)
                .map(|p| &p.schema),
            PathSegment::PatternProperty(i) => self
                .simple()?
                .object
                .as_ref()?
                .pattern_properties
                .get(i)
                .map(|p| &p.schema),
            PathSegment::Items => self.simple()?.array.as_ref()?.items.as_ref(),
            PathSegment::Branch(i) => self.combinator()?.children().get(i),
            PathSegment::Definition(i) => self.definition_entries().get(i).map(|d| &d.schema),
        }
    }

    fn with_child(&self, segment: PathSegment, child: SchemaNode) -> Result<Self, EditError> {
        match segment {
            PathSegment::Property(i) => self.map_object(|o| o.with_property_schema(i, child)),
            PathSegment::PatternProperty(i) => self.map_object(|o| o.with_pattern_schema(i, child)),
            PathSegment::Items => self.map_array(|a| a.with_items(child)),
            PathSegment::Branch(i) => self.with_branch(i, child),
            PathSegment::Definition(i) => {
                let mut entries = self.definition_entries().to_vec();
                check_index("$defs", i, entries.len())?;
                entries[i].schema = Arc::new(child);
                Ok(self.with_definition_entries(entries))
            }
        }
    }

    /// The node addressed by `path`, if it exists.
    pub fn node_at(&self, path: &NodePath) -> Option<&SchemaNode> {
        let mut node = self;
        for segment in path.segments() {
            node = node.child(*segment)?;
        }
        Some(node)
    }

    /// Replace the node addressed by `path` with `f(node)`.
    ///
    /// # Errors
    ///
    /// Returns `EditError::IndexOutOfRange` (or a shape error) when the path
    /// does not resolve, or whatever `f` returns.
    pub fn update_at(
        &self,
        path: &NodePath,
        f: impl FnOnce(&SchemaNode) -> Result<SchemaNode, EditError>,
    ) -> Result<Self, EditError> {
        self.update_segments(path.segments(), f)
    }

    fn update_segments(
        &self,
        segments: &[PathSegment],
        f: impl FnOnce(&SchemaNode) -> Result<SchemaNode, EditError>,
    ) -> Result<Self, EditError> {
        let Some((first, rest)) = segments.split_first() else {
            return f(self);
        };
        let child = self.child(*first).ok_or_else(|| missing_segment(self, *first))?;
        let updated = child.update_segments(rest, f)?;
        self.with_child(*first, updated)
    }
}

fn missing_segment(node: &SchemaNode, segment: PathSegment) -> EditError {
    let (list, index, len) = match segment {
        PathSegment::Property(i) => (
            "properties",
            i,
            node.simple()
                .and_then(|f| f.object.as_ref())
                .map_or(0, |o| o.properties.len()),
        ),
        PathSegment::PatternProperty(i) => (
            "patternProperties",
            i,
            node.simple()
                .and_then(|f| f.object.as_ref())
                .map_or(0, |o| o.pattern_properties.len()),
        ),
        PathSegment::Items => ("items", 0, 0),
        PathSegment::Branch(i) => ("branches", i, node.combinator().map_or(0, |c| c.children().len())),
        PathSegment::Definition(i) => ("$defs", i, node.definition_entries().len()),
    };
    EditError::IndexOutOfRange { list, index, len }
}
