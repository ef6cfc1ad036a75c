//! Typed property graph: vertices with multiple types and attributes, joined by
//! directed labeled edges.
//!
//! - [`DataVertex`] carries a primary type, a set of extra types and an attribute map
//! - [`RelationshipEdge`] is the edge weight; endpoints are owned by the graph
//! - [`TypedGraph`] is the container, backed by a `petgraph` stable graph and an
//!   id → node index map, so vertex identity is the `id` string alone

pub mod index;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub use index::{EdgeView, GraphResult, TypedGraph};

/// A name/value pair attached to a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A vertex of the typed graph.
///
/// The id is the vertex's identity. Once a vertex exists, later observations of
/// the same id only add types or attributes to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataVertex {
    id: String,
    primary_type: String,
    extra_types: BTreeSet<String>,
    attributes: BTreeMap<String, Attribute>,
}

impl DataVertex {
    /// Create a vertex with a single (primary) type and no attributes.
    pub fn new(id: impl Into<String>, primary_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary_type: primary_type.into(),
            extra_types: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn extra_types(&self) -> &BTreeSet<String> {
        &self.extra_types
    }

    /// All types of this vertex, primary type first.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_type.as_str()).chain(self.extra_types.iter().map(String::as_str))
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.primary_type == ty || self.extra_types.contains(ty)
    }

    /// Add a type. Returns `false` if the vertex already had it.
    pub fn add_type(&mut self, ty: impl Into<String>) -> bool {
        let ty = ty.into();
        if ty == self.primary_type {
            return false;
        }
        self.extra_types.insert(ty)
    }

    /// Set an attribute, replacing any previous attribute with the same name.
    pub fn set_attribute(&mut self, attribute: Attribute) -> Option<Attribute> {
        self.attributes.insert(attribute.name.clone(), attribute)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Edge weight stored on graph edges: the relationship label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    label: String,
}

impl RelationshipEdge {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
