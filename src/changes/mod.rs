//! Change records: immutable descriptions of one edit between two graph
//! snapshots.
//!
//! [`Change`] has one variant per [`ChangeType`]. Edge and attribute changes
//! name vertices by id only, so a record can be held independently of any
//! graph and replayed later with [`TypedGraph::apply_change`].

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::{ApplyError, GraphError};
use crate::graph::{Attribute, DataVertex, RelationshipEdge, TypedGraph};

pub use loader::{load_changes, load_changes_from_path, parse_changes};

/// Discriminator of a change record, spelled as in change files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeType {
    InsertVertex,
    DeleteVertex,
    InsertEdge,
    DeleteEdge,
    InsertAttr,
    DeleteAttr,
    ChangeAttr,
}

impl ChangeType {
    pub const ALL: [ChangeType; 7] = [
        ChangeType::InsertVertex,
        ChangeType::DeleteVertex,
        ChangeType::InsertEdge,
        ChangeType::DeleteEdge,
        ChangeType::InsertAttr,
        ChangeType::DeleteAttr,
        ChangeType::ChangeAttr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::InsertVertex => "insertVertex",
            ChangeType::DeleteVertex => "deleteVertex",
            ChangeType::InsertEdge => "insertEdge",
            ChangeType::DeleteEdge => "deleteEdge",
            ChangeType::InsertAttr => "insertAttr",
            ChangeType::DeleteAttr => "deleteAttr",
            ChangeType::ChangeAttr => "changeAttr",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whole vertex as it was inserted or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexChange {
    pub vertex: DataVertex,
}

/// An edge identified by endpoint ids and label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeChange {
    pub source_id: String,
    pub target_id: String,
    pub label: String,
}

/// An attribute edit on the vertex with `vertex_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub vertex_id: String,
    pub attribute: Attribute,
}

/// One atomic edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    InsertVertex(VertexChange),
    DeleteVertex(VertexChange),
    InsertEdge(EdgeChange),
    DeleteEdge(EdgeChange),
    InsertAttr(AttributeChange),
    DeleteAttr(AttributeChange),
    ChangeAttr(AttributeChange),
}

impl Change {
    pub fn change_type(&self) -> ChangeType {
        match self {
            Change::InsertVertex(_) => ChangeType::InsertVertex,
            Change::DeleteVertex(_) => ChangeType::DeleteVertex,
            Change::InsertEdge(_) => ChangeType::InsertEdge,
            Change::DeleteEdge(_) => ChangeType::DeleteEdge,
            Change::InsertAttr(_) => ChangeType::InsertAttr,
            Change::DeleteAttr(_) => ChangeType::DeleteAttr,
            Change::ChangeAttr(_) => ChangeType::ChangeAttr,
        }
    }

    /// Ids of the vertices this change touches.
    pub fn vertex_ids(&self) -> Vec<&str> {
        match self {
            Change::InsertVertex(c) | Change::DeleteVertex(c) => vec![c.vertex.id()],
            Change::InsertEdge(c) | Change::DeleteEdge(c) => {
                vec![c.source_id.as_str(), c.target_id.as_str()]
            }
            Change::InsertAttr(c) | Change::DeleteAttr(c) | Change::ChangeAttr(c) => {
                vec![c.vertex_id.as_str()]
            }
        }
    }
}

impl TypedGraph {
    /// Replay one change against this graph.
    pub fn apply_change(&mut self, change: &Change) -> Result<(), ApplyError> {
        match change {
            Change::InsertVertex(c) => {
                self.add_vertex(c.vertex.clone())?;
            }
            Change::DeleteVertex(c) => {
                self.remove_vertex(c.vertex.id())?;
            }
            Change::InsertEdge(c) => {
                self.add_edge(&c.source_id, &c.target_id, RelationshipEdge::new(c.label.as_str()))?;
            }
            Change::DeleteEdge(c) => {
                self.remove_edge(&c.source_id, &c.target_id, &c.label)?;
            }
            Change::InsertAttr(c) | Change::ChangeAttr(c) => {
                self.vertex_for(&c.vertex_id)?
                    .set_attribute(c.attribute.clone());
            }
            Change::DeleteAttr(c) => {
                let name = c.attribute.name();
                if self.vertex_for(&c.vertex_id)?.remove_attribute(name).is_none() {
                    return Err(ApplyError::AttributeNotFound {
                        vertex_id: c.vertex_id.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Replay changes in order, stopping at the first failure.
    ///
    /// Returns the number of changes applied. On failure the error carries the
    /// index of the offending change; everything before it has been applied.
    pub fn apply_changes(&mut self, changes: &[Change]) -> Result<usize, ApplyError> {
        for (index, change) in changes.iter().enumerate() {
            if let Err(e) = self.apply_change(change) {
                tracing::warn!(index, change_type = %change.change_type(), error = %e, "change rejected");
                return Err(ApplyError::Failed {
                    index,
                    change_type: change.change_type().to_string(),
                    source: Box::new(e),
                });
            }
        }
        tracing::debug!(
            applied = changes.len(),
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            "changes applied"
        );
        Ok(changes.len())
    }

    fn vertex_for(&mut self, id: &str) -> Result<&mut DataVertex, GraphError> {
        self.get_node_mut(id)
            .ok_or_else(|| GraphError::VertexNotFound { id: id.to_string() })
    }
}
