//! In-memory typed graph with an id index.
//!
//! Uses a `petgraph` stable graph as the vertex arena and a `HashMap` from
//! vertex id to `NodeIndex` for lookups. Indices stay valid across removals.

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;

use crate::error::GraphError;

use super::{DataVertex, RelationshipEdge};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// A borrowed view of one edge with both endpoints resolved.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub source: &'a DataVertex,
    pub target: &'a DataVertex,
    pub label: &'a str,
}

/// The mutable graph under construction.
///
/// Owned exclusively by whoever is building it; there is no interior locking.
pub struct TypedGraph {
    graph: StableDiGraph<DataVertex, RelationshipEdge>,
    /// Vertex id → NodeIndex.
    node_index: HashMap<String, NodeIndex>,
}

impl TypedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Look up a vertex by id.
    pub fn get_node(&self, id: &str) -> Option<&DataVertex> {
        let idx = self.node_index.get(id)?;
        self.graph.node_weight(*idx)
    }

    /// Look up a vertex by id for mutation (adding types or attributes).
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut DataVertex> {
        let idx = self.node_index.get(id)?;
        self.graph.node_weight_mut(*idx)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Add a new vertex. Fails if a vertex with the same id exists.
    pub fn add_vertex(&mut self, vertex: DataVertex) -> GraphResult<NodeIndex> {
        if self.node_index.contains_key(vertex.id()) {
            return Err(GraphError::DuplicateVertex {
                id: vertex.id().to_string(),
            });
        }
        let id = vertex.id().to_string();
        let idx = self.graph.add_node(vertex);
        self.node_index.insert(id, idx);
        Ok(idx)
    }

    /// Return the vertex with `id`, creating it with `ty` as primary type when
    /// absent, or adding `ty` to its extra types when present.
    pub fn upsert_typed(&mut self, id: &str, ty: &str) -> &mut DataVertex {
        let idx = match self.node_index.get(id) {
            Some(idx) => {
                let idx = *idx;
                self.graph[idx].add_type(ty);
                idx
            }
            None => {
                let idx = self.graph.add_node(DataVertex::new(id, ty));
                self.node_index.insert(id.to_string(), idx);
                idx
            }
        };
        &mut self.graph[idx]
    }

    /// Add a directed edge between two existing vertices.
    ///
    /// Both endpoints must already be in the graph and must differ.
    pub fn add_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        edge: RelationshipEdge,
    ) -> GraphResult<EdgeIndex> {
        if source_id == target_id {
            return Err(GraphError::SelfLoop {
                id: source_id.to_string(),
                label: edge.label().to_string(),
            });
        }
        let src = self.index_of(source_id)?;
        let dst = self.index_of(target_id)?;
        Ok(self.graph.add_edge(src, dst, edge))
    }

    /// Remove a vertex and every edge touching it.
    pub fn remove_vertex(&mut self, id: &str) -> GraphResult<DataVertex> {
        let idx = self
            .node_index
            .remove(id)
            .ok_or_else(|| GraphError::VertexNotFound { id: id.to_string() })?;
        self.graph
            .remove_node(idx)
            .ok_or_else(|| GraphError::VertexNotFound { id: id.to_string() })
    }

    /// Remove one edge `source -[label]-> target`.
    pub fn remove_edge(&mut self, source_id: &str, target_id: &str, label: &str) -> GraphResult<()> {
        let src = self.index_of(source_id)?;
        let dst = self.index_of(target_id)?;
        let found = self
            .graph
            .edges_connecting(src, dst)
            .find(|e| e.weight().label() == label)
            .map(|e| e.id());
        match found {
            Some(edge) => {
                self.graph.remove_edge(edge);
                Ok(())
            }
            None => Err(GraphError::EdgeNotFound {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
                label: label.to_string(),
            }),
        }
    }

    /// Outgoing edges of a vertex. Empty if the vertex is unknown.
    pub fn outgoing(&self, id: &str) -> Vec<EdgeView<'_>> {
        let Some(idx) = self.node_index.get(id) else {
            return vec![];
        };
        self.graph
            .edges_directed(*idx, Direction::Outgoing)
            .filter_map(|e| self.view(e.source(), e.target(), e.weight()))
            .collect()
    }

    /// Number of edges between the two vertices carrying `label`.
    pub fn edge_multiplicity(&self, source_id: &str, target_id: &str, label: &str) -> usize {
        match (self.node_index.get(source_id), self.node_index.get(target_id)) {
            (Some(src), Some(dst)) => self
                .graph
                .edges_connecting(*src, *dst)
                .filter(|e| e.weight().label() == label)
                .count(),
            _ => 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All vertices, in node index order.
    pub fn vertices(&self) -> impl Iterator<Item = &DataVertex> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
    }

    /// All edges, in edge index order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        (&self.graph)
            .edge_references()
            .filter_map(|e| self.view(e.source(), e.target(), e.weight()))
    }

    fn index_of(&self, id: &str) -> GraphResult<NodeIndex> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::VertexNotFound { id: id.to_string() })
    }

    fn view<'a>(
        &'a self,
        src: NodeIndex,
        dst: NodeIndex,
        edge: &'a RelationshipEdge,
    ) -> Option<EdgeView<'a>> {
        Some(EdgeView {
            source: self.graph.node_weight(src)?,
            target: self.graph.node_weight(dst)?,
            label: edge.label(),
        })
    }
}

impl Default for TypedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedGraph")
            .field("vertices", &self.vertex_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
