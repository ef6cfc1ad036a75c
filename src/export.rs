//! Export types for serializing loader results.
//!
//! These are human-readable summaries of a loaded graph or change list,
//! suitable for JSON output from the CLI or for handing to other tools.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::changes::{Change, ChangeType};
use crate::graph::TypedGraph;
use crate::ingest::LoadSummary;

/// Sizes and type histogram of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    pub attributes: usize,
    /// Vertex count per type; multi-typed vertices count under each type.
    pub types: BTreeMap<String, usize>,
    /// Edge count per label.
    pub labels: BTreeMap<String, usize>,
}

impl GraphSummary {
    pub fn of(graph: &TypedGraph) -> Self {
        let mut types: BTreeMap<String, usize> = BTreeMap::new();
        let mut attributes = 0;
        for vertex in graph.vertices() {
            for ty in vertex.types() {
                *types.entry(ty.to_string()).or_default() += 1;
            }
            attributes += vertex.attribute_count();
        }
        let mut labels: BTreeMap<String, usize> = BTreeMap::new();
        for edge in graph.edges() {
            *labels.entry(edge.label.to_string()).or_default() += 1;
        }
        Self {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            attributes,
            types,
            labels,
        }
    }
}

/// Exported vertex with its full type list and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexExport {
    pub id: String,
    /// Primary type first.
    pub types: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

/// Exported edge by endpoint ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Full dump of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub vertices: Vec<VertexExport>,
    pub edges: Vec<EdgeExport>,
}

impl GraphExport {
    pub fn of(graph: &TypedGraph) -> Self {
        let vertices = graph
            .vertices()
            .map(|v| VertexExport {
                id: v.id().to_string(),
                types: v.types().map(str::to_string).collect(),
                attributes: v
                    .attributes()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect(),
            })
            .collect();
        let edges = graph
            .edges()
            .map(|e| EdgeExport {
                source: e.source.id().to_string(),
                target: e.target.id().to_string(),
                label: e.label.to_string(),
            })
            .collect();
        Self { vertices, edges }
    }
}

/// Counts of a change list by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub total: usize,
    pub by_type: BTreeMap<ChangeType, usize>,
}

impl ChangeSummary {
    pub fn of(changes: &[Change]) -> Self {
        let mut by_type: BTreeMap<ChangeType, usize> = BTreeMap::new();
        for change in changes {
            *by_type.entry(change.change_type()).or_default() += 1;
        }
        Self {
            total: changes.len(),
            by_type,
        }
    }
}

/// What a triple-load command reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadExport {
    pub files: LoadSummary,
    pub graph: GraphSummary,
    /// Every vertex and edge, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump: Option<GraphExport>,
}

impl LoadExport {
    pub fn new(files: LoadSummary, graph: &TypedGraph, dump: bool) -> Self {
        Self {
            files,
            graph: GraphSummary::of(graph),
            dump: dump.then(|| GraphExport::of(graph)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::parse_changes;
    use crate::graph::{Attribute, DataVertex, RelationshipEdge};

    fn sample() -> TypedGraph {
        let mut g = TypedGraph::new();
        let mut a = DataVertex::new("a", "person");
        a.add_type("scientist");
        a.set_attribute(Attribute::new("name", "alice"));
        g.add_vertex(a).unwrap();
        g.add_vertex(DataVertex::new("b", "person")).unwrap();
        g.add_edge("a", "b", RelationshipEdge::new("knows")).unwrap();
        g
    }

    #[test]
    fn graph_summary_histograms() {
        let s = GraphSummary::of(&sample());
        assert_eq!(s.vertices, 2);
        assert_eq!(s.edges, 1);
        assert_eq!(s.attributes, 1);
        assert_eq!(s.types["person"], 2);
        assert_eq!(s.types["scientist"], 1);
        assert_eq!(s.labels["knows"], 1);
    }

    #[test]
    fn graph_export_json_shape() {
        let json = serde_json::to_value(GraphExport::of(&sample())).unwrap();
        assert_eq!(json["vertices"][0]["id"], "a");
        assert_eq!(json["vertices"][0]["types"][1], "scientist");
        assert_eq!(json["vertices"][0]["attributes"]["name"], "alice");
        assert_eq!(json["edges"][0]["label"], "knows");
    }

    #[test]
    fn load_export_dump_is_optional() {
        let g = sample();
        let brief = serde_json::to_value(LoadExport::new(LoadSummary::default(), &g, false)).unwrap();
        assert!(brief.get("dump").is_none());
        assert_eq!(brief["graph"]["edges"], 1);

        let full = serde_json::to_value(LoadExport::new(LoadSummary::default(), &g, true)).unwrap();
        assert_eq!(full["dump"]["vertices"].as_array().unwrap().len(), 2);
        assert_eq!(full["dump"]["edges"][0]["source"], "a");
        assert_eq!(full["dump"]["edges"][0]["target"], "b");
    }

    #[test]
    fn change_summary_uses_wire_names() {
        let changes = parse_changes(
            r#"[{"typeOfChange": "insertEdge", "src": "a", "dst": "b", "label": "x"},
                {"typeOfChange": "insertEdge", "src": "b", "dst": "a", "label": "x"},
                {"typeOfChange": "deleteAttr", "uri": "a",
                 "attribute": {"attrName": "n", "attrValue": "v"}}]"#,
        )
        .unwrap();
        let summary = ChangeSummary::of(&changes);
        assert_eq!(summary.total, 3);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["by_type"]["insertEdge"], 2);
        assert_eq!(json["by_type"]["deleteAttr"], 1);
    }
}
