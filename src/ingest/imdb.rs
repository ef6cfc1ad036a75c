//! Simplified IMDB-style loading: vertices, types and edges in one pass.
//!
//! Resource IRIs look like `http://imdb.org/<type>/<id>`. Vertices are keyed
//! by `<id>` and created the first time either endpoint mentions them. Literal
//! objects are dropped, so the resulting graph carries no attributes.

use crate::config::{LoaderConfig, SchemaFilter};
use crate::error::IngestError;
use crate::graph::{RelationshipEdge, TypedGraph};
use crate::source::{self, SourceResolver};

use super::dbpedia::accept;
use super::{
    local_name, run_pass, split_typed_id, statements, strip_prefix_chars, LoadSummary,
    ObjectTerm, PassKind, PassReport, ReadError, Statement,
};

/// Builds an attribute-free [`TypedGraph`] from IMDB-style files.
pub struct ImdbLoader {
    resolver: Box<dyn SourceResolver>,
    filter: SchemaFilter,
    prefix_len: usize,
    graph: TypedGraph,
}

impl ImdbLoader {
    pub fn new(resolver: Box<dyn SourceResolver>, filter: SchemaFilter, prefix_len: usize) -> Self {
        Self {
            resolver,
            filter,
            prefix_len,
            graph: TypedGraph::new(),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self, IngestError> {
        Ok(Self::new(
            source::resolver_for(&config.storage)?,
            config.schema_filter(),
            config.prefix.imdb,
        ))
    }

    /// Load every file in order; failed files are logged and recorded.
    pub fn load<P: AsRef<str>>(&mut self, paths: &[P]) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for path in paths {
            run_pass(&mut summary, path.as_ref(), PassKind::Imdb, |p| {
                self.load_imdb_graph(p)
            });
        }
        summary
    }

    pub fn load_imdb_graph(&mut self, path: &str) -> Result<PassReport, IngestError> {
        tracing::info!(path, "loading IMDB graph");
        let source = self.resolver.open(path)?;
        self.ingest(path, statements(source))
    }

    /// Single pass over an already-open statement stream.
    pub fn ingest<I>(&mut self, name: &str, statements: I) -> Result<PassReport, IngestError>
    where
        I: IntoIterator<Item = Result<Statement, ReadError>>,
    {
        let mut report = PassReport::default();
        for item in statements {
            report.statements += 1;
            let Some(statement) = accept(name, item, &mut report)? else {
                continue;
            };

            let Some(subject_id) = self.admit_vertex(&statement.subject, &mut report) else {
                continue;
            };

            let object = match statement.object {
                ObjectTerm::Literal(_) => {
                    report.literals_ignored += 1;
                    continue;
                }
                ObjectTerm::Resource(object) => object,
            };
            let Some(object_id) = self.admit_vertex(&object, &mut report) else {
                continue;
            };

            let predicate = local_name(&statement.predicate);
            let added =
                self.graph
                    .add_edge(&subject_id, &object_id, RelationshipEdge::new(predicate));
            report.record_edge(added);
        }

        tracing::info!(
            path = name,
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            types = report.types.len(),
            malformed = report.malformed,
            literals_ignored = report.literals_ignored,
            "IMDB graph loaded"
        );
        tracing::debug!(types = ?report.types, "types seen");
        Ok(report)
    }

    /// Resolve `<type>/<id>` from an IRI and create or re-type its vertex.
    ///
    /// Returns the vertex id, or `None` when the IRI is malformed or its type
    /// is filtered out.
    fn admit_vertex(&mut self, iri: &str, report: &mut PassReport) -> Option<String> {
        let stripped = strip_prefix_chars(iri, self.prefix_len);
        let Some((ty, id)) = split_typed_id(&stripped) else {
            tracing::debug!(iri, "malformed IMDB identifier");
            report.malformed += 1;
            return None;
        };
        if !self.filter.admits_type(ty) {
            report.filtered += 1;
            return None;
        }
        if !self.graph.contains(id) {
            report.vertices_created += 1;
        }
        self.graph.upsert_typed(id, ty);
        report.types.insert(ty.to_string());
        Some(id.to_string())
    }

    pub fn graph(&self) -> &TypedGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TypedGraph {
        self.graph
    }
}
