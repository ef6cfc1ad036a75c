//! DBpedia-style loading: a type pass, then a data pass.
//!
//! Type files hold `rdf:type` statements and are the only place vertices are
//! created. Data files then attach literal-valued statements as attributes and
//! resource-valued statements as edges, but only between vertices the type
//! pass already created.

use crate::config::{LoaderConfig, SchemaFilter};
use crate::error::IngestError;
use crate::graph::{Attribute, RelationshipEdge, TypedGraph};
use crate::source::{self, SourceResolver};

use super::{
    local_name, run_pass, statements, stream_error, strip_prefix_chars, LoadSummary, ObjectTerm,
    PassKind, PassReport, ReadError, Statement,
};

/// Builds a [`TypedGraph`] from DBpedia type and data files.
pub struct DbpediaLoader {
    resolver: Box<dyn SourceResolver>,
    filter: SchemaFilter,
    prefix_len: usize,
    graph: TypedGraph,
}

impl DbpediaLoader {
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
            config.prefix.dbpedia,
        ))
    }

    /// Load every type file, then every data file, each in the given order.
    ///
    /// A file that fails is logged and recorded; the remaining files still load.
    pub fn load<T, D>(&mut self, type_paths: &[T], data_paths: &[D]) -> LoadSummary
    where
        T: AsRef<str>,
        D: AsRef<str>,
    {
        let mut summary = LoadSummary::default();
        for path in type_paths {
            run_pass(&mut summary, path.as_ref(), PassKind::Types, |p| {
                self.load_node_map(p)
            });
        }
        for path in data_paths {
            run_pass(&mut summary, path.as_ref(), PassKind::Data, |p| {
                self.load_data_graph(p)
            });
        }
        summary
    }

    /// Type pass over one file.
    pub fn load_node_map(&mut self, path: &str) -> Result<PassReport, IngestError> {
        tracing::info!(path, "loading node types");
        let source = self.resolver.open(path)?;
        self.ingest_types(path, statements(source))
    }

    /// Data pass over one file.
    pub fn load_data_graph(&mut self, path: &str) -> Result<PassReport, IngestError> {
        tracing::info!(path, "loading data graph");
        let source = self.resolver.open(path)?;
        self.ingest_data(path, statements(source))
    }

    /// Type pass over an already-open statement stream.
    ///
    /// Creates a vertex per new subject with the object's local name as its
    /// primary type, or adds the type to an existing vertex.
    pub fn ingest_types<I>(&mut self, name: &str, statements: I) -> Result<PassReport, IngestError>
    where
        I: IntoIterator<Item = Result<Statement, ReadError>>,
    {
        let mut report = PassReport::default();
        for item in statements {
            report.statements += 1;
            let Some(statement) = accept(name, item, &mut report)? else {
                continue;
            };
            let ObjectTerm::Resource(type_iri) = &statement.object else {
                tracing::debug!(subject = %statement.subject, "type statement with literal object");
                report.malformed += 1;
                continue;
            };

            let id = strip_prefix_chars(&statement.subject, self.prefix_len);
            let ty = local_name(type_iri);
            if !self.filter.admits_type(&ty) {
                report.filtered += 1;
                continue;
            }

            if !self.graph.contains(&id) {
                report.vertices_created += 1;
            }
            self.graph.upsert_typed(&id, &ty);
            report.types.insert(ty);
        }

        tracing::info!(
            path = name,
            vertices = self.graph.vertex_count(),
            types = report.types.len(),
            filtered = report.filtered,
            malformed = report.malformed,
            "node types loaded"
        );
        Ok(report)
    }

    /// Data pass over an already-open statement stream.
    pub fn ingest_data<I>(&mut self, name: &str, statements: I) -> Result<PassReport, IngestError>
    where
        I: IntoIterator<Item = Result<Statement, ReadError>>,
    {
        let mut report = PassReport::default();
        for item in statements {
            report.statements += 1;
            let Some(statement) = accept(name, item, &mut report)? else {
                continue;
            };

            let subject_id = strip_prefix_chars(&statement.subject, self.prefix_len);
            let predicate = local_name(&statement.predicate);
            let Some(subject) = self.graph.get_node_mut(&subject_id) else {
                report.subjects_not_found += 1;
                continue;
            };

            match statement.object {
                ObjectTerm::Literal(value) => {
                    if self.filter.admits_attribute(&predicate) {
                        subject.set_attribute(Attribute::new(predicate, value.to_lowercase()));
                        report.graph_size += 1;
                    } else {
                        report.filtered += 1;
                    }
                }
                ObjectTerm::Resource(object) => {
                    let object_id = strip_prefix_chars(&object, self.prefix_len);
                    let added = self.graph.add_edge(
                        &subject_id,
                        &object_id,
                        RelationshipEdge::new(predicate),
                    );
                    report.record_edge(added);
                }
            }
        }

        tracing::info!(
            path = name,
            subjects_not_found = report.subjects_not_found,
            objects_not_found = report.objects_not_found,
            self_loops = report.self_loops,
            "subjects and objects not found"
        );
        tracing::info!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            graph_size = report.graph_size,
            "data graph loaded"
        );
        Ok(report)
    }

    pub fn graph(&self) -> &TypedGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TypedGraph {
        self.graph
    }
}

/// Unwrap one stream item: record-level problems are counted and skipped,
/// stream-level ones end the pass.
pub(super) fn accept(
    name: &str,
    item: Result<Statement, ReadError>,
    report: &mut PassReport,
) -> Result<Option<Statement>, IngestError> {
    match item {
        Ok(statement) => Ok(Some(statement)),
        Err(ReadError::Record(message)) => {
            tracing::debug!(path = name, %message, "skipping unreadable statement");
            report.malformed += 1;
            Ok(None)
        }
        Err(ReadError::Stream(message)) => Err(stream_error(name, message)),
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::io::RdfFormat;

    use super::*;
    use crate::source::LocalFiles;

    const RES: &str = "http://dbpedia.org/resource/";
    const ONT: &str = "http://dbpedia.org/ontology/";
    const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    fn res(name: &str) -> String {
        format!("{RES}{name}")
    }

    fn typed(name: &str, ty: &str) -> Result<Statement, ReadError> {
        Ok(Statement::resource(res(name), RDF_TYPE, format!("{ONT}{ty}")))
    }

    fn loader(filter: SchemaFilter) -> DbpediaLoader {
        DbpediaLoader::new(Box::new(LocalFiles::new(RdfFormat::NTriples)), filter, 28)
    }

    #[test]
    fn type_pass_creates_and_augments() {
        let mut l = loader(SchemaFilter::disabled());
        let report = l
            .ingest_types(
                "types",
                vec![
                    typed("Alice", "Person"),
                    typed("Alice", "Scientist"),
                    typed("Alice", "Person"),
                    typed("Bob", "Person"),
                ],
            )
            .unwrap();

        assert_eq!(report.statements, 4);
        assert_eq!(report.vertices_created, 2);
        assert_eq!(l.graph().vertex_count(), 2);
        let alice = l.graph().get_node("alice").unwrap();
        assert_eq!(alice.primary_type(), "person");
        assert_eq!(alice.extra_types().iter().collect::<Vec<_>>(), vec!["scientist"]);
    }

    #[test]
    fn type_pass_filters_unknown_types() {
        let mut l = loader(SchemaFilter::new(["person"], Vec::<String>::new()));
        let report = l
            .ingest_types("types", vec![typed("Alice", "Person"), typed("Paris", "Place")])
            .unwrap();
        assert_eq!(report.filtered, 1);
        assert!(l.graph().contains("alice"));
        assert!(!l.graph().contains("paris"));
    }

    #[test]
    fn type_pass_skips_bad_records() {
        let mut l = loader(SchemaFilter::disabled());
        let report = l
            .ingest_types(
                "types",
                vec![
                    Err(ReadError::Record("bad line".into())),
                    Ok(Statement::literal(res("Alice"), RDF_TYPE, "Person")),
                    typed("Alice", "Person"),
                ],
            )
            .unwrap();
        assert_eq!(report.malformed, 2);
        assert_eq!(l.graph().vertex_count(), 1);
    }

    #[test]
    fn stream_failure_aborts_pass() {
        let mut l = loader(SchemaFilter::disabled());
        let err = l
            .ingest_types(
                "types",
                vec![typed("Alice", "Person"), Err(ReadError::Stream("reset".into()))],
            )
            .unwrap_err();
        assert!(matches!(err, IngestError::Stream { .. }));
    }

    #[test]
    fn data_pass_counts_missing_endpoints_and_loops() {
        let mut l = loader(SchemaFilter::disabled());
        l.ingest_types("types", vec![typed("A", "Person"), typed("B", "Person")])
            .unwrap();

        let knows = format!("{ONT}knows");
        let report = l
            .ingest_data(
                "data",
                vec![
                    Ok(Statement::resource(res("A"), &knows, res("B"))),
                    Ok(Statement::resource(res("Ghost"), &knows, res("B"))),
                    Ok(Statement::resource(res("A"), &knows, res("Nobody"))),
                    Ok(Statement::resource(res("A"), &knows, res("A"))),
                ],
            )
            .unwrap();

        assert_eq!(report.graph_size, 1);
        assert_eq!(report.subjects_not_found, 1);
        assert_eq!(report.objects_not_found, 1);
        assert_eq!(report.self_loops, 1);
        assert_eq!(l.graph().edge_count(), 1);
        assert_eq!(l.graph().vertex_count(), 2);
    }

    #[test]
    fn data_pass_attribute_filter() {
        let mut l = loader(SchemaFilter::new(["person"], ["name"]));
        l.ingest_types("types", vec![typed("A", "Person")]).unwrap();
        let report = l
            .ingest_data(
                "data",
                vec![
                    Ok(Statement::literal(res("A"), format!("{ONT}name"), "Alice")),
                    Ok(Statement::literal(res("A"), format!("{ONT}age"), "30")),
                ],
            )
            .unwrap();
        assert_eq!(report.graph_size, 1);
        assert_eq!(report.filtered, 1);
        let a = l.graph().get_node("a").unwrap();
        assert_eq!(a.attribute("name").unwrap().value(), "alice");
        assert!(a.attribute("age").is_none());
    }

    #[test]
    fn load_continues_after_failed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let types = dir.path().join("types.nt");
        std::fs::write(
            &types,
            format!("<{}> <{RDF_TYPE}> <{ONT}Person> .\n", res("A")),
        )
        .unwrap();
        let types = types.to_str().unwrap().to_string();

        let mut l = loader(SchemaFilter::disabled());
        let summary = l.load(&["/missing/types.nt".to_string(), types], &[""]);
        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.loaded(), 1);
        assert!(l.graph().contains("a"));
    }
}
