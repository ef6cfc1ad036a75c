//! Triple ingestion: statement streams in, typed graph mutations out.
//!
//! Two variants share the same statement model and tolerance rules:
//!
//! - [`dbpedia`]: a dedicated type pass discovers vertices, then a data pass
//!   attaches attributes and edges between known vertices
//! - [`imdb`]: a single pass that discovers vertices lazily from
//!   `<type>/<id>` IRIs and ignores literals
//!
//! Individual statements that cannot be used are counted in a [`PassReport`]
//! and skipped. Only a stream that cannot be read ends a pass with an error.

pub mod dbpedia;
pub mod imdb;

use std::collections::BTreeSet;

use oxigraph::io::{RdfParseError, RdfParser};
use petgraph::stable_graph::EdgeIndex;
use oxigraph::model::{Quad, Term};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, IngestError};
use crate::graph::GraphResult;
use crate::source::Source;

pub use dbpedia::DbpediaLoader;
pub use imdb::ImdbLoader;

/// The object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectTerm {
    /// An IRI naming another resource.
    Resource(String),
    /// A literal value (lexical form only).
    Literal(String),
}

/// A `(subject, predicate, object)` statement with an IRI subject and predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: ObjectTerm,
}

impl Statement {
    pub fn resource(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: ObjectTerm::Resource(object.into()),
        }
    }

    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: ObjectTerm::Literal(value.into()),
        }
    }
}

/// Why an item of a statement stream is not a usable statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// This one statement is unusable; the stream continues.
    Record(String),
    /// The stream itself failed; nothing further can be read.
    Stream(String),
}

/// Parse a source into a statement stream with `oxigraph`.
///
/// Syntax errors and statements with blank-node subjects or objects are
/// reported as [`ReadError::Record`]; I/O failures as [`ReadError::Stream`].
pub fn statements(source: Source) -> impl Iterator<Item = Result<Statement, ReadError>> {
    let format = source.format;
    RdfParser::from_format(format)
        .for_reader(source.into_reader())
        .map(|parsed| match parsed {
            Ok(quad) => statement_from_quad(quad),
            Err(RdfParseError::Io(e)) => Err(ReadError::Stream(e.to_string())),
            Err(e) => Err(ReadError::Record(e.to_string())),
        })
}

fn statement_from_quad(quad: Quad) -> Result<Statement, ReadError> {
    let subject = match Term::from(quad.subject) {
        Term::NamedNode(node) => node.into_string(),
        other => return Err(ReadError::Record(format!("subject is not an IRI: {other}"))),
    };
    let object = match quad.object {
        Term::NamedNode(node) => ObjectTerm::Resource(node.into_string()),
        Term::Literal(literal) => ObjectTerm::Literal(literal.value().to_string()),
        other => return Err(ReadError::Record(format!("unsupported object: {other}"))),
    };
    Ok(Statement {
        subject,
        predicate: quad.predicate.into_string(),
        object,
    })
}

// ---------------------------------------------------------------------------
// Identifier normalization
// ---------------------------------------------------------------------------

/// Lowercase an IRI and drop its first `prefix_len` characters.
///
/// IRIs no longer than the prefix are kept whole.
pub fn strip_prefix_chars(iri: &str, prefix_len: usize) -> String {
    let lower = iri.to_lowercase();
    match lower.char_indices().nth(prefix_len) {
        Some((offset, _)) => lower[offset..].to_string(),
        None => lower,
    }
}

/// Lowercased local name of an IRI: the text after the last `#` or `/`.
pub fn local_name(iri: &str) -> String {
    let start = iri.rfind(['#', '/']).map(|i| i + 1).unwrap_or(0);
    iri[start..].to_lowercase()
}

/// Split a stripped IRI into `(type, id)`.
///
/// Trailing empty segments are ignored; anything other than exactly two
/// non-empty segments is rejected.
pub fn split_typed_id(stripped: &str) -> Option<(&str, &str)> {
    let mut segments: Vec<&str> = stripped.split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    match segments.as_slice() {
        [ty, id] if !ty.is_empty() && !id.is_empty() => Some((ty, id)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Counters from one pass over one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Statements read, including skipped ones.
    pub statements: usize,
    /// Edges plus attributes admitted.
    pub graph_size: usize,
    pub vertices_created: usize,
    pub subjects_not_found: usize,
    pub objects_not_found: usize,
    pub self_loops: usize,
    /// Skipped because the schema filter rejected a type or attribute.
    pub filtered: usize,
    /// Unusable statements: bad identifiers, blank nodes, syntax errors.
    pub malformed: usize,
    /// Literal objects dropped by the attribute-free variant.
    pub literals_ignored: usize,
    /// Edges the graph refused for any other reason.
    pub edges_rejected: usize,
    /// Distinct types seen on admitted vertices.
    pub types: BTreeSet<String>,
}

impl PassReport {
    /// Count the outcome of one edge insertion.
    pub fn record_edge(&mut self, result: GraphResult<EdgeIndex>) {
        match result {
            Ok(_) => self.graph_size += 1,
            Err(GraphError::SelfLoop { .. }) => self.self_loops += 1,
            Err(GraphError::VertexNotFound { .. }) => self.objects_not_found += 1,
            Err(e) => {
                tracing::debug!(error = %e, "edge rejected");
                self.edges_rejected += 1;
            }
        }
    }
}

/// Which pass a file was loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Types,
    Data,
    Imdb,
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Loaded { report: PassReport },
    /// Empty path; nothing to load.
    Skipped,
    Failed { message: String },
}

/// One entry per input path, in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: String,
    pub pass: PassKind,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Outcome of a multi-file load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub files: Vec<FileOutcome>,
}

impl LoadSummary {
    pub fn failed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. }))
            .count()
    }

    pub fn loaded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Loaded { .. }))
            .count()
    }
}

/// Run one pass over `path`, recording the outcome instead of propagating it.
pub(crate) fn run_pass<F>(summary: &mut LoadSummary, path: &str, pass: PassKind, run: F)
where
    F: FnOnce(&str) -> Result<PassReport, IngestError>,
{
    let status = if path.is_empty() {
        tracing::warn!(?pass, "no input path given, skipping");
        FileStatus::Skipped
    } else {
        match run(path) {
            Ok(report) => FileStatus::Loaded { report },
            Err(e) => {
                tracing::error!(path, ?pass, error = %e, "load failed");
                FileStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    };
    summary.files.push(FileOutcome {
        path: path.to_string(),
        pass,
        status,
    });
}

/// Convert a stream-level read failure into the pass error for `path`.
pub(crate) fn stream_error(path: &str, message: String) -> IngestError {
    IngestError::Stream {
        path: path.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use oxigraph::io::RdfFormat;

    use super::*;

    #[test]
    fn strip_prefix_lowercases_and_cuts() {
        assert_eq!(
            strip_prefix_chars("http://dbpedia.org/resource/Alice_Smith", 28),
            "alice_smith"
        );
        assert_eq!(strip_prefix_chars("http://short/X", 28), "http://short/x");
    }

    #[test]
    fn strip_prefix_counts_characters() {
        assert_eq!(strip_prefix_chars("äbc/Déf", 4), "déf");
    }

    #[test]
    fn local_name_after_slash_or_hash() {
        assert_eq!(local_name("http://dbpedia.org/ontology/Person"), "person");
        assert_eq!(local_name("http://xmlns.com/foaf/0.1#Name"), "name");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn split_typed_id_requires_two_segments() {
        assert_eq!(split_typed_id("actor/nm001"), Some(("actor", "nm001")));
        assert_eq!(split_typed_id("actor/nm001/"), Some(("actor", "nm001")));
        assert_eq!(split_typed_id("actor/nm001/extra"), None);
        assert_eq!(split_typed_id("actor"), None);
        assert_eq!(split_typed_id("/nm001"), None);
    }

    #[test]
    fn statements_from_ntriples() {
        let data = br#"<http://ex.org/a> <http://ex.org/knows> <http://ex.org/b> .
<http://ex.org/a> <http://ex.org/name> "Alice" .
_:x <http://ex.org/knows> <http://ex.org/b> .
"#;
        let source = Source::from_bytes("mem", RdfFormat::NTriples, data.to_vec());
        let items: Vec<_> = statements(source).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0],
            Ok(Statement::resource(
                "http://ex.org/a",
                "http://ex.org/knows",
                "http://ex.org/b"
            ))
        );
        assert_eq!(
            items[1],
            Ok(Statement::literal("http://ex.org/a", "http://ex.org/name", "Alice"))
        );
        assert!(matches!(items[2], Err(ReadError::Record(_))));
    }

    #[test]
    fn record_edge_classifies_every_outcome() {
        let mut report = PassReport::default();
        report.record_edge(Ok(EdgeIndex::new(0)));
        report.record_edge(Err(GraphError::SelfLoop {
            id: "a".into(),
            label: "knows".into(),
        }));
        report.record_edge(Err(GraphError::VertexNotFound { id: "z".into() }));
        report.record_edge(Err(GraphError::DuplicateVertex { id: "a".into() }));
        assert_eq!(report.graph_size, 1);
        assert_eq!(report.self_loops, 1);
        assert_eq!(report.objects_not_found, 1);
        assert_eq!(report.edges_rejected, 1);
        assert_eq!(report.malformed, 0);
    }

    #[test]
    fn summary_counts() {
        let mut summary = LoadSummary::default();
        run_pass(&mut summary, "", PassKind::Data, |_| unreachable!());
        run_pass(&mut summary, "ok.nt", PassKind::Data, |_| Ok(PassReport::default()));
        run_pass(&mut summary, "bad.nt", PassKind::Data, |p| {
            Err(stream_error(p, "boom".into()))
        });
        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.files[0].status, FileStatus::Skipped);
        assert_eq!(summary.loaded(), 1);
        assert_eq!(summary.failed(), 1);
    }
}
