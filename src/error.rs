//! Rich diagnostic error types for graph-delta-loader.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the loader.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum LoaderError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Change(#[from] ChangeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("vertex not found: \"{id}\"")]
    #[diagnostic(
        code(gdl::graph::vertex_not_found),
        help(
            "Edges can only connect vertices that already exist in the graph. \
             Add the vertex first, or check the identifier normalization."
        )
    )]
    VertexNotFound { id: String },

    #[error("duplicate vertex: \"{id}\" already exists")]
    #[diagnostic(
        code(gdl::graph::duplicate_vertex),
        help(
            "Vertex identifiers are unique within a graph. Look the vertex up \
             with `get_node` and add types or attributes to it instead."
        )
    )]
    DuplicateVertex { id: String },

    #[error("self-loop rejected on \"{id}\" (label \"{label}\")")]
    #[diagnostic(
        code(gdl::graph::self_loop),
        help("The graph never stores an edge whose source and target are the same vertex.")
    )]
    SelfLoop { id: String, label: String },

    #[error("edge not found: \"{source_id}\" -[{label}]-> \"{target_id}\"")]
    #[diagnostic(
        code(gdl::graph::edge_not_found),
        help("No edge with this label connects the two vertices in this direction.")
    )]
    EdgeNotFound {
        source_id: String,
        target_id: String,
        label: String,
    },
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("source unavailable: \"{path}\": {message}")]
    #[diagnostic(
        code(gdl::source::unavailable),
        help(
            "The triple source could not be opened. For local files check that \
             the path exists and is readable; for remote objects check the \
             container, key, region and network access."
        )
    )]
    Unavailable { path: String, message: String },

    #[error("invalid object address: \"{path}\"")]
    #[diagnostic(
        code(gdl::source::invalid_address),
        help(
            "Remote objects are addressed as \"<container>/<key>\". \
             The address must contain at least one '/' with text on both sides."
        )
    )]
    InvalidAddress { path: String },
}

// ---------------------------------------------------------------------------
// Ingestion errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error("failed reading triples from \"{path}\": {message}")]
    #[diagnostic(
        code(gdl::ingest::stream),
        help(
            "The triple stream could not be read to the end. The source may be \
             truncated, unreadable, or in a different RDF syntax than expected."
        )
    )]
    Stream { path: String, message: String },

    #[error("unsupported RDF language: \"{language}\"")]
    #[diagnostic(
        code(gdl::ingest::unsupported_format),
        help(
            "Supported languages are: ntriples, nquads, turtle, trig, rdfxml and n3. \
             Set `storage.language` in the config file."
        )
    )]
    UnsupportedFormat { language: String },
}

// ---------------------------------------------------------------------------
// Change loading errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ChangeError {
    #[error("malformed change file: {source}")]
    #[diagnostic(
        code(gdl::change::json),
        help(
            "The change file must be a JSON array of objects, each with a \
             `typeOfChange` of insertVertex, deleteVertex, insertEdge, deleteEdge, \
             insertAttr, deleteAttr or changeAttr and the fields that kind requires."
        )
    )]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("vertex change at index {index} for \"{id}\" has no types")]
    #[diagnostic(
        code(gdl::change::empty_types),
        help("Every vertex in a change file needs at least one entry in `types`; the first is its primary type.")
    )]
    EmptyTypes { index: usize, id: String },

    #[error("failed to read change file \"{path}\"")]
    #[diagnostic(
        code(gdl::change::io),
        help("Ensure the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Change application errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ApplyError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error("attribute \"{name}\" not found on vertex \"{vertex_id}\"")]
    #[diagnostic(
        code(gdl::apply::attribute_not_found),
        help("A deleteAttr change names an attribute the vertex does not carry.")
    )]
    AttributeNotFound { vertex_id: String, name: String },

    #[error("change #{index} ({change_type}) could not be applied: {source}")]
    #[diagnostic(
        code(gdl::apply::change_failed),
        help(
            "Changes are applied in order and stop at the first failure; \
             the changes before this index were applied. Check that the change \
             list was computed against this graph snapshot."
        )
    )]
    Failed {
        index: usize,
        change_type: String,
        #[source]
        source: Box<ApplyError>,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read loader config: {path}")]
    #[diagnostic(
        code(gdl::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse loader config {path}: {message}")]
    #[diagnostic(
        code(gdl::config::parse),
        help("Check the TOML syntax and the [storage], [schema] and [prefix] tables.")
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning loader results.
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;
