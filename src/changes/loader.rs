//! JSON change-file loading.
//!
//! A change file is one JSON array; each element carries a `typeOfChange`
//! discriminator plus the fields of that kind. The whole document is parsed
//! before any record is built, and any deviation fails the entire load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::ChangeError;
use crate::graph::{Attribute, DataVertex};

use super::{AttributeChange, Change, EdgeChange, VertexChange};

/// Result type for change loading.
pub type ChangeResult<T> = std::result::Result<T, ChangeError>;

#[derive(Debug, Deserialize)]
#[serde(tag = "typeOfChange", rename_all = "camelCase")]
enum RawChange {
    InsertVertex { vertex: RawVertex },
    DeleteVertex { vertex: RawVertex },
    InsertEdge { src: String, dst: String, label: String },
    DeleteEdge { src: String, dst: String, label: String },
    InsertAttr { uri: String, attribute: RawAttribute },
    DeleteAttr { uri: String, attribute: RawAttribute },
    ChangeAttr { uri: String, attribute: RawAttribute },
}

#[derive(Debug, Deserialize)]
struct RawVertex {
    #[serde(rename = "vertexURI")]
    uri: String,
    types: Vec<String>,
    #[serde(rename = "allAttributesList")]
    attributes: Vec<RawAttribute>,
}

#[derive(Debug, Deserialize)]
struct RawAttribute {
    #[serde(rename = "attrName")]
    name: String,
    #[serde(rename = "attrValue")]
    value: String,
}

impl From<RawAttribute> for Attribute {
    fn from(raw: RawAttribute) -> Self {
        Attribute::new(raw.name, raw.value)
    }
}

/// Parse a change list from JSON text.
pub fn parse_changes(json: &str) -> ChangeResult<Vec<Change>> {
    let raw: Vec<RawChange> =
        serde_json::from_str(json).map_err(|source| ChangeError::Json { source })?;
    build(raw)
}

/// Parse a change list from a reader holding a JSON array.
pub fn load_changes<R: Read>(reader: R) -> ChangeResult<Vec<Change>> {
    let raw: Vec<RawChange> = serde_json::from_reader(BufReader::new(reader))
        .map_err(|source| ChangeError::Json { source })?;
    build(raw)
}

/// Open and parse a change file.
pub fn load_changes_from_path(path: &Path) -> ChangeResult<Vec<Change>> {
    let file = File::open(path).map_err(|source| ChangeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let changes = load_changes(file)?;
    tracing::info!(path = %path.display(), changes = changes.len(), "change file loaded");
    Ok(changes)
}

fn build(raw: Vec<RawChange>) -> ChangeResult<Vec<Change>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, raw)| build_one(index, raw))
        .collect()
}

fn build_one(index: usize, raw: RawChange) -> ChangeResult<Change> {
    let change = match raw {
        RawChange::InsertVertex { vertex } => Change::InsertVertex(vertex_change(index, vertex)?),
        RawChange::DeleteVertex { vertex } => Change::DeleteVertex(vertex_change(index, vertex)?),
        RawChange::InsertEdge { src, dst, label } => Change::InsertEdge(edge_change(src, dst, label)),
        RawChange::DeleteEdge { src, dst, label } => Change::DeleteEdge(edge_change(src, dst, label)),
        RawChange::InsertAttr { uri, attribute } => Change::InsertAttr(attr_change(uri, attribute)),
        RawChange::DeleteAttr { uri, attribute } => Change::DeleteAttr(attr_change(uri, attribute)),
        RawChange::ChangeAttr { uri, attribute } => Change::ChangeAttr(attr_change(uri, attribute)),
    };
    Ok(change)
}

/// The first type is primary; the rest become extra types.
fn vertex_change(index: usize, raw: RawVertex) -> ChangeResult<VertexChange> {
    let mut types = raw.types.into_iter();
    let Some(primary) = types.next() else {
        return Err(ChangeError::EmptyTypes { index, id: raw.uri });
    };
    let mut vertex = DataVertex::new(raw.uri, primary);
    for ty in types {
        vertex.add_type(ty);
    }
    for attribute in raw.attributes {
        vertex.set_attribute(attribute.into());
    }
    Ok(VertexChange { vertex })
}

fn edge_change(src: String, dst: String, label: String) -> EdgeChange {
    EdgeChange {
        source_id: src,
        target_id: dst,
        label,
    }
}

fn attr_change(uri: String, attribute: RawAttribute) -> AttributeChange {
    AttributeChange {
        vertex_id: uri,
        attribute: attribute.into(),
    }
}
