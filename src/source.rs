//! Source resolution: turn a path-like address into a readable triple stream.
//!
//! Two backends sit behind [`SourceResolver`]:
//!
//! - [`LocalFiles`]: plain filesystem paths
//! - [`ObjectStore`]: `"<container>/<key>"` addresses fetched over HTTP
//!
//! The returned [`Source`] owns its reader; dropping it releases the file
//! handle or response body on every exit path.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use oxigraph::io::RdfFormat;

use crate::config::StorageConfig;
use crate::error::{IngestError, SourceError};

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// An opened triple stream.
pub struct Source {
    /// The address this source was opened from.
    pub address: String,
    /// RDF syntax of the stream.
    pub format: RdfFormat,
    reader: Box<dyn Read>,
}

impl Source {
    pub fn new(address: impl Into<String>, format: RdfFormat, reader: Box<dyn Read>) -> Self {
        Self {
            address: address.into(),
            format,
            reader,
        }
    }

    /// Wrap in-memory bytes; used by tests and callers that already hold the data.
    pub fn from_bytes(address: impl Into<String>, format: RdfFormat, data: Vec<u8>) -> Self {
        Self::new(address, format, Box::new(std::io::Cursor::new(data)))
    }

    pub fn into_reader(self) -> Box<dyn Read> {
        self.reader
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("address", &self.address)
            .field("format", &self.format)
            .finish()
    }
}

/// Opens triple streams by address.
pub trait SourceResolver {
    fn open(&self, path: &str) -> SourceResult<Source>;
}

/// Pick the backend for a storage configuration.
pub fn resolver_for(storage: &StorageConfig) -> Result<Box<dyn SourceResolver>, IngestError> {
    let format = parse_language(&storage.language).ok_or_else(|| IngestError::UnsupportedFormat {
        language: storage.language.clone(),
    })?;
    if storage.remote {
        Ok(Box::new(ObjectStore::new(
            &storage.endpoint,
            &storage.region,
            format,
            Duration::from_secs(storage.timeout_secs),
        )))
    } else {
        Ok(Box::new(LocalFiles::new(format)))
    }
}

/// Map a configured language name to an RDF format.
pub fn parse_language(language: &str) -> Option<RdfFormat> {
    match language.to_lowercase().replace(['-', '_', ' '], "").as_str() {
        "ntriples" | "ntriple" | "nt" => Some(RdfFormat::NTriples),
        "nquads" | "nq" => Some(RdfFormat::NQuads),
        "turtle" | "ttl" => Some(RdfFormat::Turtle),
        "trig" => Some(RdfFormat::TriG),
        "rdfxml" | "rdf/xml" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
        "n3" => Some(RdfFormat::N3),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Local filesystem
// ---------------------------------------------------------------------------

/// Reads sources from the local filesystem.
///
/// The format is guessed from the file extension, falling back to the
/// configured default.
#[derive(Debug, Clone)]
pub struct LocalFiles {
    default_format: RdfFormat,
}

impl LocalFiles {
    pub fn new(default_format: RdfFormat) -> Self {
        Self { default_format }
    }
}

impl SourceResolver for LocalFiles {
    fn open(&self, path: &str) -> SourceResult<Source> {
        let file = File::open(path).map_err(|e| SourceError::Unavailable {
            path: path.into(),
            message: e.to_string(),
        })?;
        let format = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(RdfFormat::from_extension)
            .unwrap_or(self.default_format);
        tracing::debug!(path, ?format, "opened local source");
        Ok(Source::new(path, format, Box::new(BufReader::new(file))))
    }
}

// ---------------------------------------------------------------------------
// Remote object store
// ---------------------------------------------------------------------------

/// Reads `"<container>/<key>"` objects over HTTP.
pub struct ObjectStore {
    endpoint: String,
    region: String,
    format: RdfFormat,
    http: ureq::Agent,
}

impl ObjectStore {
    pub fn new(endpoint: &str, region: &str, format: RdfFormat, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            region: region.into(),
            format,
            http: ureq::AgentBuilder::new().timeout_read(timeout).build(),
        }
    }

    /// Expand the endpoint template for one object.
    ///
    /// Container and key are percent-encoded per path segment, so a key
    /// holding `#`, `?`, `%` or spaces still names exactly one object.
    pub fn object_url(&self, container: &str, key: &str) -> String {
        self.endpoint
            .replace("{container}", &encode_segments(container))
            .replace("{region}", &self.region)
            .replace("{key}", &urlencoding::encode(key))
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .finish()
    }
}

fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Split `"<container>/<key>"` at the final `/`.
pub fn split_object_address(path: &str) -> SourceResult<(&str, &str)> {
    match path.rsplit_once('/') {
        Some((container, key)) if !container.is_empty() && !key.is_empty() => Ok((container, key)),
        _ => Err(SourceError::InvalidAddress { path: path.into() }),
    }
}

impl SourceResolver for ObjectStore {
    fn open(&self, path: &str) -> SourceResult<Source> {
        let (container, key) = split_object_address(path)?;
        let url = self.object_url(container, key);
        tracing::info!(container, key, region = %self.region, "downloading object");

        let response = match self.http.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(SourceError::Unavailable {
                    path: path.into(),
                    message: format!("HTTP {code} from {url}"),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SourceError::Unavailable {
                    path: path.into(),
                    message: transport.to_string(),
                });
            }
        };

        Ok(Source::new(
            path,
            self.format,
            Box::new(BufReader::new(response.into_reader())),
        ))
    }
}
