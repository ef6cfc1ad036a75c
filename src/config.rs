//! Loader configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! local-filesystem, unfiltered configuration with the DBpedia/IMDB prefix
//! lengths.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub prefix: PrefixConfig,
}

impl LoaderConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Build the schema filter threaded into the ingestors.
    pub fn schema_filter(&self) -> SchemaFilter {
        SchemaFilter::from(&self.schema)
    }
}

/// Where triple sources are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Read from the remote object store instead of the local filesystem.
    #[serde(default)]
    pub remote: bool,
    /// Object store region.
    #[serde(default = "default_region")]
    pub region: String,
    /// URL template for remote objects. `{container}`, `{key}` and `{region}`
    /// are substituted.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// RDF language used when the format cannot be guessed from the path.
    #[serde(default = "default_language")]
    pub language: String,
    /// Read timeout for remote fetches, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_region() -> String {
    "us-east-2".into()
}
fn default_endpoint() -> String {
    "https://{container}.s3.{region}.amazonaws.com/{key}".into()
}
fn default_language() -> String {
    "ntriples".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            remote: false,
            region: default_region(),
            endpoint: default_endpoint(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Allow-lists for schema-optimized loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Only load the listed types and attributes.
    #[serde(default)]
    pub optimize: bool,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Number of leading IRI characters stripped to form vertex identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixConfig {
    /// Length of `http://dbpedia.org/resource/`.
    #[serde(default = "default_dbpedia_prefix")]
    pub dbpedia: usize,
    /// Length of `http://imdb.org/`.
    #[serde(default = "default_imdb_prefix")]
    pub imdb: usize,
}

fn default_dbpedia_prefix() -> usize {
    28
}
fn default_imdb_prefix() -> usize {
    16
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            dbpedia: default_dbpedia_prefix(),
            imdb: default_imdb_prefix(),
        }
    }
}

/// Type and attribute allow-lists, active only when `enabled`.
///
/// Names are compared lowercased, matching the normalization the ingestors
/// apply to types and predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFilter {
    enabled: bool,
    valid_types: HashSet<String>,
    valid_attributes: HashSet<String>,
}

impl SchemaFilter {
    /// A filter that admits everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A filter restricted to the given types and attributes.
    pub fn new<T, A>(types: T, attributes: A) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            enabled: true,
            valid_types: types.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
            valid_attributes: attributes
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn admits_type(&self, ty: &str) -> bool {
        !self.enabled || self.valid_types.contains(ty)
    }

    pub fn admits_attribute(&self, name: &str) -> bool {
        !self.enabled || self.valid_attributes.contains(name)
    }
}

impl From<&SchemaConfig> for SchemaFilter {
    fn from(schema: &SchemaConfig) -> Self {
        if schema.optimize {
            Self::new(&schema.types, &schema.attributes)
        } else {
            Self::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = LoaderConfig::from_toml("").unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert!(!config.storage.remote);
        assert_eq!(config.prefix.dbpedia, 28);
        assert_eq!(config.prefix.imdb, 16);
        assert!(!config.schema_filter().is_enabled());
    }

    #[test]
    fn parses_all_tables() {
        let config = LoaderConfig::from_toml(
            r#"
            [storage]
            remote = true
            region = "eu-west-1"
            language = "turtle"

            [schema]
            optimize = true
            types = ["Person", "film"]
            attributes = ["name"]

            [prefix]
            dbpedia = 30
            "#,
        )
        .unwrap();
        assert!(config.storage.remote);
        assert_eq!(config.storage.region, "eu-west-1");
        assert_eq!(config.storage.language, "turtle");
        assert_eq!(config.storage.timeout_secs, 60);
        assert_eq!(config.prefix.dbpedia, 30);
        assert_eq!(config.prefix.imdb, 16);

        let filter = config.schema_filter();
        assert!(filter.is_enabled());
        assert!(filter.admits_type("person"));
        assert!(filter.admits_type("film"));
        assert!(!filter.admits_type("place"));
        assert!(filter.admits_attribute("name"));
        assert!(!filter.admits_attribute("age"));
    }

    #[test]
    fn schema_lists_ignored_without_optimize() {
        let config = LoaderConfig::from_toml(
            r#"
            [schema]
            types = ["person"]
            "#,
        )
        .unwrap();
        let filter = config.schema_filter();
        assert!(filter.admits_type("anything"));
        assert!(filter.admits_attribute("anything"));
    }

    #[test]
    fn invalid_toml_reports_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("loader.toml");
        std::fs::write(&path, "[storage\nremote = ").unwrap();
        let err = LoaderConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = LoaderConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
