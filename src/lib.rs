// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # graph-delta-loader
//!
//! Builds in-memory typed property graphs from RDF triple files and loads the
//! change records that describe how a graph evolves between snapshots.
//!
//! ## Architecture
//!
//! - **Typed graph** (`graph`): multi-typed vertices with attributes, directed labeled edges
//! - **Sources** (`source`): local files or `"<container>/<key>"` objects over HTTP
//! - **Ingestion** (`ingest`): DBpedia (type pass + data pass) and IMDB (single pass) loaders
//! - **Changes** (`changes`): change records, JSON change-file loader, replay onto a graph
//! - **Config** (`config`): TOML loader settings and schema allow-lists
//!
//! ## Library usage
//!
//! ```no_run
//! use graph_delta_loader::config::LoaderConfig;
//! use graph_delta_loader::ingest::DbpediaLoader;
//!
//! let config = LoaderConfig::default();
//! let mut loader = DbpediaLoader::from_config(&config).unwrap();
//! let summary = loader.load(&["types.nt"], &["data.nt"]);
//! println!("{} files loaded, {} vertices", summary.loaded(), loader.graph().vertex_count());
//! ```

pub mod changes;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod ingest;
pub mod source;
