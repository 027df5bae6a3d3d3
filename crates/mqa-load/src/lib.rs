//! Graph loading adapters.
//!
//! Parsing is delegated to `sophia`; this crate only picks the syntax, fetches
//! the bytes and maps parsed terms into [`mqa_core::Graph`].

pub mod adapter;
pub mod errors;
pub mod format;
pub mod options;
pub mod rdf;

pub use adapter::{GraphSource, LoadedGraph};
pub use errors::{LoadError, Result};
pub use format::RdfFormat;
pub use options::LoadOptions;
pub use rdf::{ContentSource, UrlSource, parse_graph};

pub use mqa_core::Graph;
