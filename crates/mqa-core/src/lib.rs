//! Core contracts and helpers for mqa.
//!
//! This crate defines the in-memory RDF graph the quality checks run over,
//! the namespace constants they look up, and the shared dimension, rating
//! and compliance-level types.

pub mod error;
pub mod graph;
pub mod namespaces;
pub mod types;

pub use error::{Error, Result};
pub use graph::{Graph, Term, Triple};
pub use types::{ComplianceLevel, Dimension, Rating};
