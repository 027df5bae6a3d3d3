use thiserror::Error;

/// Core error type shared across mqa crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph violates internal invariants.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    /// A term could not be represented (e.g. an empty IRI).
    #[error("invalid term: {0}")]
    InvalidTerm(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by mqa crates.
pub type Result<T> = std::result::Result<T, Error>;
