use thiserror::Error;

/// Failures that prevent a graph from being built at all.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported content type: {0}")]
    UnsupportedFormat(String),
    #[error("the parsed graph is empty")]
    Empty,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mqa_core::Error> for LoadError {
    fn from(err: mqa_core::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;
