use std::time::Duration;

use mqa_profile::ConfigurationError;
use thiserror::Error;

/// Errors that abort an evaluation before or after scoring.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// A single checker failed. The engine records the metric as failed and
/// moves on.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("vocabulary {name} unavailable: {reason}")]
    Vocabulary { name: String, reason: String },
    #[error("background task failed: {0}")]
    Task(String),
}

/// Shape loading or conformance engine failure, always read as
/// non-conformance.
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("no shapes could be loaded for {0}")]
    ShapesUnavailable(String),
    #[error("conformance engine error: {0}")]
    Engine(String),
    #[error("conformance engine timed out after {0:?}")]
    Timeout(Duration),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Network failure for one URL. The URL counts as unreachable.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("tls error: {0}")]
    Tls(String),
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}
