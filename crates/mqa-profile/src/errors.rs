use mqa_core::Dimension;
use thiserror::Error;

/// Setup-time failures. These are fatal and surface before any metric runs.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
    #[error("metric '{0}' is not registered")]
    UnregisteredMetric(String),
    #[error("profile '{profile}' declares metric '{id}' more than once")]
    DuplicateMetric { profile: String, id: String },
    #[error(
        "profile '{profile}' {dimension} weights sum to {actual}, declared maximum is {declared}"
    )]
    WeightMismatch {
        profile: String,
        dimension: Dimension,
        declared: u32,
        actual: u32,
    },
    #[error("invalid profile '{profile}': {reason}")]
    InvalidDefinition { profile: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
