//! Metric catalog and scoring profiles.
//!
//! A [`Profile`] is an immutable, validated value: the ordered metric set,
//! per-dimension maxima and rating thresholds. Built-in profiles come from
//! [`ProfileCatalog::builtin`]; custom ones are accepted as JSON
//! [`ProfileDefinition`]s and go through the same validation.

pub mod catalog;
pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use catalog::{DCAT_AP, DCAT_AP_ES, NTI_RISP, ProfileCatalog, get_profile};
pub use errors::{ConfigurationError, Result};
pub use model::{
    DimensionMaxima, MetricDefinition, MetricKind, Profile, ProfileDefinition, RatingThresholds,
    ResourceScope,
};
pub use schema::profile_json_schema;
pub use validate::validate_profile;
