use mqa_core::{Dimension, Rating};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::validate::validate_profile;

/// Resource universe a metric is measured over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceScope {
    /// Subjects typed `dcat:Dataset`.
    Dataset,
    /// Subjects typed `dcat:Distribution`.
    Distribution,
    /// Datasets followed by distributions.
    DatasetAndDistribution,
    /// The graph as a whole (shape conformance).
    WholeGraph,
}

/// Whether a metric is a regular measurement or a whole-graph compliance check.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    #[default]
    Standard,
    Compliance,
}

/// A single measurable quality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MetricDefinition {
    /// Unique metric id (ex.: `dcat_keyword`).
    pub id: String,
    pub dimension: Dimension,
    /// Points awarded when every candidate passes.
    pub weight: u32,
    pub scope: ResourceScope,
    #[serde(default)]
    pub kind: MetricKind,
}

impl MetricDefinition {
    pub fn is_compliance(&self) -> bool {
        self.kind == MetricKind::Compliance
    }
}

/// Maximum score per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionMaxima {
    pub findability: u32,
    pub accessibility: u32,
    pub interoperability: u32,
    pub reusability: u32,
    pub contextuality: u32,
}

impl DimensionMaxima {
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Findability => self.findability,
            Dimension::Accessibility => self.accessibility,
            Dimension::Interoperability => self.interoperability,
            Dimension::Reusability => self.reusability,
            Dimension::Contextuality => self.contextuality,
        }
    }

    pub fn total(&self) -> u32 {
        Dimension::ALL.iter().map(|dim| self.get(*dim)).sum()
    }
}

/// Lower bounds of each rating tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RatingThresholds {
    pub excellent: u32,
    pub good: u32,
    pub sufficient: u32,
}

impl RatingThresholds {
    /// Highest tier whose lower bound is met; below every tier is `Bad`.
    pub fn rating_for(&self, total: u32) -> Rating {
        if total >= self.excellent {
            Rating::Excellent
        } else if total >= self.good {
            Rating::Good
        } else if total >= self.sufficient {
            Rating::Sufficient
        } else {
            Rating::Bad
        }
    }
}

/// Serialized form of a profile, as accepted from `profiles.json` files.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProfileDefinition {
    /// Profile name used on the command line and in reports.
    pub name: String,
    /// Ordered metric set.
    pub metrics: Vec<MetricDefinition>,
    pub dimension_max: DimensionMaxima,
    pub thresholds: RatingThresholds,
    /// Id of the single compliance metric this profile counts.
    pub compliance_metric: String,
}

/// Validated scoring profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    metrics: Vec<MetricDefinition>,
    dimension_max: DimensionMaxima,
    thresholds: RatingThresholds,
    compliance_metric: String,
}

impl Profile {
    /// Validate a definition and freeze it into a profile.
    pub fn from_definition(definition: ProfileDefinition) -> Result<Self> {
        validate_profile(&definition)?;
        Ok(Self {
            name: definition.name,
            metrics: definition.metrics,
            dimension_max: definition.dimension_max,
            thresholds: definition.thresholds,
            compliance_metric: definition.compliance_metric,
        })
    }

    /// Built-in definitions are covered by the catalog tests.
    pub(crate) fn from_builtin(definition: ProfileDefinition) -> Self {
        Self {
            name: definition.name,
            metrics: definition.metrics,
            dimension_max: definition.dimension_max,
            thresholds: definition.thresholds,
            compliance_metric: definition.compliance_metric,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn metric(&self, id: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|metric| metric.id == id)
    }

    pub fn dimension_max(&self) -> &DimensionMaxima {
        &self.dimension_max
    }

    pub fn thresholds(&self) -> &RatingThresholds {
        &self.thresholds
    }

    pub fn compliance_metric(&self) -> &str {
        &self.compliance_metric
    }

    pub fn max_score(&self) -> u32 {
        self.dimension_max.total()
    }

    /// True when `metric` is a compliance metric other than this profile's.
    pub fn excludes(&self, metric: &MetricDefinition) -> bool {
        metric.is_compliance() && metric.id != self.compliance_metric
    }

    pub fn to_definition(&self) -> ProfileDefinition {
        ProfileDefinition {
            name: self.name.clone(),
            metrics: self.metrics.clone(),
            dimension_max: self.dimension_max,
            thresholds: self.thresholds,
            compliance_metric: self.compliance_metric.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_tiers_use_lower_bounds() {
        let thresholds = RatingThresholds {
            excellent: 351,
            good: 221,
            sufficient: 121,
        };
        assert_eq!(thresholds.rating_for(351), Rating::Excellent);
        assert_eq!(thresholds.rating_for(350), Rating::Good);
        assert_eq!(thresholds.rating_for(221), Rating::Good);
        assert_eq!(thresholds.rating_for(121), Rating::Sufficient);
        assert_eq!(thresholds.rating_for(120), Rating::Bad);
        assert_eq!(thresholds.rating_for(0), Rating::Bad);
    }

    #[test]
    fn metric_kind_defaults_to_standard() {
        let metric: MetricDefinition = serde_json::from_str(
            r#"{"id":"dcat_keyword","dimension":"findability","weight":30,"scope":"dataset"}"#,
        )
        .expect("parse metric");
        assert_eq!(metric.kind, MetricKind::Standard);
        assert!(!metric.is_compliance());
    }
}
