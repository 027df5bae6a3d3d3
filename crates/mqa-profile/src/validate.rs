use std::collections::HashSet;

use mqa_core::Dimension;

use crate::errors::{ConfigurationError, Result};
use crate::model::{MetricDefinition, ProfileDefinition, ResourceScope};

/// Check every invariant a profile must hold before it can be scored.
///
/// Fails on the first violation found, in this order: naming, metric ids and
/// weights, compliance designation, thresholds, per-dimension totals.
pub fn validate_profile(definition: &ProfileDefinition) -> Result<()> {
    if definition.name.trim().is_empty() {
        return Err(invalid(definition, "profile name is empty"));
    }
    if definition.metrics.is_empty() {
        return Err(invalid(definition, "profile declares no metrics"));
    }

    validate_metrics(definition)?;
    validate_compliance(definition)?;
    validate_thresholds(definition)?;
    validate_dimension_totals(definition)
}

fn validate_metrics(definition: &ProfileDefinition) -> Result<()> {
    let mut seen = HashSet::new();
    for metric in &definition.metrics {
        if metric.id.trim().is_empty() {
            return Err(invalid(definition, "metric id is empty"));
        }
        if !seen.insert(metric.id.as_str()) {
            return Err(ConfigurationError::DuplicateMetric {
                profile: definition.name.clone(),
                id: metric.id.clone(),
            });
        }
        if metric.weight == 0 {
            return Err(invalid(
                definition,
                format!("metric '{}' has a zero weight", metric.id),
            ));
        }
    }
    Ok(())
}

fn validate_compliance(definition: &ProfileDefinition) -> Result<()> {
    let compliance: Vec<&MetricDefinition> = definition
        .metrics
        .iter()
        .filter(|metric| metric.is_compliance())
        .collect();

    match compliance.as_slice() {
        [metric] if metric.id == definition.compliance_metric => {
            if metric.scope != ResourceScope::WholeGraph {
                return Err(invalid(
                    definition,
                    format!("compliance metric '{}' must target the whole graph", metric.id),
                ));
            }
            Ok(())
        }
        [metric] => Err(invalid(
            definition,
            format!(
                "compliance metric '{}' is not the designated '{}'",
                metric.id, definition.compliance_metric
            ),
        )),
        [] => Err(invalid(
            definition,
            format!(
                "designated compliance metric '{}' is missing",
                definition.compliance_metric
            ),
        )),
        _ => Err(invalid(
            definition,
            format!("{} compliance metrics declared, expected one", compliance.len()),
        )),
    }
}

fn validate_thresholds(definition: &ProfileDefinition) -> Result<()> {
    let thresholds = &definition.thresholds;
    if thresholds.excellent < thresholds.good || thresholds.good < thresholds.sufficient {
        return Err(invalid(
            definition,
            format!(
                "thresholds must satisfy excellent >= good >= sufficient (got {}/{}/{})",
                thresholds.excellent, thresholds.good, thresholds.sufficient
            ),
        ));
    }
    Ok(())
}

fn validate_dimension_totals(definition: &ProfileDefinition) -> Result<()> {
    for dimension in Dimension::ALL {
        let actual: u32 = definition
            .metrics
            .iter()
            .filter(|metric| metric.dimension == dimension)
            .map(|metric| metric.weight)
            .sum();
        let declared = definition.dimension_max.get(dimension);
        if actual != declared {
            return Err(ConfigurationError::WeightMismatch {
                profile: definition.name.clone(),
                dimension,
                declared,
                actual,
            });
        }
    }
    Ok(())
}

fn invalid(definition: &ProfileDefinition, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidDefinition {
        profile: definition.name.clone(),
        reason: reason.into(),
    }
}
