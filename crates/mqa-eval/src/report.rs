use chrono::{NaiveDate, NaiveDateTime};
use mqa_core::{Dimension, Rating};
use mqa_profile::Profile;
use serde::{Deserialize, Serialize};

use crate::labels::{LabelLookup, metric_label};
use crate::metrics::{CheckResult, DimensionScores};

/// Immutable result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Location the graph was read from, or a synthesized identifier.
    pub source: String,
    pub created: NaiveDate,
    #[serde(rename = "model")]
    pub profile: String,
    #[serde(rename = "totalScore")]
    pub total_score: u32,
    pub rating: Rating,
    pub dimensions: DimensionScores,
    pub metrics: Vec<CheckResult>,
}

impl QualityReport {
    pub fn metric(&self, id: &str) -> Option<&CheckResult> {
        self.metrics.iter().find(|result| result.id == id)
    }
}

/// Identifier for graphs supplied as content rather than fetched.
pub fn direct_input_source(now: NaiveDateTime) -> String {
    format!("direct-input-{}", now.format("%Y%m%d%H%M%S"))
}

/// Attach labels in every requested language, rate the total against the
/// profile thresholds and package the report.
pub fn assemble(
    source: Option<&str>,
    profile: &Profile,
    dimensions: DimensionScores,
    mut metrics: Vec<CheckResult>,
    labels: &dyn LabelLookup,
    languages: &[String],
    now: NaiveDateTime,
) -> QualityReport {
    for result in &mut metrics {
        for language in languages {
            result.labels.insert(
                language.clone(),
                metric_label(labels, &result.id, language),
            );
        }
    }

    let total_score = dimensions.total();
    QualityReport {
        source: source
            .map(str::to_string)
            .unwrap_or_else(|| direct_input_source(now)),
        created: now.date(),
        profile: profile.name().to_string(),
        total_score,
        rating: profile.thresholds().rating_for(total_score),
        dimensions,
        metrics,
    }
}

/// Render a deterministic markdown summary of a report.
pub fn render_markdown(report: &QualityReport, max_score: u32, language: &str) -> String {
    let mut lines = Vec::new();

    lines.push("# Metadata Quality Report".to_string());
    lines.push(String::new());
    lines.push(format!("- source: {}", report.source));
    lines.push(format!("- created: {}", report.created));
    lines.push(format!("- profile: {}", report.profile));
    lines.push(format!(
        "- score: {} / {} ({})",
        report.total_score, max_score, report.rating
    ));
    lines.push(String::new());

    lines.push("## Dimensions".to_string());
    lines.push("| dimension | score |".to_string());
    lines.push("| --- | --- |".to_string());
    for dimension in Dimension::ALL {
        lines.push(format!(
            "| {} | {} |",
            dimension,
            report.dimensions.get(dimension)
        ));
    }
    lines.push(String::new());

    lines.push("## Metrics".to_string());
    lines.push("| metric | dimension | count | population | points | weight |".to_string());
    lines.push("| --- | --- | --- | --- | --- | --- |".to_string());
    for result in &report.metrics {
        let label = result.labels.get(language).unwrap_or(&result.id);
        lines.push(format!(
            "| {} | {} | {} | {} | {:.2} | {} |",
            label, result.dimension, result.count, result.population, result.points, result.weight
        ));
    }
    lines.push(String::new());

    lines.push("## Improvement areas".to_string());
    lines.extend(improvement_areas(report, language));
    lines.join("\n")
}

fn improvement_areas(report: &QualityReport, language: &str) -> Vec<String> {
    let mut missing: Vec<&CheckResult> = report
        .metrics
        .iter()
        .filter(|result| result.points < f64::from(result.weight))
        .collect();
    missing.sort_by(|a, b| {
        let lost = |r: &CheckResult| f64::from(r.weight) - r.points;
        lost(b).total_cmp(&lost(a)).then_with(|| a.id.cmp(&b.id))
    });

    if missing.is_empty() {
        return vec!["- every metric reached its full weight.".to_string()];
    }
    missing
        .into_iter()
        .take(5)
        .map(|result| {
            let label = result.labels.get(language).unwrap_or(&result.id);
            format!(
                "- {}: {:.2} of {} points",
                label, result.points, result.weight
            )
        })
        .collect()
}
