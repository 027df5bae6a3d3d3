use std::collections::BTreeMap;

use mqa_core::Dimension;
use mqa_profile::{DimensionMaxima, MetricDefinition};
use serde::{Deserialize, Serialize};

/// Outcome of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub dimension: Dimension,
    pub count: u64,
    pub population: u64,
    /// `count / population`, 0 when the population is empty.
    pub percentage: f64,
    /// `percentage * weight`.
    pub points: f64,
    pub weight: u32,
    /// Language code -> label.
    pub labels: BTreeMap<String, String>,
}

impl CheckResult {
    pub fn new(metric: &MetricDefinition, count: u64, population: u64) -> Self {
        let percentage = if population == 0 {
            0.0
        } else {
            (count as f64 / population as f64).min(1.0)
        };
        Self {
            id: metric.id.clone(),
            dimension: metric.dimension,
            count,
            population,
            percentage,
            points: percentage * f64::from(metric.weight),
            weight: metric.weight,
            labels: BTreeMap::new(),
        }
    }
}

/// Rounded score per dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub findability: u32,
    pub accessibility: u32,
    pub interoperability: u32,
    pub reusability: u32,
    pub contextuality: u32,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Findability => self.findability,
            Dimension::Accessibility => self.accessibility,
            Dimension::Interoperability => self.interoperability,
            Dimension::Reusability => self.reusability,
            Dimension::Contextuality => self.contextuality,
        }
    }

    pub fn set(&mut self, dimension: Dimension, score: u32) {
        let slot = match dimension {
            Dimension::Findability => &mut self.findability,
            Dimension::Accessibility => &mut self.accessibility,
            Dimension::Interoperability => &mut self.interoperability,
            Dimension::Reusability => &mut self.reusability,
            Dimension::Contextuality => &mut self.contextuality,
        };
        *slot = score;
    }

    /// Sum of the already rounded dimension scores.
    pub fn total(&self) -> u32 {
        Dimension::ALL.iter().map(|dim| self.get(*dim)).sum()
    }
}

/// Accumulate points per dimension, then round each dimension half to even
/// and clamp it to the declared maximum.
pub fn aggregate(results: &[CheckResult], maxima: &DimensionMaxima) -> DimensionScores {
    let mut raw: BTreeMap<Dimension, f64> = BTreeMap::new();
    for result in results {
        *raw.entry(result.dimension).or_default() += result.points;
    }

    let mut scores = DimensionScores::default();
    for dimension in Dimension::ALL {
        let points = raw.get(&dimension).copied().unwrap_or_default();
        scores.set(dimension, round_score(points, maxima.get(dimension)));
    }
    scores
}

fn round_score(points: f64, max: u32) -> u32 {
    points.round_ties_even().clamp(0.0, f64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use mqa_profile::{MetricKind, ResourceScope};

    use super::*;

    fn metric(id: &str, dimension: Dimension, weight: u32) -> MetricDefinition {
        MetricDefinition {
            id: id.to_string(),
            dimension,
            weight,
            scope: ResourceScope::Dataset,
            kind: MetricKind::Standard,
        }
    }

    #[test]
    fn empty_population_scores_zero() {
        let result = CheckResult::new(&metric("dcat_keyword", Dimension::Findability, 30), 0, 0);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.points, 0.0);
    }

    #[test]
    fn points_scale_with_weight() {
        let result = CheckResult::new(&metric("dcat_theme", Dimension::Findability, 30), 1, 4);
        assert_eq!(result.percentage, 0.25);
        assert_eq!(result.points, 7.5);
    }

    #[test]
    fn ties_round_to_even_per_dimension() {
        assert_eq!(round_score(2.5, 100), 2);
        assert_eq!(round_score(3.5, 100), 4);
        assert_eq!(round_score(120.4, 110), 110);
    }

    #[test]
    fn total_sums_rounded_dimensions() {
        let maxima = DimensionMaxima {
            findability: 100,
            accessibility: 100,
            interoperability: 110,
            reusability: 75,
            contextuality: 20,
        };
        // 2.5 + 2.5 rounds to 2 + 2, while rounding the raw sum would give 5.
        let results = vec![
            CheckResult::new(&metric("dct_spatial", Dimension::Findability, 5), 1, 2),
            CheckResult::new(&metric("dct_rights", Dimension::Contextuality, 5), 1, 2),
        ];
        let scores = aggregate(&results, &maxima);
        assert_eq!(scores.findability, 2);
        assert_eq!(scores.contextuality, 2);
        assert_eq!(scores.total(), 4);
    }
}
