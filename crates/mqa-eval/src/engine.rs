use std::sync::Arc;

use chrono::Local;
use mqa_core::{ComplianceLevel, Graph};
use mqa_profile::{Profile, ProfileCatalog};
use tracing::{debug, info, warn};

use crate::checkers::CheckContext;
use crate::compliance::ConformanceEngine;
use crate::errors::EvalError;
use crate::labels::{LabelLookup, StaticLabels};
use crate::metrics::{CheckResult, aggregate};
use crate::model::EvaluateOptions;
use crate::probe::HttpProbe;
use crate::registry::CheckerRegistry;
use crate::report::{QualityReport, assemble};
use crate::resolver::ResourceResolver;
use crate::vocabulary::VocabularyLoader;

/// Score graphs against quality profiles.
///
/// Holds no per-evaluation state: profiles and registries are built fresh
/// for every call, only the vocabulary cache is shared.
pub struct ScoringEngine {
    options: EvaluateOptions,
    catalog: ProfileCatalog,
    probe: Arc<dyn HttpProbe>,
    conformance: Arc<dyn ConformanceEngine>,
    vocabularies: Arc<VocabularyLoader>,
    labels: Arc<dyn LabelLookup>,
}

impl ScoringEngine {
    pub fn new(
        options: EvaluateOptions,
        probe: Arc<dyn HttpProbe>,
        conformance: Arc<dyn ConformanceEngine>,
    ) -> Self {
        let vocabularies = Arc::new(VocabularyLoader::new(options.vocab_dir.clone()));
        Self {
            options,
            catalog: ProfileCatalog::builtin(),
            probe,
            conformance,
            vocabularies,
            labels: Arc::new(StaticLabels::builtin()),
        }
    }

    pub fn with_catalog(mut self, catalog: ProfileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_labels(mut self, labels: Arc<dyn LabelLookup>) -> Self {
        self.labels = labels;
        self
    }

    /// Evaluate `graph` against the named profile with the standard checkers.
    pub async fn evaluate(
        &self,
        graph: &Graph,
        source: Option<&str>,
        profile_name: &str,
        level: ComplianceLevel,
    ) -> Result<QualityReport, EvalError> {
        let profile = self.catalog.get(profile_name)?;
        let registry = CheckerRegistry::standard(&profile)?;
        Ok(self
            .evaluate_with(graph, source, &profile, level, &registry)
            .await)
    }

    /// Evaluate with an explicit profile and registry. Individual metric
    /// failures are recorded in the report and never abort the run.
    pub async fn evaluate_with(
        &self,
        graph: &Graph,
        source: Option<&str>,
        profile: &Profile,
        level: ComplianceLevel,
        registry: &CheckerRegistry,
    ) -> QualityReport {
        let resolver = ResourceResolver::new(graph);
        let ctx = CheckContext::new(
            &self.options,
            level,
            Arc::clone(&self.probe),
            Arc::clone(&self.conformance),
            Arc::clone(&self.vocabularies),
        );

        info!(
            profile = profile.name(),
            level = level.number(),
            triples = graph.len(),
            datasets = resolver.datasets().len(),
            distributions = resolver.distributions().len(),
            "evaluation started"
        );

        let mut results = Vec::with_capacity(profile.metrics().len());
        for metric in profile.metrics() {
            if profile.excludes(metric) {
                debug!(metric_id = %metric.id, "compliance metric of another profile skipped");
                continue;
            }
            let Some(checker) = registry.get_checker(&metric.id) else {
                warn!(metric_id = %metric.id, "no checker bound");
                continue;
            };

            let candidates = resolver.candidates(metric.scope);
            let (count, population) = match checker.check(graph, candidates, &ctx).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(metric_id = %metric.id, error = %err, "checker failed");
                    (0, candidates.len().max(1) as u64)
                }
            };
            debug!(metric_id = %metric.id, count, population, "metric checked");
            results.push(CheckResult::new(metric, count, population));
        }

        let dimensions = aggregate(&results, profile.dimension_max());
        let report = assemble(
            source,
            profile,
            dimensions,
            results,
            self.labels.as_ref(),
            &self.options.label_languages,
            Local::now().naive_local(),
        );

        info!(
            profile = profile.name(),
            source = %report.source,
            total_score = report.total_score,
            max_score = profile.max_score(),
            rating = %report.rating,
            "evaluation finished"
        );
        report
    }
}
