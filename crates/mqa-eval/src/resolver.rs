use mqa_core::namespaces::dcat;
use mqa_core::{Graph, Term};
use mqa_profile::ResourceScope;

/// Candidate resource universes, computed once per evaluation.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    datasets: Vec<Term>,
    distributions: Vec<Term>,
    both: Vec<Term>,
}

impl ResourceResolver {
    pub fn new(graph: &Graph) -> Self {
        let datasets = graph.subjects_of_type(dcat::DATASET);
        let distributions = graph.subjects_of_type(dcat::DISTRIBUTION);
        let both = datasets.iter().chain(&distributions).cloned().collect();
        Self {
            datasets,
            distributions,
            both,
        }
    }

    pub fn datasets(&self) -> &[Term] {
        &self.datasets
    }

    pub fn distributions(&self) -> &[Term] {
        &self.distributions
    }

    /// Resources a metric with `scope` is measured over. Whole-graph metrics
    /// get no candidates.
    pub fn candidates(&self, scope: ResourceScope) -> &[Term] {
        match scope {
            ResourceScope::Dataset => &self.datasets,
            ResourceScope::Distribution => &self.distributions,
            ResourceScope::DatasetAndDistribution => &self.both,
            ResourceScope::WholeGraph => &[],
        }
    }
}
