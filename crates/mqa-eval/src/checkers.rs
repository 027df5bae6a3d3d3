use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mqa_core::{ComplianceLevel, Graph, Term};
use tokio::time::Instant;
use tracing::debug;

use crate::compliance::{self, ConformanceEngine, LeveledShapes, ShapeSet};
use crate::errors::CheckerError;
use crate::model::{EvaluateOptions, ReachabilityPolicy};
use crate::probe::{self, HttpProbe};
use crate::vocabulary::{VocabularyId, VocabularyLoader};

/// Collaborators and settings shared by every checker of one evaluation.
#[derive(Clone)]
pub struct CheckContext {
    pub level: ComplianceLevel,
    pub reachability: ReachabilityPolicy,
    /// Shared by every URL metric of the evaluation.
    pub reachability_deadline: Instant,
    pub delegate_timeout: Duration,
    pub shapes_dir: PathBuf,
    pub probe: Arc<dyn HttpProbe>,
    pub conformance: Arc<dyn ConformanceEngine>,
    pub vocabularies: Arc<VocabularyLoader>,
}

impl CheckContext {
    pub fn new(
        options: &EvaluateOptions,
        level: ComplianceLevel,
        probe: Arc<dyn HttpProbe>,
        conformance: Arc<dyn ConformanceEngine>,
        vocabularies: Arc<VocabularyLoader>,
    ) -> Self {
        Self {
            level,
            reachability: options.reachability.clone(),
            reachability_deadline: Instant::now() + options.reachability.deadline(),
            delegate_timeout: options.delegate_timeout(),
            shapes_dir: options.shapes_dir.clone(),
            probe,
            conformance,
            vocabularies,
        }
    }
}

/// Measurement behind a metric. Every variant yields `(count, population)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checker {
    /// Supplied resources having the property.
    PropertyExistence { property: String },
    /// Subjects of `entity_type` having the property, over every such
    /// subject in the graph.
    TypedProperty {
        property: String,
        entity_type: String,
    },
    /// Like `TypedProperty`, summed per type without deduplication.
    MultiTypeProperty {
        property: String,
        entity_types: Vec<String>,
    },
    /// Values of the property that answer with a 2xx status.
    UrlReachability {
        property: String,
        entity_type: String,
    },
    /// Property values that are IRIs of the vocabulary.
    VocabularyCompliance {
        properties: Vec<String>,
        vocabulary: VocabularyId,
    },
    /// Property values whose label is one of the vocabulary labels.
    VocabularyLabelCompliance {
        properties: Vec<String>,
        vocabulary: VocabularyId,
        label_property: String,
    },
    /// Whole-graph conformance to a shape set.
    ComplianceDelegate(ShapeSet),
    /// Whole-graph conformance to the shape set of the requested level.
    LeveledComplianceDelegate(LeveledShapes),
}

impl Checker {
    pub fn property(property: &str) -> Self {
        Checker::PropertyExistence {
            property: property.to_string(),
        }
    }

    pub fn typed(property: &str, entity_type: &str) -> Self {
        Checker::TypedProperty {
            property: property.to_string(),
            entity_type: entity_type.to_string(),
        }
    }

    pub fn multi_typed(property: &str, entity_types: &[&str]) -> Self {
        Checker::MultiTypeProperty {
            property: property.to_string(),
            entity_types: entity_types.iter().map(|ty| ty.to_string()).collect(),
        }
    }

    pub fn url(property: &str, entity_type: &str) -> Self {
        Checker::UrlReachability {
            property: property.to_string(),
            entity_type: entity_type.to_string(),
        }
    }

    pub fn vocabulary(properties: &[&str], vocabulary: VocabularyId) -> Self {
        Checker::VocabularyCompliance {
            properties: properties.iter().map(|p| p.to_string()).collect(),
            vocabulary,
        }
    }

    pub fn vocabulary_label(
        properties: &[&str],
        vocabulary: VocabularyId,
        label_property: &str,
    ) -> Self {
        Checker::VocabularyLabelCompliance {
            properties: properties.iter().map(|p| p.to_string()).collect(),
            vocabulary,
            label_property: label_property.to_string(),
        }
    }

    /// Run the measurement over `resources`, the candidates resolved for the
    /// metric's scope.
    pub async fn check(
        &self,
        graph: &Graph,
        resources: &[Term],
        ctx: &CheckContext,
    ) -> Result<(u64, u64), CheckerError> {
        match self {
            Checker::PropertyExistence { property } => {
                Ok(count_with_property(graph, resources, property))
            }
            Checker::TypedProperty {
                property,
                entity_type,
            } => {
                let subjects = graph.subjects_of_type(entity_type);
                Ok(count_with_property(graph, &subjects, property))
            }
            Checker::MultiTypeProperty {
                property,
                entity_types,
            } => Ok(entity_types
                .iter()
                .map(|ty| count_with_property(graph, &graph.subjects_of_type(ty), property))
                .fold((0, 0), |(count, total), (c, t)| (count + c, total + t))),
            Checker::UrlReachability {
                property,
                entity_type,
            } => check_urls(graph, resources, property, entity_type, ctx).await,
            Checker::VocabularyCompliance { .. } | Checker::VocabularyLabelCompliance { .. }
                if resources.is_empty() =>
            {
                Ok((0, 0))
            }
            Checker::VocabularyCompliance {
                properties,
                vocabulary,
            } => {
                let vocabulary = ctx.vocabularies.load(*vocabulary).await?;
                Ok(count_values(graph, resources, properties, |value| {
                    value
                        .as_iri()
                        .is_some_and(|iri| vocabulary.contains_uri(iri))
                }))
            }
            Checker::VocabularyLabelCompliance {
                properties,
                vocabulary,
                label_property,
            } => {
                let vocabulary = ctx.vocabularies.load(*vocabulary).await?;
                Ok(count_values(graph, resources, properties, |value| {
                    label_matches(graph, value, label_property, |label| {
                        vocabulary.contains_label(label)
                    }) || value.as_iri().is_some_and(|iri| {
                        !graph.has_property(value, label_property)
                            && vocabulary.contains_label(local_name(iri))
                    })
                }))
            }
            Checker::ComplianceDelegate(set) => Ok(delegate(set, graph, ctx).await),
            Checker::LeveledComplianceDelegate(shapes) => match shapes.select(ctx.level) {
                Some(set) => Ok(delegate(set, graph, ctx).await),
                None => Ok((0, 1)),
            },
        }
    }
}

fn count_with_property(graph: &Graph, resources: &[Term], property: &str) -> (u64, u64) {
    let count = resources
        .iter()
        .filter(|resource| graph.has_property(resource, property))
        .count();
    (count as u64, resources.len() as u64)
}

/// Count every `(resource, property, value)` triple and those whose value
/// satisfies `accept`.
fn count_values(
    graph: &Graph,
    resources: &[Term],
    properties: &[String],
    accept: impl Fn(&Term) -> bool,
) -> (u64, u64) {
    let mut count = 0;
    let mut total = 0;
    for resource in resources {
        for property in properties {
            for value in graph.objects(resource, property) {
                total += 1;
                if accept(value) {
                    count += 1;
                }
            }
        }
    }
    (count, total)
}

/// A literal matches on its own text; an IRI or blank node through its label
/// triples.
fn label_matches(
    graph: &Graph,
    value: &Term,
    label_property: &str,
    accept: impl Fn(&str) -> bool,
) -> bool {
    match value {
        Term::Literal { lexical, .. } => accept(lexical),
        _ => graph
            .objects(value, label_property)
            .into_iter()
            .filter_map(Term::lexical)
            .any(accept),
    }
}

/// Last path segment or fragment of an IRI.
fn local_name(iri: &str) -> &str {
    iri.trim_end_matches(['/', '#'])
        .rsplit(['/', '#'])
        .next()
        .unwrap_or(iri)
}

async fn check_urls(
    graph: &Graph,
    resources: &[Term],
    property: &str,
    entity_type: &str,
    ctx: &CheckContext,
) -> Result<(u64, u64), CheckerError> {
    let entities: Vec<Term> = if resources.is_empty() {
        graph.subjects_of_type(entity_type)
    } else {
        resources
            .iter()
            .filter(|resource| graph.has_type(resource, entity_type))
            .cloned()
            .collect()
    };

    let urls: Vec<String> = entities
        .iter()
        .flat_map(|entity| graph.objects(entity, property))
        .filter(|value| value.is_iri() || value.is_literal())
        .map(|value| value.text().to_string())
        .collect();

    let population = urls.len() as u64;
    debug!(
        property,
        entities = entities.len(),
        urls = population,
        "collected urls"
    );
    if population == 0 {
        return Ok((0, 0));
    }

    let reachable = probe::count_reachable(
        Arc::clone(&ctx.probe),
        urls,
        &ctx.reachability,
        ctx.reachability_deadline,
    )
    .await?;
    Ok((reachable, population))
}

async fn delegate(set: &ShapeSet, graph: &Graph, ctx: &CheckContext) -> (u64, u64) {
    compliance::delegate(
        set,
        graph,
        &ctx.shapes_dir,
        ctx.probe.as_ref(),
        ctx.conformance.as_ref(),
        ctx.delegate_timeout,
    )
    .await
}

#[cfg(test)]
mod tests {
    use mqa_core::namespaces::{dcat, dct, rdf, rdfs};

    use super::*;

    fn dataset(graph: &mut Graph, iri: &str) -> Term {
        let term = Term::iri(iri);
        graph
            .add(term.clone(), rdf::TYPE, Term::iri(dcat::DATASET))
            .expect("insert");
        term
    }

    #[test]
    fn property_existence_counts_supplied_resources() {
        let mut graph = Graph::new();
        let a = dataset(&mut graph, "http://example.org/a");
        let b = dataset(&mut graph, "http://example.org/b");
        graph
            .add(a.clone(), dcat::KEYWORD, Term::literal("agua"))
            .expect("insert");

        assert_eq!(count_with_property(&graph, &[a, b], dcat::KEYWORD), (1, 2));
        assert_eq!(count_with_property(&graph, &[], dcat::KEYWORD), (0, 0));
    }

    #[test]
    fn label_matching_reads_literals_and_label_triples() {
        let mut graph = Graph::new();
        let format = Term::blank("f0");
        graph
            .add(format.clone(), rdfs::LABEL, Term::literal("CSV"))
            .expect("insert");
        let accept = |label: &str| label.eq_ignore_ascii_case("csv");

        assert!(label_matches(
            &graph,
            &Term::literal("csv"),
            rdfs::LABEL,
            accept
        ));
        assert!(label_matches(&graph, &format, rdfs::LABEL, accept));
        assert!(!label_matches(
            &graph,
            &Term::iri("http://example.org/format/csv"),
            dct::FORMAT,
            accept
        ));
    }

    #[test]
    fn local_name_is_the_last_segment() {
        assert_eq!(
            local_name("http://publications.europa.eu/resource/authority/file-type/CSV"),
            "CSV"
        );
        assert_eq!(local_name("http://example.org/formats#json"), "json");
        assert_eq!(local_name("http://example.org/formats/xml/"), "xml");
    }
}
