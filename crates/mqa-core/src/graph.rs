use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::namespaces::rdf;

/// An RDF term as seen by the quality checks.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    Iri { value: String },
    BlankNode { id: String },
    Literal {
        lexical: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri {
            value: value.into(),
        }
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::BlankNode { id: id.into() }
    }

    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn lang_literal(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri { .. })
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode { .. })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri { value } => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn lexical(&self) -> Option<&str> {
        match self {
            Term::Literal { lexical, .. } => Some(lexical.as_str()),
            _ => None,
        }
    }

    /// IRI text, blank node id or literal lexical form.
    pub fn text(&self) -> &str {
        match self {
            Term::Iri { value } => value,
            Term::BlankNode { id } => id,
            Term::Literal { lexical, .. } => lexical,
        }
    }

    fn write_ntriples(&self, out: &mut String) {
        match self {
            Term::Iri { value } => {
                let _ = write!(out, "<{value}>");
            }
            Term::BlankNode { id } => {
                let _ = write!(out, "_:{id}");
            }
            Term::Literal {
                lexical,
                datatype,
                language,
            } => {
                out.push('"');
                out.push_str(&escape_literal(lexical));
                out.push('"');
                if let Some(language) = language {
                    let _ = write!(out, "@{language}");
                } else if let Some(datatype) = datatype {
                    let _ = write!(out, "^^<{datatype}>");
                }
            }
        }
    }
}

/// A single subject/predicate/object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// In-memory triple set indexed by subject.
///
/// Triples keep their insertion order and duplicates are dropped, so every
/// query that returns subjects or objects is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    by_subject: HashMap<Term, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple, returning false when it was already present.
    pub fn insert(&mut self, triple: Triple) -> Result<bool> {
        if triple.subject.is_literal() {
            return Err(Error::InvalidTerm(format!(
                "literal subject '{}'",
                triple.subject.text()
            )));
        }
        if !triple.predicate.is_iri() {
            return Err(Error::InvalidTerm(format!(
                "predicate '{}' is not an IRI",
                triple.predicate.text()
            )));
        }
        if self.seen.contains(&triple) {
            return Ok(false);
        }

        let index = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(index);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        Ok(true)
    }

    /// Convenience wrapper around [`Graph::insert`] for IRI predicates.
    pub fn add(&mut self, subject: Term, predicate: &str, object: Term) -> Result<bool> {
        self.insert(Triple::new(subject, Term::iri(predicate), object))
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples matching a pattern; `None` acts as a wildcard.
    pub fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Vec<&Triple> {
        let matches = |triple: &&Triple| {
            predicate.is_none_or(|p| triple.predicate.as_iri() == Some(p))
                && object.is_none_or(|o| &triple.object == o)
        };

        match subject {
            Some(subject) => self
                .by_subject
                .get(subject)
                .map(|indexes| {
                    indexes
                        .iter()
                        .map(|idx| &self.triples[*idx])
                        .filter(matches)
                        .collect()
                })
                .unwrap_or_default(),
            None => self.triples.iter().filter(matches).collect(),
        }
    }

    pub fn objects(&self, subject: &Term, predicate: &str) -> Vec<&Term> {
        self.triples_matching(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|triple| &triple.object)
            .collect()
    }

    pub fn has_property(&self, subject: &Term, predicate: &str) -> bool {
        self.by_subject.get(subject).is_some_and(|indexes| {
            indexes
                .iter()
                .any(|idx| self.triples[*idx].predicate.as_iri() == Some(predicate))
        })
    }

    pub fn has_type(&self, subject: &Term, type_iri: &str) -> bool {
        self.objects(subject, rdf::TYPE)
            .into_iter()
            .any(|object| object.as_iri() == Some(type_iri))
    }

    /// Distinct subjects typed `type_iri`, in first-seen order.
    pub fn subjects_of_type(&self, type_iri: &str) -> Vec<Term> {
        let type_term = Term::iri(type_iri);
        let mut seen = HashSet::new();
        self.triples_matching(None, Some(rdf::TYPE), Some(&type_term))
            .into_iter()
            .filter(|triple| seen.insert(&triple.subject))
            .map(|triple| triple.subject.clone())
            .collect()
    }

    /// Serialize the graph as N-Triples.
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for triple in &self.triples {
            triple.subject.write_ntriples(&mut out);
            out.push(' ');
            triple.predicate.write_ntriples(&mut out);
            out.push(' ');
            triple.object.write_ntriples(&mut out);
            out.push_str(" .\n");
        }
        out
    }
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{dcat, dct};

    fn sample() -> Graph {
        let mut graph = Graph::new();
        let ds = Term::iri("http://example.org/ds/1");
        let dist = Term::iri("http://example.org/dist/1");
        graph
            .add(ds.clone(), rdf::TYPE, Term::iri(dcat::DATASET))
            .expect("insert triple");
        graph
            .add(ds.clone(), dcat::KEYWORD, Term::lang_literal("agua", "es"))
            .expect("insert triple");
        graph
            .add(ds.clone(), dcat::KEYWORD, Term::literal("water"))
            .expect("insert triple");
        graph
            .add(dist.clone(), rdf::TYPE, Term::iri(dcat::DISTRIBUTION))
            .expect("insert triple");
        graph
            .add(ds, rdf::TYPE, Term::iri(dcat::DATASET))
            .expect("insert triple");
        graph
    }

    #[test]
    fn insert_drops_duplicates() {
        let graph = sample();
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn rejects_literal_subject() {
        let mut graph = Graph::new();
        let err = graph
            .add(Term::literal("x"), dct::ISSUED, Term::literal("2024"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTerm(_)));
    }

    #[test]
    fn subjects_of_type_are_distinct_and_ordered() {
        let mut graph = sample();
        graph
            .add(
                Term::blank("b0"),
                rdf::TYPE,
                Term::iri(dcat::DATASET),
            )
            .expect("insert triple");

        let datasets = graph.subjects_of_type(dcat::DATASET);
        assert_eq!(
            datasets,
            vec![Term::iri("http://example.org/ds/1"), Term::blank("b0")]
        );
        assert!(graph.subjects_of_type(dcat::THEME).is_empty());
    }

    #[test]
    fn pattern_queries_use_subject_index() {
        let graph = sample();
        let ds = Term::iri("http://example.org/ds/1");

        assert_eq!(graph.objects(&ds, dcat::KEYWORD).len(), 2);
        assert!(graph.has_property(&ds, dcat::KEYWORD));
        assert!(!graph.has_property(&ds, dcat::THEME));
        assert!(graph.has_type(&ds, dcat::DATASET));
        assert_eq!(graph.triples_matching(None, Some(rdf::TYPE), None).len(), 2);
    }

    #[test]
    fn ntriples_escapes_literals() {
        let mut graph = Graph::new();
        graph
            .add(
                Term::iri("http://example.org/s"),
                dct::RIGHTS,
                Term::lang_literal("say \"hi\"\n", "en"),
            )
            .expect("insert triple");
        graph
            .add(
                Term::blank("b1"),
                dcat::BYTE_SIZE,
                Term::typed_literal("42", "http://www.w3.org/2001/XMLSchema#decimal"),
            )
            .expect("insert triple");

        let expected = "<http://example.org/s> <http://purl.org/dc/terms/rights> \"say \\\"hi\\\"\\n\"@en .\n\
_:b1 <http://www.w3.org/ns/dcat#byteSize> \"42\"^^<http://www.w3.org/2001/XMLSchema#decimal> .\n";
        assert_eq!(graph.to_ntriples(), expected);
    }
}
