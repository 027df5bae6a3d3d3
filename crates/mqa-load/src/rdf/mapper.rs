use sophia_api::term::{Term as SophiaTerm, TermKind};

use mqa_core::Term;

use crate::errors::{LoadError, Result};

const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Map a parsed sophia term into the evaluation graph's term model.
pub fn map_term<T: SophiaTerm>(term: T) -> Result<Term> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| Term::iri(iri.as_str()))
            .ok_or_else(|| LoadError::Parse("IRI term without IRI".to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::blank(id.as_str()))
            .ok_or_else(|| LoadError::Parse("blank node without id".to_string())),
        TermKind::Literal => map_literal(&term),
        other => Err(LoadError::Parse(format!("unsupported term kind {other:?}"))),
    }
}

fn map_literal<T: SophiaTerm>(term: &T) -> Result<Term> {
    let lexical = term
        .lexical_form()
        .ok_or_else(|| LoadError::Parse("literal without lexical form".to_string()))?
        .to_string();

    if let Some(tag) = term.language_tag() {
        return Ok(Term::lang_literal(lexical, tag.as_str()));
    }

    match term.datatype() {
        Some(datatype) if datatype.as_str() != RDF_LANG_STRING => {
            Ok(Term::typed_literal(lexical, datatype.as_str()))
        }
        _ => Ok(Term::literal(lexical)),
    }
}
