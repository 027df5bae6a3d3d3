use std::fmt;
use std::path::Path;

use crate::errors::{LoadError, Result};

/// RDF syntaxes recognised on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    Turtle,
    NTriples,
    RdfXml,
    JsonLd,
}

impl RdfFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "n-triples",
            RdfFormat::RdfXml => "rdf/xml",
            RdfFormat::JsonLd => "json-ld",
        }
    }

    /// Guess from a URL or file path extension. Query strings are ignored.
    pub fn from_extension(location: &str) -> Option<Self> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let extension = Path::new(path)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "ttl" | "n3" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "rdf" | "xml" | "owl" => Some(RdfFormat::RdfXml),
            "jsonld" => Some(RdfFormat::JsonLd),
            _ => None,
        }
    }

    /// Loose match against an HTTP `Content-Type` header.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let value = content_type.to_ascii_lowercase();
        if value.contains("xml") {
            Some(RdfFormat::RdfXml)
        } else if value.contains("turtle") || value.contains("ttl") || value.contains("n3") {
            Some(RdfFormat::Turtle)
        } else if value.contains("n-triples") {
            Some(RdfFormat::NTriples)
        } else if value.contains("json") {
            Some(RdfFormat::JsonLd)
        } else {
            None
        }
    }

    /// Exact MIME type for directly supplied content.
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence.to_ascii_lowercase().as_str() {
            "text/turtle" => Ok(RdfFormat::Turtle),
            "application/n-triples" => Ok(RdfFormat::NTriples),
            "application/rdf+xml" => Ok(RdfFormat::RdfXml),
            "application/ld+json" => Ok(RdfFormat::JsonLd),
            _ => Err(LoadError::UnsupportedFormat(mime.to_string())),
        }
    }

    /// Extension first, then the response header, else RDF/XML.
    pub fn detect(location: &str, content_type: Option<&str>) -> Self {
        RdfFormat::from_extension(location)
            .or_else(|| content_type.and_then(RdfFormat::from_content_type))
            .unwrap_or(RdfFormat::RdfXml)
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
