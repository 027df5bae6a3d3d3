use std::fs;
use std::path::Path;

use async_trait::async_trait;
use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::quad::Quad as _;
use sophia_api::source::{QuadSource, StreamError, TripleSource};
use sophia_api::triple::Triple as _;
use sophia_iri::Iri;
use sophia_jsonld::JsonLdParser;
use sophia_turtle::parser::nt::NTriplesParser;
use sophia_turtle::parser::turtle::TurtleParser;
use sophia_xml::parser::RdfXmlParser;
use tracing::{info, warn};

use mqa_core::{Graph, Triple};

use crate::adapter::{GraphSource, LoadedGraph};
use crate::errors::{LoadError, Result};
use crate::format::RdfFormat;
use crate::options::LoadOptions;

mod fetch;
mod mapper;

pub use mapper::map_term;

/// Remote catalog fetched over HTTP.
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
}

impl UrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl GraphSource for UrlSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self, opts: &LoadOptions) -> Result<LoadedGraph> {
        let fetched = fetch::fetch(&self.url, opts).await?;
        let format = RdfFormat::detect(&self.url, fetched.content_type.as_deref());
        info!(url = %self.url, format = %format, "parsing remote graph");

        let graph = parse_graph(&fetched.body, format, Some(&self.url))?;
        Ok(LoadedGraph {
            graph,
            source: Some(self.url.clone()),
        })
    }
}

/// Content supplied directly by the caller.
#[derive(Debug, Clone)]
pub struct ContentSource {
    content: String,
    format: RdfFormat,
    source: Option<String>,
}

impl ContentSource {
    /// In-memory content identified by its MIME type.
    pub fn new(content: impl Into<String>, mime: &str) -> Result<Self> {
        Ok(Self {
            content: content.into(),
            format: RdfFormat::from_mime(mime)?,
            source: None,
        })
    }

    /// Read a local file. The MIME type, when given, overrides the extension.
    pub fn from_file(path: &Path, mime: Option<&str>) -> Result<Self> {
        let location = path.display().to_string();
        let format = match mime {
            Some(mime) => RdfFormat::from_mime(mime)?,
            None => RdfFormat::from_extension(&location)
                .ok_or_else(|| LoadError::UnsupportedFormat(location.clone()))?,
        };
        Ok(Self {
            content: fs::read_to_string(path)?,
            format,
            source: Some(location),
        })
    }
}

#[async_trait]
impl GraphSource for ContentSource {
    fn describe(&self) -> String {
        self.source
            .clone()
            .unwrap_or_else(|| format!("direct {} content", self.format))
    }

    async fn load(&self, _opts: &LoadOptions) -> Result<LoadedGraph> {
        let graph = parse_graph(&self.content, self.format, None)?;
        Ok(LoadedGraph {
            graph,
            source: self.source.clone(),
        })
    }
}

/// Parse `text` in the given syntax. An empty result is an error.
///
/// `base` resolves relative references in Turtle and RDF/XML; JSON-LD
/// documents are expected to carry absolute identifiers or their own `@base`.
pub fn parse_graph(text: &str, format: RdfFormat, base: Option<&str>) -> Result<Graph> {
    let base = base.and_then(|value| match Iri::new(value.to_string()) {
        Ok(iri) => Some(iri),
        Err(err) => {
            warn!(base = %value, error = %err, "ignoring invalid base IRI");
            None
        }
    });

    let graph = match format {
        RdfFormat::Turtle => collect(TurtleParser { base }.parse_str(text))?,
        RdfFormat::NTriples => collect(NTriplesParser {}.parse_str(text))?,
        RdfFormat::RdfXml => collect(RdfXmlParser { base }.parse_str(text))?,
        RdfFormat::JsonLd => collect_quads(JsonLdParser::new().parse_str(text))?,
    };

    if graph.is_empty() {
        return Err(LoadError::Empty);
    }
    info!(triples = graph.len(), format = %format, "graph parsed");
    Ok(graph)
}

/// Named graphs are merged into the single evaluation graph.
fn collect_quads<S: QuadSource>(mut source: S) -> Result<Graph> {
    let mut graph = Graph::new();
    source
        .try_for_each_quad(|quad| -> Result<()> {
            graph.insert(Triple::new(
                map_term(quad.s())?,
                map_term(quad.p())?,
                map_term(quad.o())?,
            ))?;
            Ok(())
        })
        .map_err(|err| match err {
            StreamError::SourceError(err) => LoadError::Parse(err.to_string()),
            StreamError::SinkError(err) => err,
        })?;
    Ok(graph)
}

fn collect<S: TripleSource>(mut source: S) -> Result<Graph> {
    let mut graph = Graph::new();
    source
        .try_for_each_triple(|triple| -> Result<()> {
            graph.insert(Triple::new(
                map_term(triple.s())?,
                map_term(triple.p())?,
                map_term(triple.o())?,
            ))?;
            Ok(())
        })
        .map_err(|err| match err {
            StreamError::SourceError(err) => LoadError::Parse(err.to_string()),
            StreamError::SinkError(err) => err,
        })?;
    Ok(graph)
}
