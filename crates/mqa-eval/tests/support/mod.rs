#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mqa_core::Graph;
use mqa_eval::{
    CheckContext, ComplianceError, ConformanceEngine, EvaluateOptions, HttpProbe, ProbeError,
    ProbeMethod, ShapesDocument, VocabularyLoader,
};
use mqa_load::{RdfFormat, parse_graph};

pub const CATALOG: &str = r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .

<http://example.org/catalog/ds/1> a dcat:Dataset ;
    dcat:keyword "aire", "calidad" ;
    dcat:theme <http://datos.gob.es/kos/sector-publico/sector/medio-ambiente> ;
    dct:publisher <http://example.org/org/1> ;
    dct:issued "2024-01-10" ;
    dcat:distribution <http://example.org/catalog/dist/1>, <http://example.org/catalog/dist/2> .

<http://example.org/catalog/dist/1> a dcat:Distribution ;
    dcat:accessURL <http://files.example.org/air.csv> ;
    dct:format <http://publications.europa.eu/resource/authority/file-type/CSV> ;
    dct:license <http://x/a> .

<http://example.org/catalog/dist/2> a dcat:Distribution ;
    dcat:accessURL <http://files.example.org/broken.csv> ;
    dct:format "JSON" ;
    dct:license <http://x/c> .
"#;

pub fn catalog_graph() -> Graph {
    parse_graph(CATALOG, RdfFormat::Turtle, None).expect("parse catalog fixture")
}

/// Canned answer of the scripted probe for one URL.
#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Status(u16),
    Refused,
    /// 405 on HEAD, 200 on GET.
    GetOnly,
    /// Fails verification, answers 200 without it.
    BadCertificate,
    Hang,
}

/// Probe answering from a table; unknown URLs refuse the connection.
#[derive(Default)]
pub struct ScriptedProbe {
    answers: HashMap<String, Answer>,
    calls: Mutex<Vec<(ProbeMethod, String, bool)>>,
}

impl ScriptedProbe {
    pub fn new(answers: &[(&str, Answer)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(url, answer)| (url.to_string(), *answer))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(ProbeMethod, String, bool)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl HttpProbe for ScriptedProbe {
    async fn status(
        &self,
        method: ProbeMethod,
        url: &str,
        verify_tls: bool,
    ) -> Result<u16, ProbeError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((method, url.to_string(), verify_tls));
        match self.answers.get(url).copied().unwrap_or(Answer::Refused) {
            Answer::Status(code) => Ok(code),
            Answer::Refused => Err(ProbeError::Connect("connection refused".to_string())),
            Answer::GetOnly if method == ProbeMethod::Head => Ok(405),
            Answer::GetOnly => Ok(200),
            Answer::BadCertificate if verify_tls => {
                Err(ProbeError::Tls("invalid peer certificate".to_string()))
            }
            Answer::BadCertificate => Ok(200),
            Answer::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(200)
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ProbeError> {
        Err(ProbeError::Connect(format!("{url} is offline")))
    }
}

/// Engine with a fixed verdict that records the shapes it was given.
pub struct FixedConformance {
    pub verdict: bool,
    seen: Mutex<Vec<String>>,
}

impl FixedConformance {
    pub fn new(verdict: bool) -> Self {
        Self {
            verdict,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl ConformanceEngine for FixedConformance {
    async fn conforms(
        &self,
        _graph: &Graph,
        shapes: &ShapesDocument,
    ) -> Result<bool, ComplianceError> {
        self.seen
            .lock()
            .expect("seen lock")
            .extend(shapes.origins.iter().cloned());
        Ok(self.verdict)
    }
}

/// Temporary directory with vocabulary and shape fixtures.
pub struct Fixtures {
    pub root: PathBuf,
}

impl Fixtures {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("mqa_eval_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("vocabularies")).expect("create vocab dir");
        fs::create_dir_all(root.join("shacl")).expect("create shapes dir");
        Self { root }
    }

    pub fn vocab_dir(&self) -> PathBuf {
        self.root.join("vocabularies")
    }

    pub fn shapes_dir(&self) -> PathBuf {
        self.root.join("shacl")
    }

    pub fn write_vocabulary(&self, file: &str, contents: &str) {
        fs::write(self.vocab_dir().join(file), contents).expect("write vocabulary");
    }

    pub fn write_shapes(&self, relative: &str) {
        let path = self.shapes_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create shapes subdir");
        }
        fs::write(&path, "@prefix sh: <http://www.w3.org/ns/shacl#> .\n").expect("write shapes");
    }

    pub fn options(&self) -> EvaluateOptions {
        EvaluateOptions {
            shapes_dir: self.shapes_dir(),
            vocab_dir: self.vocab_dir(),
            ..EvaluateOptions::default()
        }
    }

    pub fn context(
        &self,
        options: &EvaluateOptions,
        probe: Arc<dyn HttpProbe>,
        conformance: Arc<dyn ConformanceEngine>,
    ) -> CheckContext {
        CheckContext::new(
            options,
            Default::default(),
            probe,
            conformance,
            Arc::new(VocabularyLoader::new(self.vocab_dir())),
        )
    }
}

impl Drop for Fixtures {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
