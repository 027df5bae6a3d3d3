use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use mqa_core::{ComplianceLevel, Graph};
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::ComplianceError;
use crate::probe::HttpProbe;

const DCAT_AP_VERSION: &str = "2.1.1";
const DCAT_AP_ES_VERSION: &str = "1.0.0";
const NTI_RISP_VERSION: &str = "1.0.0";

/// Named set of shape files, relative to the shapes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSet {
    pub name: String,
    pub files: Vec<PathBuf>,
    /// Fetched when none of the local files can be read.
    pub fallback_url: Option<String>,
}

/// Shape sets keyed by validation depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeveledShapes {
    pub levels: BTreeMap<ComplianceLevel, ShapeSet>,
    pub baseline: ComplianceLevel,
}

impl LeveledShapes {
    /// Shape set for `level`, or the baseline one when that level is absent.
    pub fn select(&self, level: ComplianceLevel) -> Option<&ShapeSet> {
        self.levels
            .get(&level)
            .or_else(|| self.levels.get(&self.baseline))
    }
}

/// Concatenated Turtle text of a shape set.
#[derive(Debug, Clone)]
pub struct ShapesDocument {
    pub name: String,
    pub turtle: String,
    /// Files or URLs the text was read from.
    pub origins: Vec<String>,
}

/// Whole-graph shape conformance, delegated to an external engine.
#[async_trait]
pub trait ConformanceEngine: Send + Sync {
    async fn conforms(
        &self,
        graph: &Graph,
        shapes: &ShapesDocument,
    ) -> Result<bool, ComplianceError>;
}

/// Engine used when no validator is configured. Every graph is
/// non-conformant.
#[derive(Debug, Clone, Default)]
pub struct UnavailableConformanceEngine;

#[async_trait]
impl ConformanceEngine for UnavailableConformanceEngine {
    async fn conforms(
        &self,
        _graph: &Graph,
        shapes: &ShapesDocument,
    ) -> Result<bool, ComplianceError> {
        Err(ComplianceError::Engine(format!(
            "no conformance engine configured for {}",
            shapes.name
        )))
    }
}

/// Runs an external SHACL validator executable.
///
/// The data graph is written as N-Triples and the shapes as Turtle to
/// temporary files; `{data}` and `{shapes}` in the arguments are replaced by
/// their paths. Exit status 0 means conformant, 1 non-conformant.
#[derive(Debug, Clone)]
pub struct CommandConformanceEngine {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for CommandConformanceEngine {
    fn default() -> Self {
        Self {
            program: "pyshacl".to_string(),
            args: ["-s", "{shapes}", "-sf", "turtle", "-df", "nt", "{data}"]
                .iter()
                .map(|arg| arg.to_string())
                .collect(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[async_trait]
impl ConformanceEngine for CommandConformanceEngine {
    async fn conforms(
        &self,
        graph: &Graph,
        shapes: &ShapesDocument,
    ) -> Result<bool, ComplianceError> {
        let workdir = TempFiles::create("conformance")?;
        let data_path = workdir.write("data.nt", &graph.to_ntriples())?;
        let shapes_path = workdir.write("shapes.ttl", &shapes.turtle)?;

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{data}", &data_path.display().to_string())
                    .replace("{shapes}", &shapes_path.display().to_string())
            })
            .collect();

        let child = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ComplianceError::Engine(format!("spawn {}: {err}", self.program)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ComplianceError::Timeout(self.timeout))??;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => Err(ComplianceError::Engine(format!(
                "{} exited with {:?}: {}",
                self.program,
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

/// Temporary directory removed on drop.
struct TempFiles {
    dir: PathBuf,
}

impl TempFiles {
    fn create(label: &str) -> Result<Self, ComplianceError> {
        let dir = std::env::temp_dir().join(format!("mqa_{label}_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf, ComplianceError> {
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Read a shape set from `shapes_dir`, falling back to its remote location
/// when no local file is readable.
pub async fn load_shapes(
    set: &ShapeSet,
    shapes_dir: &Path,
    probe: &dyn HttpProbe,
) -> Result<ShapesDocument, ComplianceError> {
    let mut turtle = String::new();
    let mut origins = Vec::new();

    for file in &set.files {
        let path = shapes_dir.join(file);
        if !path.exists() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => {
                turtle.push_str(&text);
                turtle.push('\n');
                origins.push(path.display().to_string());
            }
            Err(err) => warn!(path = %path.display(), error = %err, "shape file unreadable"),
        }
    }

    if origins.is_empty() {
        if let Some(url) = &set.fallback_url {
            match probe.fetch_text(url).await {
                Ok(text) => {
                    turtle.push_str(&text);
                    origins.push(url.clone());
                }
                Err(err) => warn!(url = %url, error = %err, "shape fallback fetch failed"),
            }
        }
    }

    if origins.is_empty() {
        return Err(ComplianceError::ShapesUnavailable(set.name.clone()));
    }

    info!(shape_set = %set.name, sources = origins.len(), "shapes loaded");
    Ok(ShapesDocument {
        name: set.name.clone(),
        turtle,
        origins,
    })
}

/// Whole-graph conformance as `(count, population)`: `(1, 1)` when the graph
/// conforms, `(0, 1)` otherwise. Shape, engine and timeout failures are
/// logged and read as non-conformance.
pub async fn delegate(
    set: &ShapeSet,
    graph: &Graph,
    shapes_dir: &Path,
    probe: &dyn HttpProbe,
    engine: &dyn ConformanceEngine,
    timeout: Duration,
) -> (u64, u64) {
    let outcome = async {
        let shapes = load_shapes(set, shapes_dir, probe).await?;
        tokio::time::timeout(timeout, engine.conforms(graph, &shapes))
            .await
            .map_err(|_| ComplianceError::Timeout(timeout))?
    };

    match outcome.await {
        Ok(true) => (1, 1),
        Ok(false) => {
            info!(shape_set = %set.name, "graph does not conform");
            (0, 1)
        }
        Err(err) => {
            warn!(shape_set = %set.name, error = %err, "compliance check failed");
            (0, 1)
        }
    }
}

fn shape_set(name: &str, dir: &str, files: &[&str], fallback_url: &str) -> ShapeSet {
    ShapeSet {
        name: name.to_string(),
        files: files
            .iter()
            .map(|file| Path::new(dir).join(file))
            .collect(),
        fallback_url: Some(fallback_url.to_string()),
    }
}

/// DCAT-AP shapes: level 1 base, level 2 adds controlled vocabularies,
/// level 3 adds recommended properties.
pub fn dcat_ap_shapes() -> LeveledShapes {
    let dir = format!("dcat-ap/{DCAT_AP_VERSION}");
    let file = |suffix: &str| format!("dcat-ap_{DCAT_AP_VERSION}_shacl_{suffix}");
    let base = [
        file("shapes.ttl"),
        file("imports.ttl"),
        file("range.ttl"),
        file("deprecateduris.ttl"),
    ];
    let vocabularies = [file("mdr-vocabularies.shape.ttl"), file("mdr_imports.ttl")];
    let recommended = [file("shapes_recommended.ttl")];
    let fallback = format!(
        "https://raw.githubusercontent.com/SEMICeu/DCAT-AP/master/releases/{DCAT_AP_VERSION}/{}",
        file("shapes.ttl")
    );

    let level = |groups: &[&[String]]| {
        let files: Vec<&str> = groups
            .iter()
            .flat_map(|group| group.iter().map(String::as_str))
            .collect();
        shape_set("dcat_ap", &dir, &files, &fallback)
    };

    let mut levels = BTreeMap::new();
    levels.insert(ComplianceLevel::Level1, level(&[&base]));
    levels.insert(ComplianceLevel::Level2, level(&[&base, &vocabularies]));
    levels.insert(
        ComplianceLevel::Level3,
        level(&[&base, &vocabularies, &recommended]),
    );

    LeveledShapes {
        levels,
        baseline: ComplianceLevel::Level2,
    }
}

const PROFILE_SHAPE_FILES: [&str; 6] = [
    "shacl_catalog_shape.ttl",
    "shacl_common_shapes.ttl",
    "shacl_dataservice_shape.ttl",
    "shacl_dataset_shape.ttl",
    "shacl_distribution_shape.ttl",
    "shacl_mdr-vocabularies.shape.ttl",
];

pub fn dcat_ap_es_shapes() -> ShapeSet {
    shape_set(
        "dcat_ap_es",
        &format!("dcat-ap-es/{DCAT_AP_ES_VERSION}"),
        &PROFILE_SHAPE_FILES,
        &format!(
            "https://raw.githubusercontent.com/datosgobes/DCAT-AP-ES/main/shacl/{DCAT_AP_ES_VERSION}/shacl_common_shapes.ttl"
        ),
    )
}

pub fn nti_risp_shapes() -> ShapeSet {
    shape_set(
        "nti_risp",
        &format!("nti-risp/{NTI_RISP_VERSION}"),
        &PROFILE_SHAPE_FILES,
        &format!(
            "https://raw.githubusercontent.com/datosgobes/NTI-RISP/main/shacl/{NTI_RISP_VERSION}/shacl_common_shapes.ttl"
        ),
    )
}
