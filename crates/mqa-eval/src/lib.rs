//! Quality scoring of DCAT metadata graphs.

pub mod checkers;
pub mod compliance;
pub mod engine;
pub mod errors;
pub mod labels;
pub mod metrics;
pub mod model;
pub mod probe;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod vocabulary;

pub use checkers::{CheckContext, Checker};
pub use compliance::{
    CommandConformanceEngine, ConformanceEngine, LeveledShapes, ShapeSet, ShapesDocument,
    UnavailableConformanceEngine, load_shapes,
};
pub use engine::ScoringEngine;
pub use errors::{CheckerError, ComplianceError, EvalError, ProbeError};
pub use labels::{LabelLookup, StaticLabels, fallback_label, metric_label};
pub use metrics::{CheckResult, DimensionScores, aggregate};
pub use model::{EvaluateOptions, ReachabilityPolicy};
pub use probe::{HttpProbe, ProbeMethod, ReqwestProbe, count_reachable, is_reachable, normalize_url};
pub use registry::{CheckerRegistry, standard_checkers};
pub use report::{QualityReport, assemble, render_markdown};
pub use resolver::ResourceResolver;
pub use vocabulary::{Vocabulary, VocabularyId, VocabularyLoader};
