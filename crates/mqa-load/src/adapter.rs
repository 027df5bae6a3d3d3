use async_trait::async_trait;

use mqa_core::Graph;

use crate::errors::Result;
use crate::options::LoadOptions;

/// A parsed graph plus the identifier it was retrieved from.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// `None` when the content was supplied directly.
    pub source: Option<String>,
}

/// Trait implemented by anything that can produce a graph to evaluate.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Human readable description used in logs.
    fn describe(&self) -> String;

    /// Fetch and parse the graph.
    async fn load(&self, opts: &LoadOptions) -> Result<LoadedGraph>;
}
