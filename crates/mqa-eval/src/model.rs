use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How URL reachability is probed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilityPolicy {
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub max_redirects: usize,
    /// Probes in flight at once.
    pub max_concurrency: usize,
    /// Upper bound for the URL checks of one evaluation, shared by all URL
    /// metrics. URLs still pending when it passes count as unreachable.
    pub deadline_secs: u64,
    pub verify_tls: bool,
    /// Retry without certificate verification when verification fails.
    pub allow_insecure: bool,
}

impl ReachabilityPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl Default for ReachabilityPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_redirects: 10,
            max_concurrency: 8,
            deadline_secs: 60,
            verify_tls: true,
            allow_insecure: false,
        }
    }
}

/// Options for a scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluateOptions {
    pub reachability: ReachabilityPolicy,
    /// Timeout for one call into the conformance engine.
    pub delegate_timeout_secs: u64,
    /// Root of the local shape files.
    pub shapes_dir: PathBuf,
    /// Directory holding the vocabulary CSV files.
    pub vocab_dir: PathBuf,
    /// Languages attached to every metric label.
    pub label_languages: Vec<String>,
}

impl EvaluateOptions {
    pub fn delegate_timeout(&self) -> Duration {
        Duration::from_secs(self.delegate_timeout_secs)
    }
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            reachability: ReachabilityPolicy::default(),
            delegate_timeout_secs: 120,
            shapes_dir: PathBuf::from("docs/shacl"),
            vocab_dir: PathBuf::from("docs/vocabularies"),
            label_languages: vec!["en".to_string(), "es".to_string()],
        }
    }
}
