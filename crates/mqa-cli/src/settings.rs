use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mqa_eval::{CommandConformanceEngine, EvaluateOptions, ReachabilityPolicy};
use mqa_load::LoadOptions;
use serde::{Deserialize, Serialize};

use crate::CliError;

pub const DEFAULT_SETTINGS_FILE: &str = "mqa.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Timeout for fetching the catalog itself.
    pub load_timeout_secs: u64,
    /// Timeout for one reachability probe.
    pub probe_timeout_secs: u64,
    pub max_redirects: usize,
    pub max_concurrency: usize,
    pub deadline_secs: u64,
    pub verify_tls: bool,
    pub allow_insecure: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let policy = ReachabilityPolicy::default();
        Self {
            load_timeout_secs: LoadOptions::default().timeout.as_secs(),
            probe_timeout_secs: policy.timeout_secs,
            max_redirects: policy.max_redirects,
            max_concurrency: policy.max_concurrency,
            deadline_secs: policy.deadline_secs,
            verify_tls: policy.verify_tls,
            allow_insecure: policy.allow_insecure,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub shapes_dir: PathBuf,
    pub vocab_dir: PathBuf,
    /// JSON array of extra profile definitions.
    pub profiles_file: Option<PathBuf>,
}

impl Default for PathSettings {
    fn default() -> Self {
        let options = EvaluateOptions::default();
        Self {
            shapes_dir: options.shapes_dir,
            vocab_dir: options.vocab_dir,
            profiles_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConformanceSettings {
    /// Validator executable; empty disables shape validation.
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ConformanceSettings {
    fn default() -> Self {
        let engine = CommandConformanceEngine::default();
        Self {
            command: engine.program,
            args: engine.args,
            timeout_secs: engine.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub languages: Vec<String>,
    /// `metric id -> language -> label` overrides.
    pub overrides: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            languages: EvaluateOptions::default().label_languages,
            overrides: BTreeMap::new(),
        }
    }
}

/// Contents of `mqa.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub paths: PathSettings,
    pub conformance: ConformanceSettings,
    pub labels: LabelSettings,
}

impl Settings {
    /// Read `path`, or `mqa.toml` in the working directory when it exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_SETTINGS_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// `SSL_VERIFY` and `ALLOW_INSECURE_URLS` override the `[http]` flags.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("SSL_VERIFY") {
            self.http.verify_tls = is_truthy(&value);
        }
        if let Some(value) = lookup("ALLOW_INSECURE_URLS") {
            self.http.allow_insecure = is_truthy(&value);
        }
    }

    pub fn evaluate_options(&self) -> EvaluateOptions {
        EvaluateOptions {
            reachability: ReachabilityPolicy {
                timeout_secs: self.http.probe_timeout_secs,
                max_redirects: self.http.max_redirects,
                max_concurrency: self.http.max_concurrency,
                deadline_secs: self.http.deadline_secs,
                verify_tls: self.http.verify_tls,
                allow_insecure: self.http.allow_insecure,
            },
            delegate_timeout_secs: self.conformance.timeout_secs,
            shapes_dir: self.paths.shapes_dir.clone(),
            vocab_dir: self.paths.vocab_dir.clone(),
            label_languages: self.labels.languages.clone(),
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            timeout: Duration::from_secs(self.http.load_timeout_secs),
            verify_tls: self.http.verify_tls,
            max_redirects: self.http.max_redirects,
        }
    }

    /// `None` when no validator command is configured.
    pub fn conformance_engine(&self) -> Option<CommandConformanceEngine> {
        if self.conformance.command.trim().is_empty() {
            return None;
        }
        Some(CommandConformanceEngine {
            program: self.conformance.command.clone(),
            args: self.conformance.args.clone(),
            timeout: Duration::from_secs(self.conformance.timeout_secs),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[http]
max_concurrency = 2

[paths]
vocab_dir = "vocabs"

[labels.overrides.dct_publisher]
es = "Publicador"
"#,
        )
        .expect("parse settings");

        assert_eq!(settings.http.max_concurrency, 2);
        assert!(settings.http.verify_tls);
        assert!(!settings.http.allow_insecure);
        assert_eq!(settings.paths.vocab_dir, PathBuf::from("vocabs"));
        assert_eq!(settings.paths.shapes_dir, PathBuf::from("docs/shacl"));
        assert_eq!(settings.conformance.command, "pyshacl");
        assert_eq!(
            settings.labels.overrides["dct_publisher"]["es"],
            "Publicador"
        );

        let options = settings.evaluate_options();
        assert_eq!(options.reachability.max_concurrency, 2);
        assert_eq!(options.label_languages, vec!["en", "es"]);
    }

    #[test]
    fn environment_overrides_tls_flags() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            "SSL_VERIFY" => Some("false".to_string()),
            "ALLOW_INSECURE_URLS" => Some("Yes".to_string()),
            _ => None,
        });
        assert!(!settings.http.verify_tls);
        assert!(settings.http.allow_insecure);
        assert!(!settings.load_options().verify_tls);
    }

    #[test]
    fn empty_command_disables_the_validator() {
        let mut settings = Settings::default();
        assert!(settings.conformance_engine().is_some());
        settings.conformance.command = String::new();
        assert!(settings.conformance_engine().is_none());
    }
}
