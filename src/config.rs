//! Configuration for smellcheck.
//!
//! Loaded from `smellcheck.yaml` (or `.smellcheck.yaml`) in the scanned
//! directory, from an explicit `--config` path, or from the user config
//! directory. Every key is optional; missing keys fall back to the
//! defaults documented on each field.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use directories::ProjectDirs;

use crate::detect::Rule;

/// Weight used for a code that no rule claims.
pub const DEFAULT_WEIGHT: u32 = 3;

/// File names probed, in order, when no explicit path is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["smellcheck.yaml", ".smellcheck.yaml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    /// Per-code weight overrides, e.g. `{ CYC: 5 }`.
    pub weights: HashMap<String, u32>,
    /// Codes to switch off.
    pub disabled_rules: Vec<String>,
    /// Codes to switch on that are off by default (`IFI`).
    pub enabled_rules: Vec<String>,
    pub classifier: Option<ClassifierConfig>,
    pub source: SourceOptions,
}

/// Numeric limits of the syntactic rules. A construct is flagged when its
/// measure exceeds the limit.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Thresholds {
    /// Cyclomatic complexity per method (default: 10)
    pub cyclomatic_complexity: usize,
    /// Methods per class, accessors excluded (default: 10)
    pub max_methods: usize,
    /// Imports per file (default: 30)
    pub max_imports: usize,
    /// Mutable instance fields per class (default: 15)
    pub max_fields: usize,
    /// Parameters per method or constructor (default: 10)
    pub max_parameters: usize,
    /// Depth of then-branch `if` nesting that is flagged (default: 3)
    pub nested_if_depth: usize,
    /// Switch labels per switch (default: 10)
    pub max_switch_labels: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cyclomatic_complexity: 10,
            max_methods: 10,
            max_imports: 30,
            max_fields: 15,
            max_parameters: 10,
            nested_if_depth: 3,
            max_switch_labels: 10,
        }
    }
}

/// Endpoint settings for the classifier service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub endpoint: String,
    /// Request timeout in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Token limit passed to the service (default: 512)
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Inputs per request; larger batches are split (default: 32)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_length() -> usize {
    512
}

fn default_batch_size() -> usize {
    32
}

impl ClassifierConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_ms: default_timeout_ms(),
            max_length: default_max_length(),
            batch_size: default_batch_size(),
        }
    }
}

/// Options of the corpus collector.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceOptions {
    /// Glob patterns of paths to leave out (e.g. `**/generated/**`)
    pub excluded_paths: Vec<String>,
    /// Skip files under directories whose name ends in `test` (default: true)
    pub skip_test_dirs: bool,
    /// Skip JavaFX/Swing/AWT user-interface code (default: true)
    pub skip_gui_code: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            excluded_paths: Vec::new(),
            skip_test_dirs: true,
            skip_gui_code: true,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Find a config for a scan of `root`: `smellcheck.yaml` or
    /// `.smellcheck.yaml` in `root`, then the user config directory.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        let local = CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file());
        if local.is_some() {
            return local;
        }
        ProjectDirs::from("", "", "smellcheck")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .filter(|p| p.is_file())
    }

    /// Load the config for `root`, or defaults when none exists.
    pub fn load_for(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(|| Self::discover(root)) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Config::default()),
        }
    }

    /// Reject values that cannot be meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(classifier) = &self.classifier {
            if classifier.endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid("classifier.endpoint is empty".into()));
            }
            if classifier.batch_size == 0 {
                return Err(ConfigError::Invalid("classifier.batch_size must be > 0".into()));
            }
        }
        if self.thresholds.nested_if_depth == 0 {
            return Err(ConfigError::Invalid(
                "thresholds.nested_if_depth must be > 0".into(),
            ));
        }
        for (code, weight) in &self.weights {
            if Rule::from_code(code).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "weights: unknown rule code {:?}",
                    code
                )));
            }
            if *weight < 1 {
                return Err(ConfigError::Invalid(format!(
                    "weights.{} must be >= 1",
                    code
                )));
            }
        }
        for pattern in &self.source.excluded_paths {
            globset::Glob::new(pattern).map_err(|e| {
                ConfigError::Invalid(format!("invalid excluded path {:?}: {}", pattern, e))
            })?;
        }
        Ok(())
    }

    /// Configured weight for `code`, or `default` when not overridden.
    pub fn weight_for(&self, code: &str, default: u32) -> u32 {
        self.weights
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, w)| *w)
            .unwrap_or(default)
    }

    pub fn is_disabled(&self, code: &str) -> bool {
        self.disabled_rules.iter().any(|c| c.eq_ignore_ascii_case(code))
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.enabled_rules.iter().any(|c| c.eq_ignore_ascii_case(code))
    }
}
