//! Classifier collaborator.
//!
//! Complex Method and Feature Envy are decided by two frozen binary
//! classifiers. The engine sees them only through [`Classifier`]: one call
//! per model per file, with every sample of that file in one batch.

mod http;

pub use http::HttpClassifier;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two classifier models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    ComplexMethod,
    FeatureEnvy,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::ComplexMethod => "complex_method",
            ModelKind::FeatureEnvy => "feature_envy",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binary decision for one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Clean,
    Smelly,
}

impl Label {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Label::Clean),
            1 => Some(Label::Smelly),
            _ => None,
        }
    }

    pub fn is_smelly(self) -> bool {
        self == Label::Smelly
    }
}

/// Errors from the classifier service. Any of these stops the ML-backed
/// rules for the current file only.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("classifier returned HTTP {0}")]
    Status(u16),
    #[error("malformed classifier response: {0}")]
    Malformed(String),
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Batched binary classification.
///
/// Implementations must return exactly one label per input, in input order.
pub trait Classifier: Send + Sync {
    fn classify_batch(
        &self,
        model: ModelKind,
        inputs: &[String],
    ) -> Result<Vec<Label>, ClassifierError>;
}

/// Check the length contract of a classifier response.
pub(crate) fn check_len(expected: usize, labels: &[Label]) -> Result<(), ClassifierError> {
    if labels.len() != expected {
        return Err(ClassifierError::Malformed(format!(
            "expected {} labels, got {}",
            expected,
            labels.len()
        )));
    }
    Ok(())
}
