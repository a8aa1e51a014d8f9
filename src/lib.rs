//! Smellcheck - code smell detection for Java.
//!
//! Each file is parsed with tree-sitter and walked once in pre-order; every
//! enabled rule is offered every node. Structural and best-practice smells
//! are decided from the tree. Complex Method and Feature Envy are decided
//! by an external classifier service, one batch per file.
//!
//! # Architecture
//!
//! - `syntax`: parsing and the arena tree with a parent index
//! - `span`: line spans recovered from brace balance
//! - `detect`: rules, registry and the runner
//! - `classifier`: the classifier seam and its HTTP implementation
//! - `source`: which files of a project get analyzed
//! - `config`: YAML configuration
//! - `report`, `score`: output formatting and the quality score

pub mod classifier;
pub mod cli;
pub mod config;
pub mod detect;
pub mod report;
pub mod score;
pub mod source;
pub mod span;
pub mod syntax;

pub use classifier::{Classifier, ClassifierError, HttpClassifier, Label, ModelKind};
pub use config::Config;
pub use detect::{CorpusReport, FileReport, Finding, Rule, Runner};
pub use score::QualityScore;
pub use source::SourceEntry;
pub use syntax::{ParseError, SourceUnit};
