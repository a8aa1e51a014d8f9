//! Smell detection over Java syntax trees.
//!
//! Rules live in three families: `design` (structural thresholds),
//! `practices` (light semantic checks) and `semantic` (classifier-backed).
//! Every rule is a plain function offered each node of one pre-order walk;
//! [`Runner`] owns the walk and turns rule output into [`Finding`]s.

mod context;
pub mod design;
pub mod practices;
mod rules;
mod runner;
pub mod semantic;
mod types;

pub use context::{FileContext, ReadIndexCache};
pub use rules::{Registry, RegistryError, Rule};
pub use runner::Runner;
pub use types::{
    Category, ClassifierFailure, CorpusReport, FileReport, Finding, LineSpan, RuleError,
    RuleFailure, RuleResult, SkippedFile,
};
