//! Detection runner: one pre-order walk per file, every rule per node.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::source::SourceEntry;
use crate::span;
use crate::syntax::{NodeRef, ParseError, SourceUnit};

use super::context::{FileContext, ReadIndexCache};
use super::rules::{Registry, RegistryError, Rule};
use super::types::{
    ClassifierFailure, CorpusReport, FileReport, Finding, LineSpan, RuleError, RuleFailure,
    RuleResult,
};

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Executes the enabled rules against parsed Java files.
pub struct Runner {
    config: Config,
    registry: Registry,
    classifier: Option<Arc<dyn Classifier>>,
    read_index: Arc<ReadIndexCache>,
}

impl Runner {
    /// Create a runner for the rules `config` enables.
    pub fn new(config: Config) -> Result<Self, RegistryError> {
        let registry = Registry::new(&config)?;
        Ok(Self {
            config,
            registry,
            classifier: None,
            read_index: Arc::new(ReadIndexCache::new()),
        })
    }

    /// Use `classifier` for the Complex Method and Feature Envy rules.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Share a read-index cache with other runners.
    pub fn with_read_index(mut self, cache: Arc<ReadIndexCache>) -> Self {
        self.read_index = cache;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and analyze one file.
    pub fn analyze(&self, text: &str, path: &str) -> Result<FileReport, ParseError> {
        let unit = SourceUnit::parse(text, path)?;
        Ok(self.analyze_unit(&unit))
    }

    /// Analyze an already parsed file. Findings come out in walk order,
    /// rules in registry order at each node.
    pub fn analyze_unit(&self, unit: &SourceUnit) -> FileReport {
        self.analyze_with(unit, |rule, node, ctx| rule.evaluate(node, ctx))
    }

    /// The walk behind `analyze_unit`. A rule that errors or panics on a
    /// node is recorded and the remaining rules still run.
    fn analyze_with<F>(&self, unit: &SourceUnit, evaluate: F) -> FileReport
    where
        F: Fn(Rule, NodeRef<'_>, &FileContext<'_>) -> RuleResult,
    {
        let tree = unit.syntax_tree();
        let ctx = FileContext::new(
            unit,
            &self.config,
            self.classifier.as_deref(),
            &self.read_index,
        );
        let mut report = FileReport::new(unit.path());

        for node in tree.walk() {
            for rule in self.registry.rules() {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| evaluate(*rule, node, &ctx)))
                        .unwrap_or_else(|payload| {
                            Err(RuleError::Panicked(panic_message(payload)))
                        });
                match outcome {
                    Ok(spans) => report
                        .findings
                        .extend(spans.into_iter().map(|s| self.finding(unit, *rule, s))),
                    Err(RuleError::Classifier(err)) => {
                        tracing::warn!(
                            file = unit.path(),
                            rule = rule.code(),
                            "classifier failed: {}",
                            err
                        );
                        report.classifier_errors.push(ClassifierFailure {
                            code: rule.code().to_string(),
                            message: err.to_string(),
                        });
                    }
                    Err(err) => {
                        tracing::warn!(
                            file = unit.path(),
                            rule = rule.code(),
                            line = node.line(),
                            "rule failed: {}",
                            err
                        );
                        report.rule_errors.push(RuleFailure {
                            code: rule.code().to_string(),
                            line: node.line(),
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        self.read_index.evict(unit.path());
        tracing::debug!(
            file = unit.path(),
            nodes = tree.len(),
            findings = report.findings.len(),
            "analyzed"
        );
        report
    }

    fn finding(&self, unit: &SourceUnit, rule: Rule, span: LineSpan) -> Finding {
        let start = span.start.max(1);
        Finding {
            file_name: unit.file_name().to_string(),
            file_path: unit.path().to_string(),
            start_line: start,
            end_line: span::clamp(start, span.end, unit.line_count()),
            smell_type: rule.label().to_string(),
            code: rule.code().to_string(),
            category: rule.category(),
            weight: self.config.weight_for(rule.code(), rule.default_weight()),
        }
    }

    /// Analyze a corpus in parallel. Unparsable files are recorded as
    /// skipped.
    pub fn traverse(&self, entries: &[SourceEntry]) -> CorpusReport {
        self.traverse_with_progress(entries, ProgressBar::hidden())
    }

    pub fn traverse_with_progress(
        &self,
        entries: &[SourceEntry],
        progress: ProgressBar,
    ) -> CorpusReport {
        let outcomes: Vec<_> = entries
            .par_iter()
            .progress_with(progress.clone())
            .map(|entry| (entry, self.analyze(&entry.content, &entry.path)))
            .collect();
        progress.finish_and_clear();

        let mut corpus = CorpusReport::new();
        for (entry, outcome) in outcomes {
            match outcome {
                Ok(report) => corpus.insert(report),
                Err(err) => {
                    tracing::debug!(file = %entry.path, "skipped: {}", err);
                    corpus.skip(&entry.path, err.to_string());
                }
            }
        }

        tracing::info!(
            files = corpus.file_count(),
            skipped = corpus.skipped.len(),
            smells = corpus.total_smells(),
            "scan complete"
        );
        corpus
    }
}
