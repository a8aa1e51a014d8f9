//! Core types for detection results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::classifier::ClassifierError;

/// Smell families, as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Design")]
    Design,
    #[serde(rename = "Best Practices")]
    BestPractices,
    #[serde(rename = "Semantic Based")]
    SemanticBased,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Design => "Design",
            Category::BestPractices => "Best Practices",
            Category::SemanticBased => "Semantic Based",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive 1-based line range produced by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }
}

/// A single reported smell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub file_name: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub smell_type: String,
    pub code: String,
    pub category: Category,
    pub weight: u32,
}

/// A rule that failed on one node. The rule contributes nothing for that
/// node; everything else proceeds.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("unexpected {kind} shape at line {line}: {detail}")]
    Shape {
        kind: &'static str,
        line: usize,
        detail: String,
    },
    #[error("query failed: {0}")]
    Query(String),
    #[error("rule panicked: {0}")]
    Panicked(String),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl RuleError {
    pub fn shape(kind: &'static str, line: usize, detail: impl Into<String>) -> Self {
        RuleError::Shape {
            kind,
            line,
            detail: detail.into(),
        }
    }
}

/// Spans flagged by one rule on one node.
pub type RuleResult = Result<Vec<LineSpan>, RuleError>;

/// Record of a rule failure kept in the file report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub code: String,
    pub line: usize,
    pub message: String,
}

/// Record of a classifier failure kept in the file report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierFailure {
    pub code: String,
    pub message: String,
}

/// Findings for one file, in walk order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    pub file_path: String,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_errors: Vec<RuleFailure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifier_errors: Vec<ClassifierFailure>,
}

impl FileReport {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.rule_errors.is_empty() || !self.classifier_errors.is_empty()
    }
}

/// A file left out of the corpus report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Results for a whole corpus, keyed by file path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusReport {
    pub files: BTreeMap<String, FileReport>,
    #[serde(default)]
    pub skipped: Vec<SkippedFile>,
}

impl CorpusReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report: FileReport) {
        self.files.insert(report.file_path.clone(), report);
    }

    pub fn skip(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// All findings, files in path order and findings in walk order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.values().flat_map(|f| f.findings.iter())
    }

    pub fn total_smells(&self) -> usize {
        self.files.values().map(|f| f.findings.len()).sum()
    }

    /// Number of files that were analyzed.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(code: &str) -> Finding {
        Finding {
            file_name: "A.java".into(),
            file_path: "src/A.java".into(),
            start_line: 3,
            end_line: 7,
            smell_type: "Too Many Methods".into(),
            code: code.into(),
            category: Category::Design,
            weight: 3,
        }
    }

    #[test]
    fn test_finding_serializes_camel_case() {
        let json = serde_json::to_value(finding("TMM")).unwrap();
        assert_eq!(json["fileName"], "A.java");
        assert_eq!(json["filePath"], "src/A.java");
        assert_eq!(json["startLine"], 3);
        assert_eq!(json["endLine"], 7);
        assert_eq!(json["smellType"], "Too Many Methods");
        assert_eq!(json["category"], "Design");
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            serde_json::to_string(&Category::BestPractices).unwrap(),
            "\"Best Practices\""
        );
        assert_eq!(Category::SemanticBased.to_string(), "Semantic Based");
    }

    #[test]
    fn test_line_span_never_inverted() {
        assert_eq!(LineSpan::new(5, 2), LineSpan::line(5));
    }

    #[test]
    fn test_corpus_totals() {
        let mut corpus = CorpusReport::new();
        let mut a = FileReport::new("b/A.java");
        a.findings = vec![finding("TMM"), finding("CYC")];
        corpus.insert(a);
        corpus.insert(FileReport::new("a/B.java"));
        corpus.skip("c/C.java", "syntax error near line 1");

        assert_eq!(corpus.total_smells(), 2);
        assert_eq!(corpus.file_count(), 2);
        assert_eq!(corpus.skipped.len(), 1);
        let first = corpus.files.keys().next().unwrap();
        assert_eq!(first, "a/B.java");
    }
}
