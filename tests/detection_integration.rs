//! Integration tests for the full detection pipeline.
//!
//! These tests collect the fixture project under `testdata/project` and run
//! every default rule over it.

use std::path::PathBuf;
use std::sync::Arc;

use smellcheck::classifier::{Classifier, ClassifierError, Label, ModelKind};
use smellcheck::config::{Config, SourceOptions};
use smellcheck::detect::{CorpusReport, Runner};
use smellcheck::source;

fn project_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/project")
}

/// Labels every input that mentions `discount` as smelly.
struct DiscountMarker;

impl Classifier for DiscountMarker {
    fn classify_batch(
        &self,
        _model: ModelKind,
        inputs: &[String],
    ) -> Result<Vec<Label>, ClassifierError> {
        Ok(inputs
            .iter()
            .map(|i| {
                if i.contains("discount") {
                    Label::Smelly
                } else {
                    Label::Clean
                }
            })
            .collect())
    }
}

fn scan(runner: &Runner) -> CorpusReport {
    let entries =
        source::collect(&project_path(), &SourceOptions::default()).expect("should collect");
    runner.traverse(&entries)
}

fn summary(corpus: &CorpusReport, path: &str) -> Vec<(String, usize, usize)> {
    corpus.files[path]
        .findings
        .iter()
        .map(|f| (f.code.clone(), f.start_line, f.end_line))
        .collect()
}

fn row(code: &str, start: usize, end: usize) -> (String, usize, usize) {
    (code.to_string(), start, end)
}

#[test]
fn test_collect_skips_tests_and_gui() {
    let entries = source::collect(&project_path(), &SourceOptions::default()).unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "src/main/java/shop/Broken.java",
            "src/main/java/shop/Customer.java",
            "src/main/java/shop/Order.java",
            "src/main/java/shop/Strings.java",
        ]
    );
}

#[test]
fn test_unparsable_file_is_skipped() {
    let runner = Runner::new(Config::default()).unwrap();
    let corpus = scan(&runner);
    assert_eq!(corpus.file_count(), 3);
    assert_eq!(corpus.skipped.len(), 1);
    assert_eq!(corpus.skipped[0].path, "src/main/java/shop/Broken.java");
}

#[test]
fn test_syntactic_and_semantic_findings() {
    let runner = Runner::new(Config::default()).unwrap();
    let corpus = scan(&runner);

    assert_eq!(
        summary(&corpus, "src/main/java/shop/Order.java"),
        vec![
            row("NED", 16, 22),
            row("RP", 15, 15),
            row("RWD", 28, 28),
            row("LFSC", 30, 30),
        ]
    );
    assert_eq!(
        summary(&corpus, "src/main/java/shop/Strings.java"),
        vec![
            row("UTD", 7, 22),
            row("ELS", 11, 11),
            row("RSC", 16, 16),
            row("NPD", 20, 20),
        ]
    );
    assert!(corpus.files["src/main/java/shop/Customer.java"]
        .findings
        .is_empty());
    assert_eq!(corpus.total_smells(), 8);
}

#[test]
fn test_finding_metadata() {
    let runner = Runner::new(Config::default()).unwrap();
    let corpus = scan(&runner);
    let npd = corpus.findings().find(|f| f.code == "NPD").unwrap();
    assert_eq!(npd.file_name, "Strings.java");
    assert_eq!(npd.file_path, "src/main/java/shop/Strings.java");
    assert_eq!(npd.smell_type, "Throwing NullPointerException");
    assert_eq!(npd.weight, 4);
}

#[test]
fn test_classifier_rules_report_at_method_span() {
    let runner = Runner::new(Config::default())
        .unwrap()
        .with_classifier(Arc::new(DiscountMarker));
    let corpus = scan(&runner);

    let order = summary(&corpus, "src/main/java/shop/Order.java");
    assert_eq!(order[0], row("CM", 14, 24));
    assert_eq!(order[1], row("FE", 14, 24));
    assert_eq!(order.len(), 6);
    // no method of Strings mentions discount
    assert_eq!(summary(&corpus, "src/main/java/shop/Strings.java").len(), 4);
}

#[test]
fn test_disabled_rules_are_not_run() {
    let config = Config {
        disabled_rules: vec!["NED".into(), "rp".into()],
        ..Default::default()
    };
    let runner = Runner::new(config).unwrap();
    let corpus = scan(&runner);
    let codes: Vec<_> = corpus.findings().map(|f| f.code.as_str()).collect();
    assert!(!codes.contains(&"NED"));
    assert!(!codes.contains(&"RP"));
    assert_eq!(corpus.total_smells(), 6);
}
