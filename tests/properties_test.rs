//! Behavioral properties of the detection engine.

use std::sync::{Arc, Mutex};

use indoc::indoc;
use smellcheck::classifier::{Classifier, ClassifierError, Label, ModelKind};
use smellcheck::config::Config;
use smellcheck::detect::{Finding, Runner};

const ORDER: &str = include_str!("../testdata/project/src/main/java/shop/Order.java");

fn findings(src: &str) -> Vec<Finding> {
    let runner = Runner::new(Config::default()).unwrap();
    runner.analyze(src, "A.java").expect("should parse").findings
}

fn codes(src: &str, code: &str) -> Vec<(usize, usize)> {
    findings(src)
        .into_iter()
        .filter(|f| f.code == code)
        .map(|f| (f.start_line, f.end_line))
        .collect()
}

fn method_with_ifs(n: usize) -> String {
    let ifs: Vec<String> = (0..n)
        .map(|i| format!("    if (x > {}) {{ count++; }}", i))
        .collect();
    format!(
        "class A {{\n  int count;\n  void f(int x) {{\n{}\n  }}\n}}\n",
        ifs.join("\n")
    )
}

#[test]
fn test_cyclomatic_boundary() {
    assert!(codes(&method_with_ifs(9), "CYC").is_empty());
    assert_eq!(codes(&method_with_ifs(10), "CYC"), vec![(3, 14)]);
}

#[test]
fn test_analysis_is_idempotent() {
    assert_eq!(findings(ORDER), findings(ORDER));
}

#[test]
fn test_spans_stay_inside_file() {
    let sources = [
        ORDER.to_string(),
        method_with_ifs(12),
        // a brace opened and never closed in a comment
        "class A {\n  // {\n  void f(int a) { a = 1; }\n}".to_string(),
    ];
    for src in &sources {
        let line_count = src.lines().count();
        for f in findings(src) {
            assert!(f.start_line >= 1, "{:?}", f);
            assert!(f.start_line <= f.end_line, "{:?}", f);
            assert!(f.end_line <= line_count, "{:?}", f);
        }
    }
}

#[test]
fn test_nested_if_depth_two_vs_three() {
    let two = indoc! {"
        class A {
          void f(int a, int b) {
            if (a > 0) {
              if (b > 0) {
                run();
              }
            }
          }
        }
    "};
    assert!(codes(two, "NED").is_empty());

    let three = indoc! {"
        class A {
          void f(int a, int b, int c) {
            if (a > 0) {
              if (b > 0) {
                if (c > 0) {
                  run();
                }
              }
            }
          }
        }
    "};
    assert_eq!(codes(three, "NED"), vec![(3, 9)]);
}

fn class_with_accessors(getter: &str, setter: &str) -> String {
    let mut members: Vec<String> = (0..10).map(|i| format!("  void m{}() {{}}", i)).collect();
    members.push(format!("  int {}() {{ return a; }}", getter));
    members.push(format!("  void {}(int v) {{ a = v; }}", setter));
    format!("class A {{\n  int a;\n{}\n}}\n", members.join("\n"))
}

#[test]
fn test_accessors_do_not_count_as_methods() {
    assert!(codes(&class_with_accessors("getA", "setA"), "TMM").is_empty());
    assert_eq!(
        codes(&class_with_accessors("fetchA", "putA"), "TMM"),
        vec![(1, 15)]
    );
}

#[test]
fn test_guarded_log_statement() {
    let guarded = indoc! {r#"
        class A {
          void f(Object v) {
            if (log.isDebugEnabled()) {
              log.debug("value " + v);
            }
          }
        }
    "#};
    assert!(codes(guarded, "ELS").is_empty());

    let unguarded = indoc! {r#"
        class A {
          void f(Object v) {
            log.debug("value " + v);
            log.info(describe(v));
            log.info("plain");
          }
        }
    "#};
    assert_eq!(codes(unguarded, "ELS"), vec![(3, 3), (4, 4)]);
}

/// Labels inputs mentioning `discount`, recording each batch it receives.
#[derive(Default)]
struct Recording {
    batches: Mutex<Vec<(ModelKind, usize)>>,
}

impl Classifier for Recording {
    fn classify_batch(
        &self,
        model: ModelKind,
        inputs: &[String],
    ) -> Result<Vec<Label>, ClassifierError> {
        self.batches.lock().unwrap().push((model, inputs.len()));
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

#[test]
fn test_one_batch_per_model_per_file() {
    let classifier = Arc::new(Recording::default());
    let runner = Runner::new(Config::default())
        .unwrap()
        .with_classifier(classifier.clone());
    runner.analyze(ORDER, "Order.java").unwrap();

    let batches = classifier.batches.lock().unwrap().clone();
    assert_eq!(
        batches,
        vec![(ModelKind::ComplexMethod, 2), (ModelKind::FeatureEnvy, 2)]
    );
}

#[test]
fn test_results_independent_of_batch_composition() {
    let runner = Runner::new(Config::default())
        .unwrap()
        .with_classifier(Arc::new(Recording::default()));
    let ml = |src: &str| -> Vec<(String, usize, usize)> {
        runner
            .analyze(src, "Order.java")
            .unwrap()
            .findings
            .into_iter()
            .filter(|f| f.code == "CM" || f.code == "FE")
            .map(|f| (f.code, f.start_line, f.end_line))
            .collect()
    };

    // `total` alone in its batch is labeled as it is next to `check`
    let head = &ORDER[..ORDER.find("    public void check").unwrap()];
    let alone = format!("{}}}\n", head);
    assert_eq!(ml(ORDER), ml(&alone));
    assert_eq!(
        ml(ORDER),
        vec![("CM".to_string(), 14, 24), ("FE".to_string(), 14, 24)]
    );
}
