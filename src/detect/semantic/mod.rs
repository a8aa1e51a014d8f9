//! Classifier-backed rules.
//!
//! Both rules act once per file, at the `program` root: they gather every
//! sample of the file, send one batch to the classifier and map positive
//! labels back to the sampled methods. Without a classifier they report
//! nothing.

mod samples;

pub use samples::{complex_method_samples, feature_envy_samples, strip_comments, MlSample};

use crate::classifier::{check_len, ModelKind};
use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

fn classify(ctx: &FileContext<'_>, model: ModelKind, samples: Vec<MlSample>) -> RuleResult {
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let Some(classifier) = ctx.classifier else {
        tracing::debug!(file = ctx.unit.path(), %model, "no classifier configured");
        return Ok(Vec::new());
    };

    let inputs: Vec<String> = samples.iter().map(|s| s.code_text.clone()).collect();
    let labels = classifier.classify_batch(model, &inputs)?;
    check_len(inputs.len(), &labels)?;

    Ok(samples
        .iter()
        .zip(labels)
        .filter(|(_, label)| label.is_smelly())
        .map(|(sample, _)| LineSpan::new(sample.start_line, sample.end_line))
        .collect())
}

/// CM: methods the complex-method model labels positive.
pub fn complex_method(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::PROGRAM {
        return Ok(Vec::new());
    }
    let samples = complex_method_samples(node, ctx.lines());
    classify(ctx, ModelKind::ComplexMethod, samples)
}

/// FE: methods the feature-envy model labels positive.
pub fn feature_envy(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::PROGRAM {
        return Ok(Vec::new());
    }
    let samples = feature_envy_samples(node, ctx.lines());
    classify(ctx, ModelKind::FeatureEnvy, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, ClassifierError, Label};
    use crate::config::Config;
    use crate::detect::context::ReadIndexCache;
    use crate::detect::testing::parse;
    use crate::detect::types::RuleError;
    use indoc::indoc;

    /// Labels every input containing `marker` as smelly.
    struct Marker(&'static str);

    impl Classifier for Marker {
        fn classify_batch(
            &self,
            _model: ModelKind,
            inputs: &[String],
        ) -> Result<Vec<Label>, ClassifierError> {
            Ok(inputs
                .iter()
                .map(|i| {
                    if i.contains(self.0) {
                        Label::Smelly
                    } else {
                        Label::Clean
                    }
                })
                .collect())
        }
    }

    struct Short;

    impl Classifier for Short {
        fn classify_batch(
            &self,
            _model: ModelKind,
            _inputs: &[String],
        ) -> Result<Vec<Label>, ClassifierError> {
            Ok(Vec::new())
        }
    }

    const SOURCE: &str = indoc! {"
        class A {
          void plain() {
            a();
          }
          void tangled() {
            b();
          }
        }
    "};

    #[test]
    fn test_complex_method_maps_labels_to_spans() {
        let unit = parse(SOURCE);
        let tree = unit.syntax_tree();
        let config = Config::default();
        let cache = ReadIndexCache::new();
        let classifier = Marker("tangled");
        let ctx = FileContext::new(&unit, &config, Some(&classifier as &dyn Classifier), &cache);

        let found = complex_method(tree.root(), &ctx).unwrap();
        assert_eq!(found, vec![LineSpan::new(5, 7)]);
        // only the root triggers inference
        let class = tree.walk().nth(1).unwrap();
        assert!(complex_method(class, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_without_classifier_nothing_reported() {
        let unit = parse(SOURCE);
        let tree = unit.syntax_tree();
        let config = Config::default();
        let cache = ReadIndexCache::new();
        let ctx = FileContext::new(&unit, &config, None, &cache);
        assert!(complex_method(tree.root(), &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch_is_classifier_error() {
        let unit = parse(SOURCE);
        let tree = unit.syntax_tree();
        let config = Config::default();
        let cache = ReadIndexCache::new();
        let ctx = FileContext::new(&unit, &config, Some(&Short as &dyn Classifier), &cache);
        let err = complex_method(tree.root(), &ctx).unwrap_err();
        assert!(matches!(
            err,
            RuleError::Classifier(ClassifierError::Malformed(_))
        ));
    }
}
