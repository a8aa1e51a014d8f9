//! Classifier input extraction.
//!
//! Complex Method sees each method's raw text. Feature Envy sees a
//! synthetic compilation unit: the method inside a shell of its own class,
//! followed by one class per external receiver holding the methods it
//! calls there.

use std::collections::{BTreeMap, BTreeSet};

use crate::span;
use crate::syntax::{java, NodeRef};

/// Receivers whose calls never count as envy.
const SKIPPED_RECEIVERS: &[&str] = &[
    "this",
    "super",
    "System",
    "String",
    "Integer",
    "Collections",
    "Arrays",
    "Math",
];

/// One classifier input and the method it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlSample {
    pub method_name: String,
    pub class_name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub code_text: String,
    /// Receiver root identifier to the method names called on it.
    pub external_calls: BTreeMap<String, BTreeSet<String>>,
}

/// Complex Method inputs: every method with a body except `main`, in walk
/// order.
pub fn complex_method_samples(root: NodeRef<'_>, lines: &[String]) -> Vec<MlSample> {
    root.descendants()
        .filter(|n| n.kind() == java::METHOD && n.field("body").is_some())
        .filter_map(|method| {
            let name = java::name(method)?;
            if name == "main" {
                return None;
            }
            let start = java::header_line(method);
            let extract = span::extract(lines, start);
            Some(MlSample {
                method_name: name.to_string(),
                class_name: enclosing_type_name(method).unwrap_or_default(),
                start_line: start,
                end_line: span::clamp(start, extract.end_line, lines.len()),
                code_text: extract.text,
                external_calls: BTreeMap::new(),
            })
        })
        .collect()
}

fn enclosing_type_name(node: NodeRef<'_>) -> Option<String> {
    node.ancestors()
        .find(|a| java::is_type_declaration(*a))
        .and_then(java::name)
        .map(str::to_string)
}

/// A method of a top-level type, with the calls it makes elsewhere.
struct MethodData {
    name: String,
    source: String,
    start_line: usize,
    end_line: usize,
    external_calls: BTreeMap<String, BTreeSet<String>>,
}

struct TypeData {
    name: String,
    methods: Vec<MethodData>,
}

impl TypeData {
    /// Last declaration wins for overloaded names.
    fn method(&self, name: &str) -> Option<&MethodData> {
        self.methods.iter().rev().find(|m| m.name == name)
    }
}

/// Feature Envy inputs for every non-trivial method of the file's
/// top-level types that calls into another receiver.
pub fn feature_envy_samples(root: NodeRef<'_>, lines: &[String]) -> Vec<MlSample> {
    let types: Vec<TypeData> = root
        .named_children()
        .filter(|n| java::is_type_declaration(*n))
        .filter_map(|decl| {
            let name = java::name(decl)?;
            if name == "Main" {
                return None;
            }
            let methods: Vec<MethodData> = java::methods(decl)
                .into_iter()
                .filter_map(|m| method_data(m, lines))
                .collect();
            (!methods.is_empty()).then(|| TypeData {
                name: name.to_string(),
                methods,
            })
        })
        .collect();

    let mut samples = Vec::new();
    for ty in &types {
        for method in &ty.methods {
            if method.external_calls.is_empty() || is_trivial_accessor(method) {
                continue;
            }
            samples.push(MlSample {
                method_name: method.name.clone(),
                class_name: ty.name.clone(),
                start_line: method.start_line,
                end_line: method.end_line,
                code_text: render_sample(ty, method, &types),
                external_calls: method.external_calls.clone(),
            });
        }
    }
    samples
}

fn method_data(method: NodeRef<'_>, lines: &[String]) -> Option<MethodData> {
    let name = java::name(method)?.to_string();
    let start = java::header_line(method);
    let (source, end) = if method.field("body").is_some() {
        let extract = span::extract(lines, start);
        (extract.text, extract.end_line)
    } else {
        let end = method.end_line().min(lines.len()).max(start);
        (lines.get(start - 1..end)?.join("\n"), end)
    };
    if source.trim().is_empty() {
        return None;
    }

    let mut external_calls: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for call in method.descendants().filter_map(java::invocation) {
        let Some(qualifier) = call.receiver.and_then(receiver_root) else {
            continue;
        };
        if SKIPPED_RECEIVERS.contains(&qualifier) {
            continue;
        }
        external_calls
            .entry(qualifier.to_string())
            .or_default()
            .insert(call.name.to_string());
    }

    Some(MethodData {
        name,
        source,
        start_line: start,
        end_line: span::clamp(start, end, lines.len()),
        external_calls,
    })
}

/// Leftmost identifier of a receiver chain like `order.customer`.
fn receiver_root<'a>(receiver: NodeRef<'a>) -> Option<&'a str> {
    match receiver.kind() {
        "identifier" => Some(receiver.text()),
        "field_access" => receiver.field("object").and_then(receiver_root),
        _ => None,
    }
}

/// Short get/is/set methods that only move a value in or out.
fn is_trivial_accessor(method: &MethodData) -> bool {
    let source = method.source.to_lowercase();
    let line_count = method
        .source
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count();
    if line_count > 5 {
        return false;
    }
    let returns = source.matches("return").count();
    if method.name.starts_with("get") || method.name.starts_with("is") {
        return returns == 1;
    }
    if method.name.starts_with("set") {
        return (source.contains('=') || source.contains("this.")) && returns == 0;
    }
    false
}

fn push_indented(out: &mut Vec<String>, source: &str) {
    for line in strip_comments(source).lines() {
        if !line.trim().is_empty() {
            out.push(format!("    {}", line));
        }
    }
}

fn render_sample(owner: &TypeData, method: &MethodData, types: &[TypeData]) -> String {
    let mut out = vec![format!("class {} {{", owner.name)];
    push_indented(&mut out, &method.source);
    out.push("}".to_string());

    for (qualifier, called) in &method.external_calls {
        out.push(String::new());
        let referenced = types
            .iter()
            .find(|t| t.name == *qualifier || t.name.eq_ignore_ascii_case(qualifier));
        match referenced {
            Some(ty) => {
                out.push(format!("class {} {{", ty.name));
                for name in called {
                    match ty.method(name) {
                        Some(m) => push_indented(&mut out, &m.source),
                        None => out.push(format!("    public void {}() {{}}", name)),
                    }
                }
            }
            None => {
                out.push(format!("class {} {{", qualifier));
                for name in called {
                    out.push(format!("    public void {}() {{}}", name));
                }
            }
        }
        out.push("}".to_string());
    }
    out.join("\n")
}

/// Remove `//` and `/* */` comments, dropping lines left blank.
pub fn strip_comments(source: &str) -> String {
    let mut cleaned = Vec::new();
    let mut in_block = false;
    for line in source.lines() {
        let mut kept = String::new();
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            let next = chars.peek().copied();
            if in_block {
                if c == '*' && next == Some('/') {
                    in_block = false;
                    chars.next();
                }
                continue;
            }
            match (c, next) {
                ('/', Some('*')) => {
                    in_block = true;
                    chars.next();
                }
                ('/', Some('/')) => break,
                _ => kept.push(c),
            }
        }
        if !kept.trim().is_empty() {
            cleaned.push(kept.trim_end().to_string());
        }
    }
    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::parse;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_comments() {
        let src = "int a = 1; // one\n/* block\n still */ int b = 2;\n// gone\nint c;";
        assert_eq!(strip_comments(src), "int a = 1;\n int b = 2;\nint c;");
    }

    #[test]
    fn test_complex_method_samples_skip_main_and_abstract() {
        let unit = parse(indoc! {"
            abstract class A {
              public static void main(String[] args) {
                run();
              }
              abstract void hook();
              int work(int x) {
                return x * 2;
              }
            }
        "});
        let tree = unit.syntax_tree();
        let samples = complex_method_samples(tree.root(), unit.lines());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].method_name, "work");
        assert_eq!(samples[0].class_name, "A");
        assert_eq!((samples[0].start_line, samples[0].end_line), (6, 8));
        assert_eq!(
            samples[0].code_text,
            "  int work(int x) {\n    return x * 2;\n  }"
        );
    }

    #[test]
    fn test_feature_envy_sample_shape() {
        let unit = parse(indoc! {"
            class Order {
              double total(Customer customer) {
                // discount first
                double d = customer.discount();
                return customer.base() * d + Math.max(0, 1);
              }
              int getId() {
                return id;
              }
            }
            class Customer {
              double discount() { return 0.1; }
            }
        "});
        let tree = unit.syntax_tree();
        let samples = feature_envy_samples(tree.root(), unit.lines());
        assert_eq!(samples.len(), 1);
        let sample = &samples[0];
        assert_eq!(sample.method_name, "total");
        assert_eq!(sample.class_name, "Order");
        assert_eq!((sample.start_line, sample.end_line), (2, 6));
        assert_eq!(
            sample.code_text,
            indoc! {"
                class Order {
                      double total(Customer customer) {
                        double d = customer.discount();
                        return customer.base() * d + Math.max(0, 1);
                      }
                }

                class Customer {
                    public void base() {}
                      double discount() { return 0.1; }
                }"}
        );
    }

    #[test]
    fn test_feature_envy_skips_main_class_and_self_calls() {
        let unit = parse(indoc! {"
            class Main {
              void run(Service s) { s.go(); }
            }
            class Local {
              void run() {
                this.helper();
                helper();
                System.out.println(String.valueOf(1));
              }
              void helper() {}
            }
        "});
        let tree = unit.syntax_tree();
        assert!(feature_envy_samples(tree.root(), unit.lines()).is_empty());
    }
}
