//! Member and import count rules.

use once_cell::sync::Lazy;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleError, RuleResult};
use crate::syntax::{self, java, NodeRef};

const IMPORT_QUERY: &str = r#"
; import a.b.C; / import static a.b.C.m; / import a.b.*;
(import_declaration) @import
"#;

static IMPORTS: Lazy<Result<Query, String>> =
    Lazy::new(|| Query::new(syntax::language(), IMPORT_QUERY).map_err(|e| e.to_string()));

/// Lines of the import declarations under `root`.
fn import_lines(root: NodeRef<'_>, source: &str) -> Result<Vec<usize>, RuleError> {
    let query = IMPORTS
        .as_ref()
        .map_err(|e| RuleError::Query(e.clone()))?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root.raw(), source.as_bytes());

    let mut lines = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            lines.push(capture.node.start_position().row + 1);
        }
    }
    Ok(lines)
}

/// EXP: methods and constructors with too many parameters.
pub fn excessive_parameter_list(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if !java::is_callable(node) {
        return Ok(Vec::new());
    }
    if java::parameters(node).len() <= ctx.thresholds().max_parameters {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

/// EXI: files with too many imports, spanning first to last import.
pub fn excessive_imports(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::PROGRAM {
        return Ok(Vec::new());
    }
    let lines = import_lines(node, ctx.unit.text())?;
    if lines.len() <= ctx.thresholds().max_imports {
        return Ok(Vec::new());
    }
    let start = lines.iter().copied().min().unwrap_or(1);
    let end = lines.iter().copied().max().unwrap_or(start);
    Ok(vec![LineSpan::new(start, end)])
}

/// TMF: classes with too many mutable instance fields.
pub fn too_many_fields(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::CLASS {
        return Ok(Vec::new());
    }
    let mutable = java::fields(node)
        .into_iter()
        .filter(|f| !java::has_modifier(*f, "static") && !java::has_modifier(*f, "final"))
        .count();
    if mutable <= ctx.thresholds().max_fields {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

/// TMM: classes with too many methods, accessors not counted.
pub fn too_many_methods(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::CLASS {
        return Ok(Vec::new());
    }
    let behavior = java::methods(node)
        .into_iter()
        .filter(|m| !java::is_accessor(*m))
        .count();
    if behavior <= ctx.thresholds().max_methods {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::spans;

    fn class_with(members: &[String]) -> String {
        format!("class A {{\n{}\n}}\n", members.join("\n"))
    }

    #[test]
    fn test_excessive_parameters() {
        let params: Vec<String> = (0..11).map(|i| format!("int p{}", i)).collect();
        let src = format!(
            "class A {{\n  void f({}) {{\n    g();\n  }}\n  A({}) {{}}\n}}\n",
            params.join(", "),
            params[..10].join(", ")
        );
        assert_eq!(
            spans(&src, excessive_parameter_list),
            vec![LineSpan::new(2, 4)]
        );
    }

    #[test]
    fn test_abstract_method_span_stays_on_declaration() {
        let params: Vec<String> = (0..11).map(|i| format!("int p{}", i)).collect();
        let src = format!(
            "abstract class A {{\n  abstract void f({});\n  void g() {{\n  }}\n}}\n",
            params.join(", ")
        );
        assert_eq!(
            spans(&src, excessive_parameter_list),
            vec![LineSpan::line(2)]
        );
    }

    #[test]
    fn test_excessive_imports() {
        let imports: Vec<String> = (0..31).map(|i| format!("import p.C{};", i)).collect();
        let src = format!("package p;\n{}\nclass A {{}}\n", imports.join("\n"));
        assert_eq!(spans(&src, excessive_imports), vec![LineSpan::new(2, 32)]);

        let src = format!("{}\nclass A {{}}\n", imports[..30].join("\n"));
        assert!(spans(&src, excessive_imports).is_empty());
    }

    #[test]
    fn test_too_many_fields_ignores_static_and_final() {
        let mut members: Vec<String> = (0..15).map(|i| format!("  int f{};", i)).collect();
        members.push("  static int s;".into());
        members.push("  final int c = 1;".into());
        let src = class_with(&members);
        assert!(spans(&src, too_many_fields).is_empty());

        members.push("  private String extra;".into());
        let src = class_with(&members);
        assert_eq!(spans(&src, too_many_fields), vec![LineSpan::new(1, 20)]);
    }

    #[test]
    fn test_too_many_methods_skips_accessors() {
        let mut members: Vec<String> = (0..10).map(|i| format!("  void m{}() {{}}", i)).collect();
        members.push("  int getX() { return x; }".into());
        members.push("  void setX(int v) { x = v; }".into());
        let src = class_with(&members);
        assert!(spans(&src, too_many_methods).is_empty());

        // same method renamed so it no longer looks like a getter
        let renamed = src.replace("int getX()", "int fetchX()");
        assert_eq!(spans(&renamed, too_many_methods), vec![LineSpan::new(1, 14)]);
    }
}
