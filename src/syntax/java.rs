//! Java-specific queries over arena nodes.
//!
//! Node kinds and field names follow the tree-sitter-java grammar.

use super::NodeRef;

pub const PROGRAM: &str = "program";
pub const CLASS: &str = "class_declaration";
pub const INTERFACE: &str = "interface_declaration";
pub const METHOD: &str = "method_declaration";
pub const CONSTRUCTOR: &str = "constructor_declaration";
pub const FIELD: &str = "field_declaration";
pub const INVOCATION: &str = "method_invocation";
pub const IF: &str = "if_statement";

/// Declarations that may carry a type body.
const TYPE_DECLARATIONS: &[&str] = &[
    CLASS,
    INTERFACE,
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

pub fn is_type_declaration(node: NodeRef<'_>) -> bool {
    TYPE_DECLARATIONS.contains(&node.kind())
}

pub fn is_callable(node: NodeRef<'_>) -> bool {
    matches!(node.kind(), METHOD | CONSTRUCTOR)
}

/// The `name` field text of a declaration.
pub fn name<'a>(decl: NodeRef<'a>) -> Option<&'a str> {
    decl.field("name").map(|n| n.text())
}

/// Line of a declaration's name. Annotations above the header are not
/// part of it, so `@SuppressWarnings({"a"})` cannot end a brace scan early.
pub fn header_line(decl: NodeRef<'_>) -> usize {
    decl.field("name")
        .map(|n| n.line())
        .unwrap_or_else(|| decl.line())
}

/// Modifier keywords (`public`, `static`, ...) of a declaration.
///
/// Annotations are skipped; see [`annotations`].
pub fn modifiers(decl: NodeRef<'_>) -> Vec<&'static str> {
    let Some(mods) = decl.children_of_kind("modifiers").next() else {
        return Vec::new();
    };
    let raw = mods.raw();
    let mut cursor = raw.walk();
    let keywords = raw
        .children(&mut cursor)
        .filter(|c| !c.is_named())
        .map(|c| c.kind())
        .collect();
    keywords
}

pub fn has_modifier(decl: NodeRef<'_>, keyword: &str) -> bool {
    modifiers(decl).contains(&keyword)
}

/// Simple names of the annotations on a declaration.
pub fn annotations<'a>(decl: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    decl.children_of_kind("modifiers")
        .flat_map(|m| m.named_children())
        .filter(|a| matches!(a.kind(), "marker_annotation" | "annotation"))
        .collect()
}

pub fn annotation_name<'a>(annotation: NodeRef<'a>) -> &'a str {
    annotation
        .field("name")
        .map(|n| simple_type_name(n.text()))
        .unwrap_or("")
}

/// Member declarations of a class/interface/enum body, in source order.
pub fn body_members<'a>(decl: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let Some(body) = decl.field("body") else {
        return Vec::new();
    };
    let mut members = Vec::new();
    for child in body.named_children() {
        // enum constants are followed by an `enum_body_declarations` wrapper
        if child.kind() == "enum_body_declarations" {
            members.extend(child.named_children());
        } else {
            members.push(child);
        }
    }
    members
}

pub fn methods<'a>(decl: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    body_members(decl)
        .into_iter()
        .filter(|m| m.kind() == METHOD)
        .collect()
}

pub fn constructors<'a>(decl: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    body_members(decl)
        .into_iter()
        .filter(|m| matches!(m.kind(), CONSTRUCTOR | "compact_constructor_declaration"))
        .collect()
}

pub fn fields<'a>(decl: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    body_members(decl)
        .into_iter()
        .filter(|m| m.kind() == FIELD)
        .collect()
}

/// Formal parameter nodes of a method or constructor.
pub fn parameters<'a>(callable: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    callable
        .field("parameters")
        .map(|params| {
            params
                .named_children()
                .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
                .collect()
        })
        .unwrap_or_default()
}

/// Names bound by a method or constructor's parameters.
pub fn parameter_names<'a>(callable: NodeRef<'a>) -> Vec<&'a str> {
    parameters(callable)
        .into_iter()
        .filter_map(parameter_name)
        .collect()
}

fn parameter_name<'a>(param: NodeRef<'a>) -> Option<&'a str> {
    if let Some(name) = param.field("name") {
        return Some(name.text());
    }
    // varargs: `String... args` wraps the name in a variable_declarator
    param
        .children_of_kind("variable_declarator")
        .next()
        .and_then(name)
}

/// Whether the method's return type is `void`.
pub fn returns_void(method: NodeRef<'_>) -> bool {
    method
        .field("type")
        .map(|t| t.kind() == "void_type")
        .unwrap_or(false)
}

/// Getter shape: `get*`/`is*`, no parameters, non-void return.
pub fn is_getter(method: NodeRef<'_>) -> bool {
    let Some(name) = name(method) else {
        return false;
    };
    (name.starts_with("get") || name.starts_with("is"))
        && parameters(method).is_empty()
        && method.field("type").is_some()
        && !returns_void(method)
}

/// Setter shape: `set*`, one parameter, void return.
pub fn is_setter(method: NodeRef<'_>) -> bool {
    let Some(name) = name(method) else {
        return false;
    };
    name.starts_with("set") && parameters(method).len() == 1 && returns_void(method)
}

pub fn is_accessor(method: NodeRef<'_>) -> bool {
    is_getter(method) || is_setter(method)
}

/// Names listed in a callable's `throws` clause.
pub fn thrown_types<'a>(callable: NodeRef<'a>) -> Vec<&'a str> {
    callable
        .children_of_kind("throws")
        .flat_map(|t| t.named_children())
        .map(|t| simple_type_name(t.text()))
        .collect()
}

/// `pkg.Outer.Name<T>` -> `Name`.
pub fn simple_type_name(text: &str) -> &str {
    let base = text.split('<').next().unwrap_or(text).trim();
    base.rsplit('.').next().unwrap_or(base).trim()
}

/// Type instantiated by `throw new X(...)`, if the thrown expression is a
/// constructor call.
pub fn thrown_creation_type<'a>(throw: NodeRef<'a>) -> Option<&'a str> {
    let expr = throw.named_children().next()?;
    if expr.kind() != "object_creation_expression" {
        return None;
    }
    expr.field("type").map(|t| simple_type_name(t.text()))
}

/// Parts of a `method_invocation`.
pub struct Invocation<'a> {
    pub receiver: Option<NodeRef<'a>>,
    pub name: &'a str,
    pub arguments: Vec<NodeRef<'a>>,
}

pub fn invocation<'a>(node: NodeRef<'a>) -> Option<Invocation<'a>> {
    if node.kind() != INVOCATION {
        return None;
    }
    let name = node.field("name")?.text();
    let arguments = node
        .field("arguments")
        .map(|args| args.named_children().filter(|a| !is_comment(*a)).collect())
        .unwrap_or_default();
    Some(Invocation {
        receiver: node.field("object"),
        name,
        arguments,
    })
}

/// Call expression of a statement of the form `call(...);`.
pub fn statement_call<'a>(node: NodeRef<'a>) -> Option<Invocation<'a>> {
    if node.kind() != "expression_statement" {
        return None;
    }
    let expr = node.named_children().next()?;
    invocation(expr)
}

pub fn is_string_literal(node: NodeRef<'_>) -> bool {
    node.kind() == "string_literal"
}

pub fn is_comment(node: NodeRef<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

/// Identifier written by an assignment or `++`/`--`, if the target is a
/// bare name.
pub fn written_identifier<'a>(node: NodeRef<'a>) -> Option<&'a str> {
    let target = match node.kind() {
        "assignment_expression" => node.field("left")?,
        "update_expression" => node.named_children().next()?,
        _ => return None,
    };
    (target.kind() == "identifier").then(|| target.text())
}

/// Names bound by the declarators of a local variable or field declaration.
pub fn declarator_names<'a>(decl: NodeRef<'a>) -> Vec<(&'a str, NodeRef<'a>)> {
    decl.fields("declarator")
        .into_iter()
        .filter_map(|d| name(d).map(|n| (n, d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceUnit;

    fn find<'a>(tree: &'a crate::syntax::SyntaxTree<'a>, kind: &str) -> NodeRef<'a> {
        tree.walk().find(|n| n.kind() == kind).unwrap()
    }

    #[test]
    fn test_modifiers_skip_annotations() {
        let unit = SourceUnit::parse(
            "class A {\n  @Deprecated\n  public static final int X = 1;\n}\n",
            "A.java",
        )
        .unwrap();
        let tree = unit.syntax_tree();
        let field = find(&tree, FIELD);
        assert_eq!(modifiers(field), vec!["public", "static", "final"]);
        assert_eq!(annotations(field).len(), 1);
        assert_eq!(annotation_name(annotations(field)[0]), "Deprecated");
    }

    #[test]
    fn test_accessor_shapes() {
        let unit = SourceUnit::parse(
            "class A {\n  int getX() { return 1; }\n  void setX(int v) {}\n  void getNothing() {}\n  boolean isOn() { return true; }\n}\n",
            "A.java",
        )
        .unwrap();
        let tree = unit.syntax_tree();
        let class = find(&tree, CLASS);
        let shapes: Vec<_> = methods(class)
            .into_iter()
            .map(|m| (name(m).unwrap(), is_getter(m), is_setter(m)))
            .collect();
        assert_eq!(
            shapes,
            vec![
                ("getX", true, false),
                ("setX", false, true),
                ("getNothing", false, false),
                ("isOn", true, false),
            ]
        );
    }

    #[test]
    fn test_parameter_names_include_varargs() {
        let unit = SourceUnit::parse(
            "class A {\n  void f(int a, final String b, Object... rest) {}\n}\n",
            "A.java",
        )
        .unwrap();
        let tree = unit.syntax_tree();
        assert_eq!(parameter_names(find(&tree, METHOD)), vec!["a", "b", "rest"]);
    }

    #[test]
    fn test_thrown_types_and_creation() {
        let unit = SourceUnit::parse(
            "class A {\n  void f() throws java.io.IOException, Error {\n    throw new IllegalStateException(\"x\");\n  }\n}\n",
            "A.java",
        )
        .unwrap();
        let tree = unit.syntax_tree();
        assert_eq!(thrown_types(find(&tree, METHOD)), vec!["IOException", "Error"]);
        assert_eq!(
            thrown_creation_type(find(&tree, "throw_statement")),
            Some("IllegalStateException")
        );
    }

    #[test]
    fn test_written_identifier() {
        let unit = SourceUnit::parse(
            "class A {\n  void f(int a) {\n    a = 2;\n    a++;\n    this.b = 3;\n  }\n}\n",
            "A.java",
        )
        .unwrap();
        let tree = unit.syntax_tree();
        let writes: Vec<_> = tree.walk().filter_map(written_identifier).collect();
        assert_eq!(writes, vec!["a", "a"]);
    }
}
