//! Java syntax layer.
//!
//! `SourceUnit` owns one file's text, its split lines and the tree-sitter
//! parse tree. `SyntaxTree` is the arena view rules operate on: nodes in
//! pre-order with a parent index, so ancestor queries are O(1) per step and
//! no node ever holds a back-pointer.

pub mod java;
mod tree;

pub use tree::{Ancestors, NodeId, NodeRef, SyntaxTree};

use once_cell::sync::Lazy;
use thiserror::Error;
use tree_sitter::{Language, Parser};

/// The tree-sitter Java grammar, loaded once.
static JAVA: Lazy<Language> = Lazy::new(|| tree_sitter_java::LANGUAGE.into());

/// Returns the Java grammar used for every parse.
pub fn language() -> &'static Language {
    &JAVA
}

/// A file that cannot be turned into a syntax tree.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to load Java grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("parser produced no tree")]
    NoTree,
    #[error("syntax error near line {line}")]
    Syntax { line: usize },
}

/// One parsed Java file. Immutable after construction.
pub struct SourceUnit {
    path: String,
    file_name: String,
    text: String,
    lines: Vec<String>,
    tree: tree_sitter::Tree,
}

impl std::fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("lines", &self.lines.len())
            .finish()
    }
}

impl SourceUnit {
    /// Parse `text` as a Java compilation unit.
    ///
    /// Files containing syntax errors are rejected as a whole: a partial
    /// tree would make member counts and spans unreliable.
    pub fn parse(text: impl Into<String>, path: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        let path = path.into();

        let mut parser = Parser::new();
        parser.set_language(language())?;
        let tree = parser.parse(&text, None).ok_or(ParseError::NoTree)?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::Syntax {
                line: first_error_line(root),
            });
        }

        let lines = text.lines().map(str::to_string).collect();
        let file_name = file_name_of(&path).to_string();

        Ok(Self {
            path,
            file_name,
            text,
            lines,
            tree,
        })
    }

    /// Path as supplied by the caller (archive entry or relative path).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Build the arena view used by the detection walk.
    pub fn syntax_tree(&self) -> SyntaxTree<'_> {
        SyntaxTree::build(&self.tree, &self.text)
    }
}

/// Last `/`-separated segment of a path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn first_error_line(root: tree_sitter::Node) -> usize {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_unit() {
        let unit = SourceUnit::parse("class A {\n  void f() {}\n}\n", "src/pkg/A.java").unwrap();
        assert_eq!(unit.file_name(), "A.java");
        assert_eq!(unit.path(), "src/pkg/A.java");
        assert_eq!(unit.line_count(), 3);
    }

    #[test]
    fn test_parse_rejects_syntax_error() {
        let err = SourceUnit::parse("class A {\n  void f( {\n}\n", "A.java").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let unit = SourceUnit::parse("class A {\r\n}\r\n", "A.java").unwrap();
        assert_eq!(unit.lines(), &["class A {".to_string(), "}".to_string()]);
    }

    #[test]
    fn test_file_name_without_directory() {
        assert_eq!(file_name_of("Plain.java"), "Plain.java");
        assert_eq!(file_name_of("a/b/C.java"), "C.java");
    }
}
