//! Brace-balance span reconstruction.
//!
//! Findings report the full extent of the construct they flag. The end line
//! is found by scanning raw source lines from the start line and balancing
//! `{` against `}`. Braces inside string literals and comments are counted
//! too; detectors rely on this exact behavior, so it is not "fixed" here.

/// Text and end line of a brace-delimited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extract {
    pub text: String,
    pub end_line: usize,
}

/// End line (1-based) of the block whose first line is `start_line`.
///
/// Returns `start_line` when no `{` appears before end of file, and the
/// last line when a brace opens but never closes.
pub fn reconstruct(lines: &[String], start_line: usize) -> usize {
    scan(lines, start_line)
}

/// Like [`reconstruct`], also returning the spanned lines joined by `\n`.
pub fn extract(lines: &[String], start_line: usize) -> Extract {
    let end_line = scan(lines, start_line);
    let text = if lines.is_empty() || start_line == 0 || start_line > lines.len() {
        String::new()
    } else {
        lines[start_line - 1..end_line].join("\n")
    };
    Extract { text, end_line }
}

/// Clamp `end` into `[start, line_count]`.
pub fn clamp(start: usize, end: usize, line_count: usize) -> usize {
    end.min(line_count).max(start)
}

fn scan(lines: &[String], start_line: usize) -> usize {
    if start_line == 0 || start_line > lines.len() {
        return start_line.max(1);
    }

    let mut depth: i64 = 0;
    let mut opened = false;
    for (offset, line) in lines[start_line - 1..].iter().enumerate() {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
            if opened && depth <= 0 {
                return start_line + offset;
            }
        }
    }

    if opened {
        lines.len()
    } else {
        start_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_balanced_block() {
        let src = lines("void f() {\n  if (x) {\n    y();\n  }\n}\nint z;");
        assert_eq!(reconstruct(&src, 1), 5);
        assert_eq!(reconstruct(&src, 2), 4);
    }

    #[test]
    fn test_no_brace_returns_start() {
        let src = lines("abstract void f();\nint x;");
        assert_eq!(reconstruct(&src, 1), 1);
    }

    #[test]
    fn test_unclosed_returns_last_line() {
        let src = lines("void f() {\n  x();\n");
        assert_eq!(reconstruct(&src, 1), 2);
    }

    #[test]
    fn test_same_line_block() {
        let src = lines("int getX() { return x; }\nint y;");
        assert_eq!(reconstruct(&src, 1), 1);
    }

    #[test]
    fn test_braces_in_literals_are_counted() {
        let src = lines("void f() {\n  s = \"}\";\n  t();\n}");
        // the literal brace closes the block early
        assert_eq!(reconstruct(&src, 1), 2);
    }

    #[test]
    fn test_out_of_range_start() {
        let src = lines("class A {}");
        assert_eq!(reconstruct(&src, 7), 7);
        assert_eq!(reconstruct(&[], 1), 1);
    }

    #[test]
    fn test_extract_joins_span() {
        let src = lines("class A {\n  void f() {\n    g();\n  }\n}");
        let extract = extract(&src, 2);
        assert_eq!(extract.end_line, 4);
        assert_eq!(extract.text, "  void f() {\n    g();\n  }");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(3, 10, 6), 6);
        assert_eq!(clamp(3, 1, 6), 3);
    }
}
