//! Nested `if` detection.
//!
//! Depth grows only through then-branches. `else` branches and loop bodies
//! do not contribute, and blocks are transparent.

use crate::detect::context::FileContext;
use crate::detect::types::RuleResult;
use crate::syntax::{java, NodeRef};

/// Deepest then-branch `if` nesting under `stmt`.
pub fn max_if_depth(stmt: NodeRef<'_>, depth: usize) -> usize {
    match stmt.kind() {
        java::IF => match stmt.field("consequence") {
            Some(then) => max_if_depth(then, depth + 1),
            None => depth + 1,
        },
        "block" => stmt
            .named_children()
            .map(|s| max_if_depth(s, depth))
            .max()
            .unwrap_or(depth),
        _ => depth,
    }
}

/// Outermost `if` of the first chain that reaches `target` depth.
fn first_deep_chain<'a>(
    stmt: NodeRef<'a>,
    target: usize,
    depth: usize,
    outer: Option<NodeRef<'a>>,
) -> Option<NodeRef<'a>> {
    match stmt.kind() {
        java::IF => {
            let outer = outer.or(Some(stmt));
            if depth + 1 >= target {
                return outer;
            }
            stmt.field("consequence")
                .and_then(|then| first_deep_chain(then, target, depth + 1, outer))
        }
        "block" => stmt
            .named_children()
            .find_map(|s| first_deep_chain(s, target, depth, outer)),
        _ => None,
    }
}

/// NED: methods and constructors whose `if` nesting reaches the limit.
pub fn nested_if_statements(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if !java::is_callable(node) {
        return Ok(Vec::new());
    }
    let Some(body) = node.field("body") else {
        return Ok(Vec::new());
    };
    let target = ctx.thresholds().nested_if_depth;
    if max_if_depth(body, 0) < target {
        return Ok(Vec::new());
    }
    let start = first_deep_chain(body, target, 0, None)
        .map(|outer| outer.line())
        .unwrap_or_else(|| node.line());
    Ok(vec![ctx.block_span(start)])
}
