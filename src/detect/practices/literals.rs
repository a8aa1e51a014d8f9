//! Literal-last string comparisons.

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

const COMPARISONS: &[&str] = &[
    "equals",
    "equalsIgnoreCase",
    "compareTo",
    "compareToIgnoreCase",
    "contentEquals",
];

/// LFSC: `name.equals("x")` where `"x".equals(name)` is null-safe.
pub fn literal_last_comparison(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    let Some(call) = java::invocation(node) else {
        return Ok(Vec::new());
    };
    if !COMPARISONS.contains(&call.name) || call.arguments.len() != 1 {
        return Ok(Vec::new());
    }
    let Some(receiver) = call.receiver else {
        return Ok(Vec::new());
    };
    if java::is_string_literal(call.arguments[0]) && !java::is_string_literal(receiver) {
        return Ok(vec![LineSpan::line(node.line())]);
    }
    Ok(Vec::new())
}
