//! Exception rules: raw types thrown or declared, explicit NPEs.

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

/// Exception types too generic to tell a caller anything.
const RAW_TYPES: &[&str] = &["RuntimeException", "Throwable", "Exception", "Error"];

/// RWD: `throw new RuntimeException(...)` and friends.
pub fn raw_exception_thrown(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != "throw_statement" {
        return Ok(Vec::new());
    }
    match java::thrown_creation_type(node) {
        Some(ty) if RAW_TYPES.contains(&ty) => Ok(vec![LineSpan::line(node.line())]),
        _ => Ok(Vec::new()),
    }
}

/// UCD: a `throws` clause naming one of the raw types.
pub fn unchecked_exception_declared(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if !java::is_callable(node) {
        return Ok(Vec::new());
    }
    if !java::thrown_types(node).iter().any(|t| RAW_TYPES.contains(t)) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

/// NPD: `throw new NullPointerException(...)`.
pub fn null_pointer_thrown(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != "throw_statement" {
        return Ok(Vec::new());
    }
    match java::thrown_creation_type(node) {
        Some("NullPointerException") => Ok(vec![LineSpan::line(node.line())]),
        _ => Ok(Vec::new()),
    }
}
