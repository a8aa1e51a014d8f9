//! ResultSet navigation whose boolean result is discarded.

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

const NAVIGATION: &[&str] = &["next", "previous", "first", "last"];

/// RSC: `rs.next();` used as a statement.
pub fn unchecked_navigation(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    match java::statement_call(node) {
        Some(call) if NAVIGATION.contains(&call.name) => Ok(vec![LineSpan::line(node.line())]),
        _ => Ok(Vec::new()),
    }
}
