//! Log statements that build their message eagerly.

use phf::phf_map;

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

/// Logging method name to the level check that guards it.
static LEVEL_GUARDS: phf::Map<&'static str, &'static str> = phf_map! {
    "trace" => "isTraceEnabled",
    "debug" => "isDebugEnabled",
    "info" => "isInfoEnabled",
    "warn" => "isWarnEnabled",
    "error" => "isErrorEnabled",
    // java.util.logging
    "log" => "isLoggable",
    "finest" => "isLoggable",
    "finer" => "isLoggable",
    "fine" => "isLoggable",
    "warning" => "isLoggable",
    "severe" => "isLoggable",
};

/// Whether an enclosing `if` condition calls `guard`.
fn is_guarded(stmt: NodeRef<'_>, guard: &str) -> bool {
    stmt.ancestors()
        .filter(|a| a.kind() == java::IF)
        .filter_map(|a| a.field("condition"))
        .any(|cond| {
            cond.descendants()
                .filter_map(java::invocation)
                .any(|call| call.name == guard)
        })
}

/// ELS: unguarded log calls with a concatenated message or a single
/// method-call argument.
pub fn expensive_log_statement(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    let Some(call) = java::statement_call(node) else {
        return Ok(Vec::new());
    };
    let Some(guard) = LEVEL_GUARDS.get(call.name) else {
        return Ok(Vec::new());
    };
    if is_guarded(node, guard) {
        return Ok(Vec::new());
    }

    let concatenates = call
        .arguments
        .iter()
        .any(|a| a.kind() == "binary_expression" && a.field_text("operator") == Some("+"));
    let computes = call.arguments.len() == 1 && call.arguments[0].kind() == java::INVOCATION;
    if concatenates || computes {
        return Ok(vec![LineSpan::line(node.line())]);
    }
    Ok(Vec::new())
}
