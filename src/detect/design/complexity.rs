//! Cyclomatic complexity and switch density.

use crate::detect::context::FileContext;
use crate::detect::types::RuleResult;
use crate::syntax::{java, NodeRef};

const SWITCH_KINDS: &[&str] = &["switch_expression", "switch_statement"];

/// Node kinds that each add one decision point.
const DECISION_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "enhanced_for_statement",
    "while_statement",
    "do_statement",
    "switch_expression",
    "switch_statement",
    "ternary_expression",
];

/// McCabe complexity of a method: one plus every branch construct and
/// short-circuit operator in its subtree.
pub fn cyclomatic_complexity(method: NodeRef<'_>) -> usize {
    1 + method
        .descendants()
        .filter(|n| {
            DECISION_KINDS.contains(&n.kind())
                || (n.kind() == "binary_expression"
                    && matches!(n.field_text("operator"), Some("&&") | Some("||")))
        })
        .count()
}

/// CYC: methods whose complexity exceeds the threshold.
pub fn high_cyclomatic_complexity(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::METHOD {
        return Ok(Vec::new());
    }
    if cyclomatic_complexity(node) <= ctx.thresholds().cyclomatic_complexity {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

/// Labels of one switch. `default` counts once, `case a, b ->` counts
/// each constant.
pub fn switch_label_count(switch: NodeRef<'_>) -> usize {
    let Some(body) = switch.field("body") else {
        return 0;
    };
    body.named_children()
        .flat_map(|group| group.children_of_kind("switch_label"))
        .map(|label| {
            label
                .named_children()
                .filter(|c| c.kind() != "guard")
                .count()
                .max(1)
        })
        .sum()
}

/// SWD: the first switch in a method with more labels than allowed.
pub fn high_switch_density(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::METHOD {
        return Ok(Vec::new());
    }
    let limit = ctx.thresholds().max_switch_labels;
    let dense = node
        .descendants()
        .filter(|n| SWITCH_KINDS.contains(&n.kind()))
        .find(|switch| switch_label_count(*switch) > limit);

    Ok(dense
        .map(|switch| vec![ctx.block_span(switch.line())])
        .unwrap_or_default())
}
