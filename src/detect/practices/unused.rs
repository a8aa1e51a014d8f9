//! Unused local variables.

use std::collections::HashSet;

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

/// Names starting with these are unused on purpose.
const IGNORED_PREFIXES: &[&str] = &["ignored", "unused"];

/// Every identifier in the file that is read somewhere.
///
/// Declaration and call names are not reads, nor is the bare target of an
/// assignment. The index is per file, not per scope, so a name read in any
/// method counts as read everywhere.
pub fn build_read_index(root: NodeRef<'_>) -> HashSet<String> {
    root.descendants()
        .filter(|n| n.kind() == "identifier")
        .filter(|n| !n.is_field_of_parent("name"))
        .filter(|n| {
            !(n.is_field_of_parent("left")
                && n.parent().map(|p| p.kind()) == Some("assignment_expression"))
        })
        .map(|n| n.text().to_string())
        .collect()
}

/// ULV: local variables never read anywhere in the file.
pub fn unused_local_variable(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != "local_variable_declaration" {
        return Ok(Vec::new());
    }
    let Some(root) = node.ancestors().last() else {
        return Ok(Vec::new());
    };
    let reads = ctx.read_index(|| build_read_index(root));

    Ok(java::declarator_names(node)
        .into_iter()
        .filter(|(name, _)| !IGNORED_PREFIXES.iter().any(|p| name.starts_with(p)))
        .filter(|(name, _)| !reads.contains(*name))
        .map(|(_, declarator)| LineSpan::line(declarator.line()))
        .collect())
}
