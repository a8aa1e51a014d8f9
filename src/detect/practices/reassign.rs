//! Reassignment of parameters, loop variables and catch variables.
//!
//! Each rule reports the first write to each distinct variable within its
//! construct, at the line of that write.

use std::collections::HashSet;

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleError, RuleResult};
use crate::syntax::{java, NodeRef};

/// Whether `node` sits in an anonymous or local class declared inside
/// `scope`, where the outer names may be shadowed.
fn in_nested_class(node: NodeRef<'_>, scope: NodeRef<'_>) -> bool {
    node.ancestors()
        .take_while(|a| a.id() != scope.id())
        .any(|a| a.kind() == "class_body")
}

/// First write per name among `names` inside `scope`, in walk order.
/// Nested class bodies are not searched.
fn first_writes(scope: NodeRef<'_>, names: &HashSet<&str>) -> Vec<LineSpan> {
    let mut reported = HashSet::new();
    let mut spans = Vec::new();
    for node in scope.descendants() {
        let Some(target) = java::written_identifier(node) else {
            continue;
        };
        if in_nested_class(node, scope) {
            continue;
        }
        if names.contains(target) && reported.insert(target) {
            spans.push(LineSpan::line(node.line()));
            if reported.len() == names.len() {
                break;
            }
        }
    }
    spans
}

/// RP: writes to a method or constructor parameter.
pub fn reassigned_parameter(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    if !java::is_callable(node) {
        return Ok(Vec::new());
    }
    let Some(body) = node.field("body") else {
        return Ok(Vec::new());
    };
    let params: HashSet<&str> = java::parameter_names(node).into_iter().collect();
    if params.is_empty() {
        return Ok(Vec::new());
    }
    Ok(first_writes(body, &params))
}

/// RLV: writes to a loop control variable inside the loop body.
pub fn reassigned_loop_variable(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    let vars: HashSet<&str> = match node.kind() {
        "for_statement" => node
            .fields("init")
            .into_iter()
            .filter(|init| init.kind() == "local_variable_declaration")
            .flat_map(java::declarator_names)
            .map(|(name, _)| name)
            .collect(),
        "enhanced_for_statement" => java::name(node).into_iter().collect(),
        _ => return Ok(Vec::new()),
    };
    if vars.is_empty() {
        return Ok(Vec::new());
    }
    let Some(body) = node.field("body") else {
        return Ok(Vec::new());
    };
    Ok(first_writes(body, &vars))
}

/// RCV: writes to the exception variable inside its catch block.
pub fn reassigned_catch_variable(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != "catch_clause" {
        return Ok(Vec::new());
    }
    let Some(name) = node
        .children_of_kind("catch_formal_parameter")
        .next()
        .and_then(java::name)
    else {
        return Err(RuleError::shape("catch_clause", node.line(), "no named parameter"));
    };
    let Some(body) = node.field("body") else {
        return Err(RuleError::shape("catch_clause", node.line(), "no body"));
    };
    Ok(first_writes(body, &HashSet::from([name])))
}
