//! Single-method interfaces that are not marked `@FunctionalInterface`.

use crate::detect::context::FileContext;
use crate::detect::types::{LineSpan, RuleResult};
use crate::syntax::{java, NodeRef};

const SUPPRESSION: &str = "PMD.ImplicitFunctionalInterface";

fn suppressed(annotation: NodeRef<'_>) -> bool {
    java::annotation_name(annotation) == "SuppressWarnings"
        && annotation
            .descendants()
            .filter(|n| java::is_string_literal(*n))
            .any(|lit| lit.text().trim_matches(|c| c == '"' || c == '\'') == SUPPRESSION)
}

/// IFI: an interface with exactly one abstract method and no default
/// methods, neither annotated nor suppressed.
pub fn implicit_functional_interface(node: NodeRef<'_>, _ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::INTERFACE {
        return Ok(Vec::new());
    }
    let annotations = java::annotations(node);
    if annotations
        .iter()
        .any(|a| java::annotation_name(*a) == "FunctionalInterface" || suppressed(*a))
    {
        return Ok(Vec::new());
    }

    let methods = java::methods(node);
    if methods.iter().any(|m| java::has_modifier(*m, "default")) {
        return Ok(Vec::new());
    }
    let abstract_count = methods
        .iter()
        .filter(|m| !java::has_modifier(**m, "static") && !java::has_modifier(**m, "private"))
        .count();
    if abstract_count != 1 {
        return Ok(Vec::new());
    }
    Ok(vec![LineSpan::line(node.line())])
}
