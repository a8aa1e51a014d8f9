//! Class shape rules: utility classes and constructor visibility.

use crate::detect::context::FileContext;
use crate::detect::types::RuleResult;
use crate::syntax::{java, NodeRef};

/// UTD: a concrete class made only of static methods that can still be
/// instantiated (no constructor, or a non-private one).
pub fn utility_class(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::CLASS || java::has_modifier(node, "abstract") {
        return Ok(Vec::new());
    }
    let methods = java::methods(node);
    if methods.is_empty() || !methods.iter().all(|m| java::has_modifier(*m, "static")) {
        return Ok(Vec::new());
    }
    let constructors = java::constructors(node);
    let instantiable =
        constructors.is_empty() || constructors.iter().any(|c| !java::has_modifier(*c, "private"));
    if !instantiable {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

/// PRV: a non-final class whose constructors are all private.
pub fn private_constructors_not_final(node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
    if node.kind() != java::CLASS || java::has_modifier(node, "final") {
        return Ok(Vec::new());
    }
    let constructors = java::constructors(node);
    if constructors.is_empty() || !constructors.iter().all(|c| java::has_modifier(*c, "private")) {
        return Ok(Vec::new());
    }
    Ok(vec![ctx.decl_span(node)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::spans;
    use crate::detect::types::LineSpan;
    use indoc::indoc;

    #[test]
    fn test_utility_class_without_constructor() {
        let src = indoc! {"
            public class Strings {
              public static String trim(String s) { return s.trim(); }
              static int len(String s) { return s.length(); }
            }
        "};
        assert_eq!(spans(src, utility_class), vec![LineSpan::new(1, 4)]);
    }

    #[test]
    fn test_utility_class_with_private_constructor_is_fine() {
        let src = indoc! {"
            public final class Strings {
              private Strings() {}
              public static String trim(String s) { return s.trim(); }
            }
        "};
        assert!(spans(src, utility_class).is_empty());
    }

    #[test]
    fn test_utility_class_needs_all_static() {
        let src = indoc! {"
            class Mixed {
              static void a() {}
              void b() {}
            }
            abstract class Base {
              static void a() {}
            }
            class Empty {}
        "};
        assert!(spans(src, utility_class).is_empty());
    }

    #[test]
    fn test_private_constructors_not_final() {
        let src = indoc! {"
            class Singleton {
              private static final Singleton INSTANCE = new Singleton();
              private Singleton() {}
            }
            final class Sealed {
              private Sealed() {}
            }
            class Open {
              private Open(int a) {}
              Open() {}
            }
        "};
        assert_eq!(
            spans(src, private_constructors_not_final),
            vec![LineSpan::new(1, 4)]
        );
    }
}
