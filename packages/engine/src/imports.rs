//! # Import Normalizer
//!
//! Appends missing `using` directives to a rewritten source unit.
//! Matching is by resolved name (trivia stripped), not literal text, and
//! the caller is responsible for handing in an already-deduplicated
//! request list; given that, normalization is idempotent.

use std::collections::HashSet;
use treescribe_syntax::{factory, IdGenerator, NodeKind, SyntaxElement, SyntaxNode};

/// Append a directive for each required name not already imported,
/// preserving the input list's order. New directives land directly after
/// the existing ones, before any declaration. Returns the (possibly
/// unchanged) unit and whether anything was added.
pub fn normalize_imports(
    unit: SyntaxNode,
    required: &[String],
    ids: &mut IdGenerator,
) -> (SyntaxNode, bool) {
    let present: HashSet<String> = unit
        .child_nodes()
        .filter(|node| node.kind == NodeKind::UsingDirective)
        .filter_map(|node| node.find_node(NodeKind::QualifiedName))
        .map(|name| name.resolved_text())
        .collect();

    let missing: Vec<&String> = required
        .iter()
        .filter(|name| !present.contains(name.as_str()))
        .collect();

    if missing.is_empty() {
        return (unit, false);
    }

    // Insertion point: after the last existing using directive.
    let insert_at = unit
        .children
        .iter()
        .rposition(|child| {
            matches!(child, SyntaxElement::Node(node) if node.kind == NodeKind::UsingDirective)
        })
        .map(|index| index + 1)
        .unwrap_or(0);

    let mut unit = unit;
    for (offset, name) in missing.into_iter().enumerate() {
        let directive = factory::using_directive(ids, name);
        unit.children
            .insert(insert_at + offset, SyntaxElement::Node(directive));
    }

    (unit, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use treescribe_syntax::SyntaxTree;

    fn unit_and_ids(source: &str) -> (SyntaxNode, IdGenerator) {
        let tree = SyntaxTree::parse(source, "/t.cs").unwrap();
        let ids = tree.replacement_ids();
        (tree.root().clone(), ids)
    }

    #[test]
    fn test_missing_import_is_appended_after_existing() {
        let (unit, mut ids) = unit_and_ids("using System;\n\nclass C { }");
        let required = vec!["Vendor.Utilities".to_string()];

        let (unit, changed) = normalize_imports(unit, &required, &mut ids);

        assert!(changed);
        assert_eq!(
            unit.to_source_text(),
            "using System;\nusing Vendor.Utilities;\n\nclass C { }"
        );
    }

    #[test]
    fn test_present_import_is_not_duplicated() {
        let (unit, mut ids) = unit_and_ids("using Vendor.Utilities;\nclass C { }");
        let required = vec!["Vendor.Utilities".to_string()];

        let (unit, changed) = normalize_imports(unit, &required, &mut ids);

        assert!(!changed);
        assert_eq!(
            unit.to_source_text(),
            "using Vendor.Utilities;\nclass C { }"
        );
    }

    #[test]
    fn test_matching_is_by_resolved_name_not_literal_text() {
        // Extra spaces around the dots must not defeat the match.
        let (unit, mut ids) = unit_and_ids("using Vendor . Utilities;\nclass C { }");
        let required = vec!["Vendor.Utilities".to_string()];

        let (_, changed) = normalize_imports(unit, &required, &mut ids);
        assert!(!changed);
    }

    #[test]
    fn test_unit_without_usings_gets_directive_first() {
        let (unit, mut ids) = unit_and_ids("class C { }");
        let required = vec!["System".to_string()];

        let (unit, changed) = normalize_imports(unit, &required, &mut ids);

        assert!(changed);
        assert_eq!(unit.to_source_text(), "using System;\nclass C { }");
    }

    #[test]
    fn test_rerunning_with_same_input_is_a_noop() {
        let (unit, mut ids) = unit_and_ids("using System;\nclass C { }");
        let required = vec!["Vendor.Utilities".to_string()];

        let (unit, _) = normalize_imports(unit, &required, &mut ids);
        let first = unit.to_source_text();

        let (unit, changed) = normalize_imports(unit, &required, &mut ids);
        assert!(!changed);
        assert_eq!(unit.to_source_text(), first);
    }

    #[test]
    fn test_input_order_is_preserved() {
        let (unit, mut ids) = unit_and_ids("class C { }");
        let required = vec!["B.Second".to_string(), "A.First".to_string()];

        let (unit, _) = normalize_imports(unit, &required, &mut ids);
        assert_eq!(
            unit.to_source_text(),
            "using B.Second;\nusing A.First;\nclass C { }"
        );
    }
}
