//! JavaScript profile for the tree-sitter-javascript grammar.

use tree_sitter::Node;

use super::common::{has_operator, node_text, LanguageProfile, NodeKinds, Vocabulary};
use super::registry::Language;

static KINDS: NodeKinds = NodeKinds {
    functions: &[
        "function_declaration",
        "function_expression",
        "generator_function_declaration",
        "generator_function",
        "arrow_function",
        "method_definition",
    ],
    classes: &["class_declaration", "class"],
    decorated: &[],
    loops: &[
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
    ],
    comprehensions: &[],
    comprehension_clauses: &[],
    calls: &["call_expression", "new_expression"],
    branches: &["if_statement", "ternary_expression"],
    breaks: &["break_statement"],
    exits: &["return_statement", "throw_statement"],
    identifiers: &[
        "identifier",
        "shorthand_property_identifier",
        "shorthand_property_identifier_pattern",
    ],
    bindings: &[
        ("variable_declarator", "name"),
        ("assignment_expression", "left"),
        ("augmented_assignment_expression", "left"),
        ("for_in_statement", "left"),
    ],
    patterns: &["object_pattern", "array_pattern", "pair_pattern", "rest_pattern"],
    non_references: &[],
    assignments: &["variable_declarator", "assignment_expression"],
    augmented_assignments: &["augmented_assignment_expression"],
    binary_operators: &["binary_expression"],
    subscripts: &["subscript_expression"],
    slices: &[],
};

static VOCABULARY: Vocabulary = Vocabulary {
    allocation_calls: &[
        "push", "unshift", "splice", "concat", "slice", "map", "filter", "flatMap", "from",
        "Array", "fill", "split", "set", "add",
    ],
    sort_calls: &["sort", "toSorted"],
    linear_calls: &[
        "forEach", "reduce", "some", "every", "find", "findIndex", "includes", "indexOf", "join",
    ],
    slices_copy: false,
    memo_decorators: &[],
    memo_guards: &["memo", "cache", "visited", "seen", "dp"],
    multiplicative_operators: &["*=", "/=", ">>=", "<<=", ">>>="],
    halving_operators: &["/", ">>", ">>>"],
    midpoint_names: &["mid", "middle", "half"],
};

/// JavaScript grammar profile
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaScriptProfile;

/// Innermost expression of a `( ... )` wrapper.
fn unwrap_parens(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        match current.named_child(0) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

impl LanguageProfile for JavaScriptProfile {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn vocabulary(&self) -> &'static Vocabulary {
        &VOCABULARY
    }

    fn function_name(&self, node: Node<'_>, source: &str) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(node_text(name, source).to_string());
        }
        // `const f = () => ...` takes its name from the declarator
        let parent = node.parent()?;
        match parent.kind() {
            "variable_declarator" => parent.child_by_field_name("name"),
            "assignment_expression" => parent.child_by_field_name("left"),
            "pair" => parent.child_by_field_name("key"),
            _ => None,
        }
        .map(|name| node_text(name, source).to_string())
    }

    fn callee_name(&self, call: Node<'_>, source: &str) -> Option<String> {
        let callee = call
            .child_by_field_name("function")
            .or_else(|| call.child_by_field_name("constructor"))?;
        match callee.kind() {
            "identifier" => Some(node_text(callee, source).to_string()),
            "member_expression" => callee
                .child_by_field_name("property")
                .map(|prop| node_text(prop, source).to_string()),
            _ => None,
        }
    }

    fn is_unconditional_loop(&self, node: Node<'_>, source: &str) -> bool {
        match node.kind() {
            "while_statement" | "do_statement" => node
                .child_by_field_name("condition")
                .map(unwrap_parens)
                .is_some_and(|cond| cond.kind() == "true" || node_text(cond, source) == "1"),
            "for_statement" => node
                .child_by_field_name("condition")
                .map_or(true, |cond| cond.kind() == "empty_statement"),
            _ => false,
        }
    }

    fn has_constant_bound(&self, node: Node<'_>, source: &str) -> bool {
        match node.kind() {
            "for_statement" => node
                .child_by_field_name("condition")
                .and_then(|cond| {
                    if cond.kind() == "expression_statement" {
                        cond.named_child(0)
                    } else {
                        Some(cond)
                    }
                })
                .filter(|cond| {
                    cond.kind() == "binary_expression" && has_operator(*cond, source, &["<", "<="])
                })
                .and_then(|cond| cond.child_by_field_name("right"))
                .is_some_and(|right| right.kind() == "number"),
            "for_in_statement" => node
                .child_by_field_name("right")
                .is_some_and(|right| matches!(right.kind(), "array" | "string")),
            _ => false,
        }
    }

    fn memoization_hint(&self) -> &'static str {
        "cache results in a Map keyed by the arguments or rewrite it bottom-up"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::registry::create_parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        create_parser(Language::JavaScript)
            .unwrap()
            .parse(source, None)
            .unwrap()
    }

    #[test]
    fn test_while_true_and_empty_for_are_unconditional() {
        let source = "while (true) { tick(); }";
        let tree = parse(source);
        let stmt = tree.root_node().named_child(0).unwrap();
        assert!(JavaScriptProfile.is_unconditional_loop(stmt, source));

        let source = "for (;;) { tick(); }";
        let tree = parse(source);
        let stmt = tree.root_node().named_child(0).unwrap();
        assert!(JavaScriptProfile.is_unconditional_loop(stmt, source));
    }

    #[test]
    fn test_counted_for_is_constant_bound() {
        let source = "for (let i = 0; i < 8; i++) { tick(); }";
        let tree = parse(source);
        let stmt = tree.root_node().named_child(0).unwrap();
        assert!(JavaScriptProfile.has_constant_bound(stmt, source));
        assert!(!JavaScriptProfile.is_unconditional_loop(stmt, source));
    }

    #[test]
    fn test_arrow_function_named_by_declarator() {
        let source = "const double = (x) => x * 2;";
        let tree = parse(source);
        let declarator = tree
            .root_node()
            .named_child(0)
            .and_then(|decl| decl.named_child(0))
            .unwrap();
        let arrow = declarator.child_by_field_name("value").unwrap();
        assert_eq!(
            JavaScriptProfile.function_name(arrow, source).as_deref(),
            Some("double")
        );
    }

    #[test]
    fn test_member_call_callee() {
        let source = "items.push(1);";
        let tree = parse(source);
        let call = tree.root_node().named_child(0).unwrap().named_child(0).unwrap();
        assert_eq!(JavaScriptProfile.callee_name(call, source).as_deref(), Some("push"));
    }
}
