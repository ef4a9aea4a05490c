//! Python profile for the tree-sitter-python grammar.

use tree_sitter::Node;

use super::common::{
    has_operator, named_children, node_text, LanguageProfile, NodeKinds, Vocabulary,
};
use super::registry::Language;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::registry::create_parser;

    fn first_statement<'t>(tree: &'t tree_sitter::Tree) -> Node<'t> {
        tree.root_node().named_child(0).unwrap()
    }

    #[test]
    fn test_while_true_is_unconditional() {
        let source = "while True:\n    pass\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        assert!(PythonProfile.is_unconditional_loop(first_statement(&tree), source));
    }

    #[test]
    fn test_while_condition_is_not_unconditional() {
        let source = "while n > 0:\n    n -= 1\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        assert!(!PythonProfile.is_unconditional_loop(first_statement(&tree), source));
    }

    #[test]
    fn test_literal_range_is_constant_bound() {
        let source = "for i in range(0, 10):\n    pass\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        assert!(PythonProfile.has_constant_bound(first_statement(&tree), source));
    }

    #[test]
    fn test_range_over_len_is_not_constant() {
        let source = "for i in range(len(items)):\n    pass\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        assert!(!PythonProfile.has_constant_bound(first_statement(&tree), source));
    }

    #[test]
    fn test_callee_name_of_method_call() {
        let source = "items.sort()\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let call = first_statement(&tree).named_child(0).unwrap();
        assert_eq!(PythonProfile.callee_name(call, source).as_deref(), Some("sort"));
    }
}

static KINDS: NodeKinds = NodeKinds {
    functions: &["function_definition"],
    classes: &["class_definition"],
    decorated: &["decorated_definition"],
    loops: &["for_statement", "while_statement"],
    comprehensions: &[
        "list_comprehension",
        "set_comprehension",
        "dictionary_comprehension",
        "generator_expression",
    ],
    comprehension_clauses: &["for_in_clause"],
    calls: &["call"],
    branches: &["if_statement", "conditional_expression"],
    breaks: &["break_statement"],
    exits: &["return_statement", "raise_statement"],
    identifiers: &["identifier"],
    bindings: &[
        ("assignment", "left"),
        ("augmented_assignment", "left"),
        ("for_statement", "left"),
        ("for_in_clause", "left"),
        ("named_expression", "name"),
    ],
    patterns: &[
        "pattern_list",
        "tuple_pattern",
        "list_pattern",
        "list_splat_pattern",
    ],
    non_references: &[
        ("keyword_argument", "name"),
        ("attribute", "attribute"),
        ("function_definition", "name"),
        ("class_definition", "name"),
    ],
    assignments: &["assignment"],
    augmented_assignments: &["augmented_assignment"],
    binary_operators: &["binary_operator"],
    subscripts: &["subscript"],
    slices: &["slice"],
};

static VOCABULARY: Vocabulary = Vocabulary {
    allocation_calls: &[
        "append",
        "appendleft",
        "extend",
        "insert",
        "add",
        "update",
        "setdefault",
        "list",
        "dict",
        "set",
        "tuple",
        "sorted",
        "copy",
        "deepcopy",
    ],
    sort_calls: &["sort", "sorted"],
    linear_calls: &["sum", "min", "max", "any", "all", "index", "count", "remove", "join"],
    slices_copy: true,
    memo_decorators: &["lru_cache", "cache", "cached", "memoize"],
    memo_guards: &["memo", "cache", "visited", "seen", "dp"],
    multiplicative_operators: &["//=", "/=", ">>=", "*=", "<<=", "**="],
    halving_operators: &["//", "/", ">>"],
    midpoint_names: &["mid", "middle", "half"],
};

/// Python grammar profile
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonProfile;

impl PythonProfile {
    /// Whether every argument of a `range(...)` call is an integer literal.
    fn is_literal_range(&self, node: Node<'_>, source: &str) -> bool {
        if node.kind() != "call" {
            return false;
        }
        let is_range = node
            .child_by_field_name("function")
            .is_some_and(|f| node_text(f, source) == "range");
        let Some(args) = node.child_by_field_name("arguments") else {
            return false;
        };
        is_range
            && named_children(args)
                .iter()
                .all(|arg| is_integer_literal(*arg))
    }
}

fn is_integer_literal(node: Node<'_>) -> bool {
    match node.kind() {
        "integer" => true,
        "unary_operator" => node
            .child_by_field_name("argument")
            .is_some_and(is_integer_literal),
        _ => false,
    }
}

impl LanguageProfile for PythonProfile {
    fn language(&self) -> Language {
        Language::Python
    }

    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn vocabulary(&self) -> &'static Vocabulary {
        &VOCABULARY
    }

    fn callee_name(&self, call: Node<'_>, source: &str) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        match function.kind() {
            "identifier" => Some(node_text(function, source).to_string()),
            "attribute" => function
                .child_by_field_name("attribute")
                .map(|attr| node_text(attr, source).to_string()),
            _ => None,
        }
    }

    fn is_unconditional_loop(&self, node: Node<'_>, source: &str) -> bool {
        if node.kind() != "while_statement" {
            return false;
        }
        node.child_by_field_name("condition")
            .is_some_and(|cond| match cond.kind() {
                "true" => true,
                "integer" => node_text(cond, source).trim_start_matches('0') != "",
                _ => false,
            })
    }

    fn has_constant_bound(&self, node: Node<'_>, source: &str) -> bool {
        match node.kind() {
            "for_statement" | "for_in_clause" => {
                node.child_by_field_name("right").is_some_and(|right| {
                    matches!(right.kind(), "list" | "tuple" | "string")
                        || self.is_literal_range(right, source)
                })
            }
            "while_statement" => node
                .child_by_field_name("condition")
                .filter(|cond| {
                    cond.kind() == "comparison_operator"
                        && has_operator(*cond, source, &["<", "<="])
                })
                .and_then(|cond| cond.named_child(1))
                .is_some_and(is_integer_literal),
            _ => false,
        }
    }

    fn memoization_hint(&self) -> &'static str {
        "decorate it with @functools.lru_cache or rewrite it bottom-up with a table"
    }
}
