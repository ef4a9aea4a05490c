//! Rust profile for the tree-sitter-rust grammar.

use tree_sitter::Node;

use super::common::{node_text, LanguageProfile, NodeKinds, Vocabulary};
use super::registry::Language;

static KINDS: NodeKinds = NodeKinds {
    functions: &["function_item", "closure_expression"],
    classes: &["impl_item", "trait_item"],
    decorated: &[],
    loops: &["for_expression", "while_expression", "loop_expression"],
    comprehensions: &[],
    comprehension_clauses: &[],
    calls: &["call_expression", "macro_invocation"],
    branches: &["if_expression", "match_block"],
    breaks: &["break_expression"],
    exits: &["return_expression", "try_expression"],
    identifiers: &["identifier"],
    bindings: &[
        ("let_declaration", "pattern"),
        ("for_expression", "pattern"),
        ("assignment_expression", "left"),
        ("compound_assignment_expr", "left"),
    ],
    patterns: &[
        "tuple_pattern",
        "mut_pattern",
        "ref_pattern",
        "reference_pattern",
        "slice_pattern",
    ],
    non_references: &[],
    assignments: &["let_declaration", "assignment_expression"],
    augmented_assignments: &["compound_assignment_expr"],
    binary_operators: &["binary_expression"],
    subscripts: &["index_expression"],
    slices: &["range_expression"],
};

static VOCABULARY: Vocabulary = Vocabulary {
    allocation_calls: &[
        "push",
        "push_back",
        "push_front",
        "insert",
        "extend",
        "collect",
        "to_vec",
        "to_owned",
        "with_capacity",
        "vec",
    ],
    sort_calls: &[
        "sort",
        "sort_by",
        "sort_by_key",
        "sort_unstable",
        "sort_unstable_by",
        "sort_unstable_by_key",
    ],
    linear_calls: &[
        "contains", "position", "sum", "count", "fold", "for_each", "any", "all", "find",
        "retain", "join", "concat",
    ],
    slices_copy: false,
    memo_decorators: &["cached", "memoize"],
    memo_guards: &["memo", "cache", "visited", "seen", "dp"],
    multiplicative_operators: &["*=", "/=", ">>=", "<<="],
    halving_operators: &["/", ">>"],
    midpoint_names: &["mid", "middle", "half"],
};

/// Rust grammar profile
#[derive(Debug, Default, Clone, Copy)]
pub struct RustProfile;

fn callee_segment(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" | "field_identifier" => Some(node_text(node, source).to_string()),
        "scoped_identifier" => node
            .child_by_field_name("name")
            .map(|name| node_text(name, source).to_string()),
        "field_expression" => node
            .child_by_field_name("field")
            .map(|field| node_text(field, source).to_string()),
        "generic_function" => node
            .child_by_field_name("function")
            .and_then(|inner| callee_segment(inner, source)),
        _ => None,
    }
}

impl LanguageProfile for RustProfile {
    fn language(&self) -> Language {
        Language::Rust
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
        // `let f = |x| ...` takes its name from the binding
        let parent = node.parent()?;
        (parent.kind() == "let_declaration")
            .then(|| parent.child_by_field_name("pattern"))
            .flatten()
            .map(|pattern| node_text(pattern, source).to_string())
    }

    fn callee_name(&self, call: Node<'_>, source: &str) -> Option<String> {
        if call.kind() == "macro_invocation" {
            return call
                .child_by_field_name("macro")
                .and_then(|mac| callee_segment(mac, source));
        }
        call.child_by_field_name("function")
            .and_then(|callee| callee_segment(callee, source))
    }

    fn is_unconditional_loop(&self, node: Node<'_>, source: &str) -> bool {
        match node.kind() {
            "loop_expression" => true,
            "while_expression" => node
                .child_by_field_name("condition")
                .is_some_and(|cond| node_text(cond, source) == "true"),
            _ => false,
        }
    }

    fn has_constant_bound(&self, node: Node<'_>, _source: &str) -> bool {
        if node.kind() != "for_expression" {
            return false;
        }
        let Some(value) = node.child_by_field_name("value") else {
            return false;
        };
        match value.kind() {
            "array_expression" => true,
            "range_expression" => {
                let mut cursor = value.walk();
                let bounds: Vec<_> = value.named_children(&mut cursor).collect();
                bounds.len() == 2 && bounds.iter().all(|b| b.kind() == "integer_literal")
            }
            _ => false,
        }
    }

    fn memoization_hint(&self) -> &'static str {
        "cache results in a HashMap keyed by the arguments or rewrite it bottom-up"
    }
}
