//! Common AST abstractions shared by the language profiles.
//!
//! A profile is mostly static data: which tree-sitter node kinds mean "loop",
//! "function", "call" and so on for one grammar. The analyzers are written
//! once against [`LanguageProfile`] and stay grammar-agnostic.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use super::registry::Language;

/// Source location information (all positions 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Start line
    pub start_line: usize,
    /// End line
    pub end_line: usize,
    /// Start column
    pub start_column: usize,
    /// End column
    pub end_column: usize,
}

impl SourceLocation {
    /// Location spanned by a tree-sitter node.
    pub fn of(node: &Node<'_>) -> Self {
        Self {
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            start_column: node.start_position().column + 1,
            end_column: node.end_position().column + 1,
        }
    }
}

/// Node-kind tables for a grammar.
#[derive(Debug)]
pub struct NodeKinds {
    /// Function and method definitions
    pub functions: &'static [&'static str],
    /// Class-like containers whose bodies hold methods
    pub classes: &'static [&'static str],
    /// Wrappers that attach decorators/attributes to a definition
    pub decorated: &'static [&'static str],
    /// Loop statements/expressions
    pub loops: &'static [&'static str],
    /// Comprehension expressions
    pub comprehensions: &'static [&'static str],
    /// The `for` clause inside a comprehension
    pub comprehension_clauses: &'static [&'static str],
    /// Call expressions
    pub calls: &'static [&'static str],
    /// Conditionals whose non-condition children are mutually exclusive
    pub branches: &'static [&'static str],
    /// Loop-exiting statements bound to the nearest loop
    pub breaks: &'static [&'static str],
    /// Statements that leave the enclosing function
    pub exits: &'static [&'static str],
    /// Plain identifier nodes
    pub identifiers: &'static [&'static str],
    /// `(node kind, field)` pairs whose field binds names
    pub bindings: &'static [(&'static str, &'static str)],
    /// Destructuring patterns that may wrap bound identifiers
    pub patterns: &'static [&'static str],
    /// `(node kind, field)` pairs whose identifiers are not variable reads
    pub non_references: &'static [(&'static str, &'static str)],
    /// Plain assignments / declarations
    pub assignments: &'static [&'static str],
    /// Compound assignments (`+=`, `//=`, ...)
    pub augmented_assignments: &'static [&'static str],
    /// Binary operator expressions
    pub binary_operators: &'static [&'static str],
    /// Subscript/index expressions
    pub subscripts: &'static [&'static str],
    /// Slice expressions or range-indexing nodes
    pub slices: &'static [&'static str],
}

/// Names and operator tokens the complexity estimator reacts to.
#[derive(Debug)]
pub struct Vocabulary {
    /// Calls that allocate storage proportional to their input
    pub allocation_calls: &'static [&'static str],
    /// Calls that sort their input
    pub sort_calls: &'static [&'static str],
    /// Calls that scan their receiver or argument once
    pub linear_calls: &'static [&'static str],
    /// Whether slicing copies the sliced range
    pub slices_copy: bool,
    /// Decorators that memoize a function
    pub memo_decorators: &'static [&'static str],
    /// Identifier fragments that suggest a memo/visited table
    pub memo_guards: &'static [&'static str],
    /// Compound-assignment operators that scale a loop counter
    pub multiplicative_operators: &'static [&'static str],
    /// Binary operators that shrink an argument geometrically
    pub halving_operators: &'static [&'static str],
    /// Identifiers that conventionally name a midpoint
    pub midpoint_names: &'static [&'static str],
}

/// Grammar knowledge consumed by the debug and complexity analyzers.
pub trait LanguageProfile: Send + Sync {
    /// Language this profile describes
    fn language(&self) -> Language;

    /// Node-kind tables
    fn kinds(&self) -> &'static NodeKinds;

    /// Estimator vocabulary
    fn vocabulary(&self) -> &'static Vocabulary;

    /// Name of a function definition node.
    fn function_name(&self, node: Node<'_>, source: &str) -> Option<String> {
        node.child_by_field_name("name")
            .map(|name| node_text(name, source).to_string())
    }

    /// Last path segment of the callee of a call node (`obj.sort()` → `sort`).
    fn callee_name(&self, call: Node<'_>, source: &str) -> Option<String>;

    /// Whether the loop condition is constant-true (`while True`, `loop {}`).
    fn is_unconditional_loop(&self, node: Node<'_>, source: &str) -> bool;

    /// Whether the loop runs a constant number of times (`range(10)`).
    fn has_constant_bound(&self, node: Node<'_>, source: &str) -> bool;

    /// Hint for memoizing a function in this language.
    fn memoization_hint(&self) -> &'static str;

    /// Whether the node defines a function.
    fn is_function(&self, node: &Node<'_>) -> bool {
        self.kinds().functions.contains(&node.kind())
    }

    /// Whether the node is a loop.
    fn is_loop(&self, node: &Node<'_>) -> bool {
        self.kinds().loops.contains(&node.kind())
    }

    /// Whether the node is a call.
    fn is_call(&self, node: &Node<'_>) -> bool {
        self.kinds().calls.contains(&node.kind())
    }
}

/// Text of a node, clamped to the source bounds.
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    let start = node.start_byte().min(source.len());
    let end = node.end_byte().min(source.len());
    source.get(start..end).unwrap_or_default()
}

/// Named children of a node, collected for iteration.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children of a node, including anonymous tokens.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Pre-order traversal of `node` and all of its descendants.
pub fn walk_tree<'t>(node: Node<'t>, visit: &mut dyn FnMut(Node<'t>)) {
    let mut cursor = node.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Depth-first search for the first descendant (or self) matching `pred`,
/// without descending into nodes matching `stop`.
pub fn find_descendant<'t>(
    node: Node<'t>,
    pred: &dyn Fn(&Node<'t>) -> bool,
    stop: &dyn Fn(&Node<'t>) -> bool,
) -> Option<Node<'t>> {
    if pred(&node) {
        return Some(node);
    }
    for child in children(node) {
        if stop(&child) {
            continue;
        }
        if let Some(found) = find_descendant(child, pred, stop) {
            return Some(found);
        }
    }
    None
}

/// Whether the operator token of a binary/compound node is in `operators`.
pub fn has_operator(node: Node<'_>, source: &str, operators: &[&str]) -> bool {
    children(node)
        .into_iter()
        .filter(|child| !child.is_named())
        .any(|child| operators.contains(&node_text(child, source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::registry::create_parser;

    #[test]
    fn test_source_location_is_one_based() {
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse("x = 1\ny = 2\n", None).unwrap();
        let second = tree.root_node().named_child(1).unwrap();
        let loc = SourceLocation::of(&second);
        assert_eq!(loc.start_line, 2);
        assert_eq!(loc.start_column, 1);
    }

    #[test]
    fn test_has_operator_reads_anonymous_tokens() {
        let source = "n //= 2\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let stmt = tree.root_node().named_child(0).unwrap();
        let aug = stmt.named_child(0).unwrap();
        assert_eq!(aug.kind(), "augmented_assignment");
        assert!(has_operator(aug, source, &["//="]));
        assert!(!has_operator(aug, source, &["+="]));
    }

    #[test]
    fn test_walk_tree_visits_in_document_order() {
        let source = "a = b\n";
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let mut idents = Vec::new();
        walk_tree(tree.root_node(), &mut |node| {
            if node.kind() == "identifier" {
                idents.push(node_text(node, source).to_string());
            }
        });
        assert_eq!(idents, vec!["a", "b"]);
    }

    #[test]
    fn test_node_text_clamps() {
        let mut parser = create_parser(Language::Python).unwrap();
        let tree = parser.parse("abc\n", None).unwrap();
        assert_eq!(node_text(tree.root_node(), "ab"), "ab");
    }
}
