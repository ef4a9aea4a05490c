//! Recursion shape detection.
//!
//! A function's self-calls are counted per execution path: sequential calls
//! add up, mutually exclusive branches take the maximum. The argument
//! expressions and surrounding loops then decide whether the recursion
//! shrinks its input by a constant, by a fraction, or fans out.

use tree_sitter::Node;

use super::types::{ComplexityClass, RecursionShape};
use crate::core::ast_service::AstContext;
use crate::lang::common::{find_descendant, has_operator, named_children, walk_tree};

/// Member accesses through which a parameter still counts as "the input".
const SIZE_ACCESSORS: &[&str] = &[".length", ".len", ".size"];

/// Member-access node kinds across the supported grammars.
const MEMBER_ACCESS_KINDS: &[&str] = &["attribute", "member_expression", "field_expression"];

/// Argument-list field names across the supported grammars.
const ARGUMENT_FIELDS: &[&str] = &["arguments"];

/// Recursion facts for one function
#[derive(Debug, Clone, PartialEq)]
pub struct RecursionInfo {
    pub shape: RecursionShape,
    /// Self-call sites anywhere in the body
    pub call_sites: usize,
}

/// Classify how `function` (named `name`) recurses.
pub fn classify(
    function: Node<'_>,
    name: &str,
    parameters: &[String],
    memoized_by_decorator: bool,
    detect_memoization: bool,
    context: &AstContext<'_>,
) -> RecursionInfo {
    let Some(body) = function.child_by_field_name("body") else {
        return RecursionInfo {
            shape: RecursionShape::None,
            call_sites: 0,
        };
    };

    let sites = self_call_sites(body, name, context);
    let per_path = calls_per_path(body, name, context);
    let shape = if sites.is_empty() || per_path == 0 {
        RecursionShape::None
    } else if detect_memoization && (memoized_by_decorator || has_memo_guard(body, context)) {
        RecursionShape::Memoized
    } else if sites
        .iter()
        .flat_map(|site| enclosing_loops(*site, body, context))
        .any(|looped| iterates_parameter(looped, parameters, context))
    {
        RecursionShape::Permutation
    } else if sites
        .iter()
        .any(|site| !enclosing_loops(*site, body, context).is_empty())
    {
        RecursionShape::Traversal
    } else if sites.iter().any(|site| shrinks_geometrically(*site, context)) {
        RecursionShape::Divide { calls: per_path }
    } else if per_path == 1 {
        RecursionShape::Linear
    } else {
        RecursionShape::Branching { calls: per_path }
    };

    RecursionInfo {
        shape,
        call_sites: sites.len(),
    }
}

/// Total time for a recursive function whose non-recursive work is `body`.
pub fn recursive_time(shape: RecursionShape, body: ComplexityClass) -> ComplexityClass {
    match shape {
        RecursionShape::None => body,
        RecursionShape::Linear | RecursionShape::Memoized => ComplexityClass::LINEAR.multiply(body),
        RecursionShape::Branching { calls } => {
            ComplexityClass::Exponential { base: calls.max(2) }.multiply(body)
        }
        RecursionShape::Divide { calls } => master_theorem(calls, body),
        RecursionShape::Permutation => ComplexityClass::Factorial,
        RecursionShape::Traversal => body.max(ComplexityClass::LINEAR),
    }
}

/// Stack (and memo table) space implied by the recursion shape.
pub fn recursive_space(shape: RecursionShape) -> ComplexityClass {
    match shape {
        RecursionShape::None => ComplexityClass::CONSTANT,
        RecursionShape::Divide { .. } => ComplexityClass::LOGARITHMIC,
        _ => ComplexityClass::LINEAR,
    }
}

/// `T(n) = a·T(n/2) + f(n)` with `f(n) = n^d log^k n`.
fn master_theorem(calls: u32, body: ComplexityClass) -> ComplexityClass {
    let ComplexityClass::Polynomial { degree, log_power } = body else {
        return body;
    };
    let critical = f64::from(calls.max(1)).log2();
    if (critical - degree).abs() < 1e-6 {
        ComplexityClass::Polynomial {
            degree,
            log_power: log_power + 1,
        }
    } else if critical > degree {
        ComplexityClass::polynomial((critical * 100.0).round() / 100.0)
    } else {
        body
    }
}

fn is_self_call(node: Node<'_>, name: &str, context: &AstContext<'_>) -> bool {
    context.profile.is_call(&node)
        && context
            .profile
            .callee_name(node, context.source)
            .is_some_and(|callee| callee == name)
}

fn is_nested_function(node: &Node<'_>, context: &AstContext<'_>) -> bool {
    context.profile.is_function(node)
}

/// Every self-call under `body`, excluding nested function definitions.
fn self_call_sites<'t>(body: Node<'t>, name: &str, context: &AstContext<'_>) -> Vec<Node<'t>> {
    let mut sites = Vec::new();
    collect_sites(body, name, context, &mut sites);
    sites
}

fn collect_sites<'t>(node: Node<'t>, name: &str, context: &AstContext<'_>, out: &mut Vec<Node<'t>>) {
    if is_self_call(node, name, context) {
        out.push(node);
    }
    for child in named_children(node) {
        if !is_nested_function(&child, context) {
            collect_sites(child, name, context, out);
        }
    }
}

/// Maximum number of self-calls along any single execution path.
fn calls_per_path(node: Node<'_>, name: &str, context: &AstContext<'_>) -> u32 {
    if is_nested_function(&node, context) {
        return 0;
    }
    let own = u32::from(is_self_call(node, name, context));
    let kinds = context.profile.kinds();

    let inner = if kinds.branches.contains(&node.kind()) {
        let condition = node.child_by_field_name("condition");
        let mut guard = 0;
        let mut widest = 0;
        for child in named_children(node) {
            let calls = calls_per_path(child, name, context);
            if condition.is_some_and(|c| c.id() == child.id()) {
                guard += calls;
            } else {
                widest = widest.max(calls);
            }
        }
        guard + widest
    } else {
        sequence_calls(&named_children(node), name, context)
    };

    own + inner
}

/// Self-calls along a statement sequence. A branch that returns early
/// splits the path: either it is taken and the rest is skipped, or only its
/// condition runs before the rest.
fn sequence_calls(statements: &[Node<'_>], name: &str, context: &AstContext<'_>) -> u32 {
    let Some((first, rest)) = statements.split_first() else {
        return 0;
    };
    let here = calls_per_path(*first, name, context);
    if context.profile.kinds().branches.contains(&first.kind()) && returns_early(*first, context) {
        let guard = first
            .child_by_field_name("condition")
            .map_or(0, |condition| calls_per_path(condition, name, context));
        here.max(guard + sequence_calls(rest, name, context))
    } else {
        here + sequence_calls(rest, name, context)
    }
}

fn returns_early(branch: Node<'_>, context: &AstContext<'_>) -> bool {
    let exits = context.profile.kinds().exits;
    find_descendant(
        branch,
        &|n| exits.contains(&n.kind()),
        &|n| context.profile.is_function(n),
    )
    .is_some()
}

/// Whether a branch condition consults a memo or visited table.
fn has_memo_guard(body: Node<'_>, context: &AstContext<'_>) -> bool {
    let kinds = context.profile.kinds();
    let guards = context.profile.vocabulary().memo_guards;
    let mut found = false;

    walk_tree(body, &mut |node| {
        if found || !kinds.branches.contains(&node.kind()) {
            return;
        }
        let Some(condition) = node.child_by_field_name("condition") else {
            return;
        };
        let mentions_guard = find_descendant(
            condition,
            &|n| {
                n.named_child_count() == 0 && {
                    let text = context.text(*n).to_lowercase();
                    guards.iter().any(|guard| text.contains(guard))
                }
            },
            &|_| false,
        );
        found = mentions_guard.is_some();
    });

    found
}

/// Loops and comprehensions between `site` and the function body, innermost first.
fn enclosing_loops<'t>(site: Node<'t>, body: Node<'t>, context: &AstContext<'_>) -> Vec<Node<'t>> {
    let kinds = context.profile.kinds();
    let mut loops = Vec::new();
    let mut current = site.parent();
    while let Some(node) = current {
        if node.id() == body.id() {
            break;
        }
        if context.profile.is_loop(&node) || kinds.comprehensions.contains(&node.kind()) {
            loops.push(node);
        }
        current = node.parent();
    }
    loops
}

/// Whether a loop's iteration source mentions a parameter directly
/// (`for x in items`, `range(len(items))`, `i < arr.length`).
fn iterates_parameter(looped: Node<'_>, parameters: &[String], context: &AstContext<'_>) -> bool {
    let kinds = context.profile.kinds();
    let source_nodes: Vec<Node<'_>> = ["right", "value", "condition"]
        .iter()
        .filter_map(|field| looped.child_by_field_name(field))
        .chain(
            named_children(looped)
                .into_iter()
                .filter(|child| kinds.comprehension_clauses.contains(&child.kind()))
                .filter_map(|clause| clause.child_by_field_name("right")),
        )
        .collect();

    source_nodes.into_iter().any(|iterable| {
        find_descendant(
            iterable,
            &|n| {
                kinds.identifiers.contains(&n.kind())
                    && parameters.iter().any(|p| p == context.text(*n))
                    && n.parent().map_or(true, |parent| {
                        !MEMBER_ACCESS_KINDS.contains(&parent.kind())
                            || SIZE_ACCESSORS
                                .iter()
                                .any(|suffix| context.text(parent).ends_with(suffix))
                    })
            },
            &|_| false,
        )
        .is_some()
    })
}

/// Whether a self-call passes a halved, midpoint or sliced argument.
fn shrinks_geometrically(site: Node<'_>, context: &AstContext<'_>) -> bool {
    let kinds = context.profile.kinds();
    let vocabulary = context.profile.vocabulary();
    let Some(arguments) = ARGUMENT_FIELDS
        .iter()
        .find_map(|field| site.child_by_field_name(field))
    else {
        return false;
    };

    find_descendant(
        arguments,
        &|n| {
            (kinds.binary_operators.contains(&n.kind())
                && has_operator(*n, context.source, vocabulary.halving_operators))
                || kinds.slices.contains(&n.kind())
                || (kinds.identifiers.contains(&n.kind())
                    && vocabulary
                        .midpoint_names
                        .iter()
                        .any(|mid| context.text(*n) == *mid))
        },
        &|_| false,
    )
    .is_some()
}
