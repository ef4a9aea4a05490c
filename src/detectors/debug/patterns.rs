//! Pattern rules: literal identity comparisons, loops that never exit and
//! bare `except:` handlers.

use tree_sitter::Node;

use super::types::{DebugIssue, Fix, IssueType, Severity};
use crate::core::ast_service::AstContext;
use crate::lang::common::{children, named_children, walk_tree};
use crate::lang::registry::Language;

/// Calls that terminate the process.
const EXIT_CALLS: &[&str] = &["exit", "_exit", "quit", "abort"];

/// Suspension points that hand control back to the caller.
const YIELD_KINDS: &[&str] = &["yield", "yield_expression"];

/// Python literal kinds for which `is` compares identity by accident.
const LITERAL_KINDS: &[&str] = &["string", "concatenated_string", "integer", "float"];

/// Run every pattern rule that applies to the context's language.
pub fn check(context: &AstContext<'_>) -> Vec<DebugIssue> {
    let mut issues = Vec::new();
    let python = context.language == Language::Python;

    walk_tree(context.tree.root_node(), &mut |node| {
        if python && node.kind() == "comparison_operator" {
            issues.extend(literal_identity(node, context));
        }
        if python && node.kind() == "except_clause" {
            issues.extend(bare_except(node, context));
        }
        if context.profile.is_loop(&node)
            && context.profile.is_unconditional_loop(node, context.source)
            && !loop_escapes(node, context, false)
        {
            issues.push(DebugIssue::new(
                node.start_position().row + 1,
                IssueType::LogicError,
                "Potential infinite loop detected",
                "Add a break condition to prevent infinite execution",
                Severity::High,
            ));
        }
    });

    issues
}

/// `x is 5` / `x is not "a"`
fn literal_identity(node: Node<'_>, context: &AstContext<'_>) -> Vec<DebugIssue> {
    let parts = children(node);
    let mut issues = Vec::new();

    for (index, part) in parts.iter().enumerate() {
        if part.is_named() || !matches!(part.kind(), "is" | "is not") {
            continue;
        }
        let mut op_end = *part;
        if part.kind() == "is" {
            if let Some(next) = parts.get(index + 1).filter(|n| n.kind() == "not") {
                op_end = *next;
            }
        }
        let negated = part.kind() == "is not" || op_end.id() != part.id();

        let left = parts[..index].iter().rev().find(|n| n.is_named());
        let right = parts[index + 1..].iter().find(|n| n.is_named());
        let against_literal = [left, right]
            .into_iter()
            .flatten()
            .any(|operand| LITERAL_KINDS.contains(&operand.kind()));
        if !against_literal {
            continue;
        }

        let mut issue = DebugIssue::new(
            part.start_position().row + 1,
            IssueType::LogicError,
            "Using 'is' for literal comparison",
            "Use '==' instead of 'is' for value comparison",
            Severity::Medium,
        );
        if part.start_position().row == op_end.end_position().row {
            issue = issue.with_fix(Fix::Splice {
                start: part.start_position().column,
                end: op_end.end_position().column,
                replacement: if negated { "!=" } else { "==" }.to_string(),
            });
        }
        issues.push(issue);
    }

    issues
}

/// `except:` with no exception type
fn bare_except(node: Node<'_>, context: &AstContext<'_>) -> Option<DebugIssue> {
    let typed = named_children(node)
        .iter()
        .any(|child| !matches!(child.kind(), "block" | "comment"));
    if typed {
        return None;
    }

    let keyword = children(node)
        .into_iter()
        .find(|child| !child.is_named() && context.text(*child) == "except")?;
    let column = keyword.end_position().column;
    Some(
        DebugIssue::new(
            keyword.start_position().row + 1,
            IssueType::StyleError,
            "Bare except clause",
            "Specify the exception type(s) to catch",
            Severity::Medium,
        )
        .with_fix(Fix::Splice {
            start: column,
            end: column,
            replacement: " Exception".to_string(),
        }),
    )
}

/// Whether anything under `node` leaves the loop being checked.
///
/// `nested` is set once the walk enters an inner loop: plain breaks there
/// belong to the inner loop, labeled ones may still target ours.
fn loop_escapes(node: Node<'_>, context: &AstContext<'_>, nested: bool) -> bool {
    let kinds = context.profile.kinds();
    for child in children(node) {
        if context.profile.is_function(&child) {
            continue;
        }
        let kind = child.kind();
        if kinds.breaks.contains(&kind) && (!nested || is_labeled(child)) {
            return true;
        }
        if kinds.exits.contains(&kind) || YIELD_KINDS.contains(&kind) {
            return true;
        }
        if context.profile.is_call(&child)
            && context
                .profile
                .callee_name(child, context.source)
                .is_some_and(|name| EXIT_CALLS.contains(&name.as_str()))
        {
            return true;
        }
        let inner = nested || context.profile.is_loop(&child);
        if loop_escapes(child, context, inner) {
            return true;
        }
    }
    false
}

fn is_labeled(node: Node<'_>) -> bool {
    node.child_by_field_name("label").is_some()
        || named_children(node)
            .iter()
            .any(|child| matches!(child.kind(), "label" | "statement_identifier"))
}
