//! Bindings that are assigned but never read anywhere in the file.

use std::collections::HashSet;

use indexmap::IndexMap;
use tree_sitter::Node;

use super::types::{DebugIssue, IssueType, Severity};
use crate::core::ast_service::AstContext;
use crate::lang::common::{named_children, walk_tree};
use crate::lang::registry::Language;

#[derive(Default)]
struct Bindings {
    /// Name to the line of its last binding, in first-seen order
    names: IndexMap<String, usize>,
    /// Identifier nodes that are write targets
    targets: HashSet<usize>,
}

/// Report names bound in the file that no expression ever reads.
pub fn check(context: &AstContext<'_>) -> Vec<DebugIssue> {
    let mut bindings = Bindings::default();
    collect_bindings(context.tree.root_node(), context, false, &mut bindings);

    let reads = collect_reads(context, &bindings.targets);

    bindings
        .names
        .into_iter()
        .filter(|(name, _)| !name.starts_with('_') && !reads.contains(name))
        .map(|(name, line)| {
            DebugIssue::new(
                line,
                IssueType::StyleWarning,
                format!("Unused variable '{name}'"),
                "Remove unused variable or use it in the code",
                Severity::Low,
            )
        })
        .collect()
}

/// Walk the tree recording binding targets. Class-level attributes are
/// reached through the class, so only their identifier nodes are marked.
fn collect_bindings(node: Node<'_>, context: &AstContext<'_>, in_class: bool, out: &mut Bindings) {
    let kinds = context.profile.kinds();

    for (kind, field) in kinds.bindings {
        if node.kind() != *kind {
            continue;
        }
        if let Some(target) = node.child_by_field_name(field) {
            bind_target(target, context, in_class, out);
        }
    }

    let in_class = if kinds.classes.contains(&node.kind()) {
        true
    } else if context.profile.is_function(&node) {
        false
    } else {
        in_class
    };

    for child in named_children(node) {
        collect_bindings(child, context, in_class, out);
    }
}

fn bind_target(target: Node<'_>, context: &AstContext<'_>, in_class: bool, out: &mut Bindings) {
    let kinds = context.profile.kinds();
    if kinds.identifiers.contains(&target.kind()) {
        out.targets.insert(target.id());
        if !in_class {
            let line = target.start_position().row + 1;
            out.names.insert(context.text(target).to_string(), line);
        }
    } else if kinds.patterns.contains(&target.kind()) {
        for child in named_children(target) {
            bind_target(child, context, in_class, out);
        }
    }
}

fn collect_reads(context: &AstContext<'_>, targets: &HashSet<usize>) -> HashSet<String> {
    let kinds = context.profile.kinds();
    let mut reads = HashSet::new();

    walk_tree(context.tree.root_node(), &mut |node| {
        if kinds.identifiers.contains(&node.kind()) {
            if !targets.contains(&node.id()) && !is_non_reference(node, context) {
                reads.insert(context.text(node).to_string());
            }
        } else if context.language == Language::Rust && node.kind() == "string_literal" {
            reads.extend(format_arguments(context.text(node)));
        }
    });

    reads
}

fn is_non_reference(node: Node<'_>, context: &AstContext<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    context
        .profile
        .kinds()
        .non_references
        .iter()
        .filter(|(kind, _)| parent.kind() == *kind)
        .any(|(_, field)| {
            parent
                .child_by_field_name(field)
                .is_some_and(|child| child.id() == node.id())
        })
}

/// Names captured inline by a format string (`"{total}"`, `"{x:>4}"`).
fn format_arguments(literal: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = literal;
    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        if rest.starts_with('{') {
            rest = &rest[1..];
            continue;
        }
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        let closes = rest[end..].starts_with('}') || rest[end..].starts_with(':');
        if closes && name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_') {
            names.push(name.to_string());
        }
        rest = &rest[end..];
    }
    names
}
