//! Parser-error reporting.

use std::collections::HashSet;

use super::types::{DebugIssue, IssueType, Severity};
use crate::core::ast_service::{syntax_errors, AstContext};

const CLOSING_HINT: &str = "Add closing quotation mark or parenthesis";

/// Message fragments mapped to repair hints, first match wins.
const SYNTAX_SUGGESTIONS: &[(&str, &str)] = &[
    ("EOF while scanning", CLOSING_HINT),
    ("missing ')'", CLOSING_HINT),
    ("missing ']'", CLOSING_HINT),
    ("missing '}'", CLOSING_HINT),
    ("missing '\"'", CLOSING_HINT),
    ("missing '''", CLOSING_HINT),
    (
        "invalid syntax",
        "Check for missing colons, parentheses, or invalid operators",
    ),
    ("unexpected indent", "Remove extra indentation"),
    ("expected an indented block", "Add indentation after this line"),
];

/// Repair hint for a syntax error message.
pub fn syntax_suggestion(message: &str) -> &'static str {
    SYNTAX_SUGGESTIONS
        .iter()
        .find(|(key, _)| message.contains(key))
        .map_or("Check syntax near this line", |(_, hint)| hint)
}

/// Report parser errors, skipping lines already explained by another check.
pub fn check(context: &AstContext<'_>, limit: usize, skip_lines: &HashSet<usize>) -> Vec<DebugIssue> {
    syntax_errors(context, limit)
        .into_iter()
        .filter(|diag| !skip_lines.contains(&diag.line))
        .map(|diag| {
            let description = format!(
                "{} (line {}, column {})",
                diag.message, diag.line, diag.column
            );
            DebugIssue::new(
                diag.line,
                IssueType::SyntaxError,
                description,
                syntax_suggestion(&diag.message),
                Severity::High,
            )
        })
        .collect()
}
