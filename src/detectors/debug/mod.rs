//! Static debugger.
//!
//! Finds syntax errors, Python indentation mistakes, a handful of logic and
//! style patterns, and unused bindings. Issues that have a mechanical repair
//! carry a [`Fix`], and the report includes the source with those repairs
//! applied.

pub mod fixer;
pub mod indentation;
pub mod patterns;
pub mod syntax;
pub mod types;
pub mod unused;

use std::collections::HashSet;

use tracing::debug;

use crate::core::ast_service::AstContext;
use crate::lang::registry::Language;

pub use fixer::apply_fixes;
pub use syntax::syntax_suggestion;
pub use types::*;

/// Runs the enabled debug checks against a parsed source
#[derive(Debug, Clone, Default)]
pub struct StaticDebugger {
    config: DebugConfig,
}

impl StaticDebugger {
    /// Create a debugger with the given configuration
    pub fn new(config: DebugConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    /// Debug one source.
    pub fn debug(&self, context: &AstContext<'_>) -> DebugReport {
        let config = &self.config;
        let mut issues = Vec::new();

        let indentation = if config.check_indentation && context.language == Language::Python {
            indentation::check(context.source, config.indent_width)
        } else {
            Vec::new()
        };
        let indentation_lines: HashSet<usize> = indentation.iter().map(|issue| issue.line).collect();

        if config.check_syntax {
            issues.extend(syntax::check(
                context,
                config.max_syntax_errors,
                &indentation_lines,
            ));
        }
        issues.extend(indentation);

        if config.check_patterns {
            issues.extend(patterns::check(context));
        }

        // Reads inside broken regions are unreliable.
        if config.check_unused_variables && !context.has_errors() {
            issues.extend(unused::check(context));
        }

        issues.sort_by_key(|issue| issue.line);

        let fixed_code = if config.auto_fix {
            apply_fixes(context.source, &issues)
        } else {
            context.source.to_string()
        };

        debug!(
            "Debugged {} ({}): {} issue(s)",
            context.file_path,
            context.language,
            issues.len()
        );

        let summary = summarize(&issues);
        DebugReport {
            issues,
            fixed_code,
            summary,
        }
    }
}

/// Human-readable issue summary grouped by severity.
pub fn summarize(issues: &[DebugIssue]) -> String {
    if issues.is_empty() {
        return "No issues found in the code.".to_string();
    }

    let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
    format!(
        "Found {} issue(s):\n- {} high severity\n- {} medium severity\n- {} low severity\n",
        issues.len(),
        count(Severity::High),
        count(Severity::Medium),
        count(Severity::Low),
    )
}

#[cfg(test)]
mod tests;
