//! Debug analysis types and configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for the static debugger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Enable debug analysis
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Report parser errors
    #[serde(default = "default_true")]
    pub check_syntax: bool,
    /// Check block indentation (Python only)
    #[serde(default = "default_true")]
    pub check_indentation: bool,
    /// Run the literal-comparison, infinite-loop and bare-except rules
    #[serde(default = "default_true")]
    pub check_patterns: bool,
    /// Report bindings that are never read
    #[serde(default = "default_true")]
    pub check_unused_variables: bool,
    /// Produce `fixed_code` with mechanical repairs applied
    #[serde(default = "default_true")]
    pub auto_fix: bool,
    /// Maximum syntax errors reported per file
    #[serde(default = "DebugConfig::default_max_syntax_errors")]
    pub max_syntax_errors: usize,
    /// Indentation width used when repairing blocks
    #[serde(default = "DebugConfig::default_indent_width")]
    pub indent_width: usize,
}

fn default_true() -> bool {
    true
}

impl DebugConfig {
    const fn default_max_syntax_errors() -> usize {
        5
    }

    const fn default_indent_width() -> usize {
        4
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_syntax: true,
            check_indentation: true,
            check_patterns: true,
            check_unused_variables: true,
            auto_fix: true,
            max_syntax_errors: Self::default_max_syntax_errors(),
            indent_width: Self::default_indent_width(),
        }
    }
}

/// Category of a debug finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    SyntaxError,
    IndentationError,
    LogicError,
    StyleError,
    StyleWarning,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SyntaxError => "SyntaxError",
            Self::IndentationError => "IndentationError",
            Self::LogicError => "LogicError",
            Self::StyleError => "StyleError",
            Self::StyleWarning => "StyleWarning",
        };
        f.write_str(name)
    }
}

/// Severity of a debug finding, ordered from least to most severe
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Mechanical repair attached to an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fix {
    /// Replace the line's leading whitespace with `indent` spaces
    Reindent { indent: usize },
    /// Replace the byte range `start..end` of the line with `replacement`
    Splice {
        start: usize,
        end: usize,
        replacement: String,
    },
}

/// A single debug finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugIssue {
    /// 1-based line number
    pub line: usize,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub description: String,
    pub suggestion: String,
    pub severity: Severity,
    #[serde(skip)]
    pub fix: Option<Fix>,
}

impl DebugIssue {
    /// Create an issue without a fix
    pub fn new(
        line: usize,
        issue_type: IssueType,
        description: impl Into<String>,
        suggestion: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            line,
            issue_type,
            description: description.into(),
            suggestion: suggestion.into(),
            severity,
            fix: None,
        }
    }

    /// Attach a mechanical fix
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Result of debugging one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugReport {
    pub issues: Vec<DebugIssue>,
    pub fixed_code: String,
    pub summary: String,
}

impl DebugReport {
    /// Default report returned when debugging cannot run; the code is unchanged.
    pub fn failed(source: &str, reason: impl Into<String>) -> Self {
        Self {
            issues: Vec::new(),
            fixed_code: source.to_string(),
            summary: reason.into(),
        }
    }

    /// Number of issues at or above `severity`
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity >= severity)
            .count()
    }

    /// Number of issues with exactly `severity`
    pub fn count_of(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}
