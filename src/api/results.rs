//! Review results and batch reporting structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detectors::complexity::{ComplexityClass, ComplexityReport};
use crate::detectors::debug::{DebugReport, Severity};
use crate::lang::registry::Language;

const OPTIMIZATION_HEADING: &str = "- **Optimization Suggestions**:";
const BUG_FIX_HEADING: &str = "- **Bug Fixes**:";

/// Combined debug and complexity review of one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Path (or label) of the reviewed source
    pub file_path: String,
    /// Language the source was parsed as
    pub language: Language,
    /// Static debugger findings
    pub debug: DebugReport,
    /// Complexity estimate
    pub complexity: ComplexityReport,
    /// Suggestions distilled from both reports
    pub suggestions: ReviewSuggestions,
    /// `suggestions` rendered within the configured word budget
    pub rendered_suggestions: String,
}

impl ReviewReport {
    /// Most severe debug finding, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.debug.issues.iter().map(|issue| issue.severity).max()
    }
}

/// Actionable suggestions split the way a mentor would phrase them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSuggestions {
    /// Performance and readability improvements
    pub optimizations: Vec<String>,
    /// Fixes for errors and logic problems
    pub bug_fixes: Vec<String>,
}

impl ReviewSuggestions {
    /// Distil suggestions from a debug report and a complexity estimate.
    pub fn from_reports(debug: &DebugReport, complexity: &ComplexityReport) -> Self {
        let mut optimizations = Vec::new();
        for suggestion in &complexity.optimization_suggestions {
            push_unique(
                &mut optimizations,
                format!("{}. {}.", suggestion.description, suggestion.impact),
            );
        }

        let mut bug_fixes = Vec::new();
        for issue in &debug.issues {
            push_unique(
                &mut bug_fixes,
                format!(
                    "Line {}: {}. {}.",
                    issue.line,
                    issue.description.trim_end_matches('.'),
                    issue.suggestion.trim_end_matches('.')
                ),
            );
        }

        Self {
            optimizations,
            bug_fixes,
        }
    }

    /// Whether there is nothing to suggest
    pub fn is_empty(&self) -> bool {
        self.optimizations.is_empty() && self.bug_fixes.is_empty()
    }

    /// Render both headings, keeping the total under `max_words` words.
    ///
    /// Words past the budget are dropped and the cut line ends in `...`;
    /// lines after the cut are omitted.
    pub fn render(&self, max_words: usize) -> String {
        let optimizations = if self.optimizations.is_empty() {
            "None identified.".to_string()
        } else {
            self.optimizations.join(" ")
        };
        let bug_fixes = if self.bug_fixes.is_empty() {
            "No issues found.".to_string()
        } else {
            self.bug_fixes.join(" ")
        };

        let lines = [
            format!("{OPTIMIZATION_HEADING} {optimizations}"),
            format!("{BUG_FIX_HEADING} {bug_fixes}"),
        ];
        truncate_words(&lines, max_words)
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn truncate_words(lines: &[String], max_words: usize) -> String {
    let mut budget = max_words;
    let mut rendered = Vec::with_capacity(lines.len());

    for line in lines {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() <= budget {
            budget -= words.len();
            rendered.push(words.join(" "));
            continue;
        }
        if budget > 0 {
            rendered.push(format!("{}...", words[..budget].join(" ")));
        }
        break;
    }

    rendered.join("\n")
}

/// A path that could not be reviewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Aggregate counts for a multi-file review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub files_reviewed: usize,
    pub files_skipped: usize,
    pub total_issues: usize,
    pub high_severity: usize,
    pub medium_severity: usize,
    pub low_severity: usize,
    /// Largest time complexity across reviewed files
    pub worst_time_complexity: Option<String>,
    /// File that owns `worst_time_complexity`
    pub worst_file: Option<String>,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// Aggregate per-file reports
    pub fn from_reports(files: &[ReviewReport], skipped: usize, elapsed: Duration) -> Self {
        let count = |severity: Severity| -> usize {
            files.iter().map(|file| file.debug.count_of(severity)).sum()
        };

        let mut worst: Option<(ComplexityClass, &ReviewReport)> = None;
        for file in files {
            let Ok(class) = file.complexity.time_complexity.overall.parse::<ComplexityClass>() else {
                continue;
            };
            if worst.as_ref().map_or(true, |(best, _)| class > *best) {
                worst = Some((class, file));
            }
        }

        Self {
            files_reviewed: files.len(),
            files_skipped: skipped,
            total_issues: files.iter().map(|file| file.debug.issues.len()).sum(),
            high_severity: count(Severity::High),
            medium_severity: count(Severity::Medium),
            low_severity: count(Severity::Low),
            worst_time_complexity: worst.map(|(class, _)| class.to_string()),
            worst_file: worst.map(|(_, file)| file.file_path.clone()),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Review results for a set of paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub files: Vec<ReviewReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Most severe debug finding across all files
    pub fn max_severity(&self) -> Option<Severity> {
        self.files.iter().filter_map(ReviewReport::max_severity).max()
    }
}
