//! Applies the mechanical fixes attached to debug issues.

use std::collections::BTreeMap;

use super::types::{DebugIssue, Fix};

/// Return `source` with every attached fix applied.
///
/// Splices on a line are applied right to left so their columns stay valid,
/// then the line is re-indented. Lines without fixes are left untouched.
pub fn apply_fixes(source: &str, issues: &[DebugIssue]) -> String {
    let mut per_line: BTreeMap<usize, Vec<&Fix>> = BTreeMap::new();
    for issue in issues {
        if let Some(fix) = &issue.fix {
            per_line.entry(issue.line).or_default().push(fix);
        }
    }
    if per_line.is_empty() {
        return source.to_string();
    }

    let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    for (line, fixes) in per_line {
        let Some(text) = line.checked_sub(1).and_then(|index| lines.get_mut(index)) else {
            continue;
        };
        *text = fix_line(text, &fixes);
    }
    lines.join("\n")
}

fn fix_line(line: &str, fixes: &[&Fix]) -> String {
    let mut splices: Vec<(usize, usize, &str)> = fixes
        .iter()
        .filter_map(|fix| match fix {
            Fix::Splice {
                start,
                end,
                replacement,
            } => Some((*start, *end, replacement.as_str())),
            Fix::Reindent { .. } => None,
        })
        .collect();
    splices.sort_by(|a, b| b.0.cmp(&a.0));

    let mut text = line.to_string();
    for (start, end, replacement) in splices {
        let valid = start <= end
            && end <= text.len()
            && text.is_char_boundary(start)
            && text.is_char_boundary(end);
        if valid {
            text.replace_range(start..end, replacement);
        }
    }

    let indent = fixes.iter().rev().find_map(|fix| match fix {
        Fix::Reindent { indent } => Some(*indent),
        Fix::Splice { .. } => None,
    });
    if let Some(indent) = indent {
        let body = text.trim_start_matches([' ', '\t']);
        text = format!("{}{}", " ".repeat(indent), body);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::debug::types::{IssueType, Severity};

    fn issue(line: usize, fix: Fix) -> DebugIssue {
        DebugIssue::new(line, IssueType::LogicError, "d", "s", Severity::Low).with_fix(fix)
    }

    #[test]
    fn test_no_fixes_returns_source() {
        let source = "x = 1\n";
        assert_eq!(apply_fixes(source, &[]), source);
    }

    #[test]
    fn test_splices_apply_right_to_left() {
        let source = "if a is 1 and b is not 2:\n    pass\n";
        let issues = vec![
            issue(1, Fix::Splice { start: 5, end: 7, replacement: "==".into() }),
            issue(1, Fix::Splice { start: 16, end: 22, replacement: "!=".into() }),
        ];
        assert_eq!(
            apply_fixes(source, &issues),
            "if a == 1 and b != 2:\n    pass\n"
        );
    }

    #[test]
    fn test_reindent_preserves_trailing_newline() {
        let source = "def f():\nreturn 1\n";
        let issues = vec![issue(2, Fix::Reindent { indent: 4 })];
        assert_eq!(apply_fixes(source, &issues), "def f():\n    return 1\n");
    }

    #[test]
    fn test_out_of_range_fixes_are_ignored() {
        let source = "x\n";
        let issues = vec![
            issue(9, Fix::Reindent { indent: 4 }),
            issue(1, Fix::Splice { start: 3, end: 8, replacement: "y".into() }),
        ];
        assert_eq!(apply_fixes(source, &issues), source);
    }
}
