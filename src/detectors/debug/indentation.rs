//! Block-indentation check for Python sources.
//!
//! tree-sitter recovers from bad indentation silently (or with a vague
//! `ERROR` node), so indentation is checked on the text instead. Physical
//! lines are folded into logical lines first: bracketed expressions,
//! triple-quoted strings and backslash continuations never open a block.

use super::types::{DebugIssue, Fix, IssueType, Severity};

const TAB_STOP: usize = 8;

/// A statement's first physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    /// 1-based line number
    pub line: usize,
    /// Indentation in columns
    pub indent: usize,
    /// Whether the statement ends with `:` and opens a block
    pub opens_block: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenString {
    quote: char,
    triple: bool,
}

#[derive(Debug, Default)]
struct Scanner {
    bracket_depth: usize,
    string: Option<OpenString>,
    continuation: bool,
}

impl Scanner {
    fn at_statement_start(&self) -> bool {
        self.bracket_depth == 0 && self.string.is_none() && !self.continuation
    }

    /// Scan one physical line and return the last significant character.
    fn scan(&mut self, line: &str) -> Option<char> {
        let chars: Vec<char> = line.chars().collect();
        let mut last = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if let Some(open) = self.string {
                if c == '\\' {
                    i += 2;
                    continue;
                }
                if c == open.quote {
                    if !open.triple {
                        self.string = None;
                        last = Some(c);
                    } else if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                        self.string = None;
                        last = Some(c);
                        i += 3;
                        continue;
                    }
                }
                i += 1;
                continue;
            }

            match c {
                '#' => break,
                '"' | '\'' => {
                    let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                    self.string = Some(OpenString { quote: c, triple });
                    last = Some(c);
                    i += if triple { 3 } else { 1 };
                    continue;
                }
                '(' | '[' | '{' => self.bracket_depth += 1,
                ')' | ']' | '}' => self.bracket_depth = self.bracket_depth.saturating_sub(1),
                _ => {}
            }
            if !c.is_whitespace() {
                last = Some(c);
            }
            i += 1;
        }

        // Single-quoted strings never span lines; the parser reports those.
        if self.string.is_some_and(|open| !open.triple) {
            self.string = None;
        }
        self.continuation = self.string.is_none() && last == Some('\\');
        last
    }
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .fold(0, |col, c| {
            if c == '\t' {
                (col / TAB_STOP + 1) * TAB_STOP
            } else {
                col + 1
            }
        })
}

/// Fold physical lines into logical statements.
pub(crate) fn logical_lines(source: &str) -> Vec<LogicalLine> {
    let mut scanner = Scanner::default();
    let mut lines: Vec<LogicalLine> = Vec::new();

    for (index, raw) in source.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if scanner.at_statement_start() {
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            lines.push(LogicalLine {
                line: index + 1,
                indent: indent_width(raw),
                opens_block: false,
            });
        }

        let last = scanner.scan(raw);
        if scanner.at_statement_start() {
            if let Some(current) = lines.last_mut() {
                current.opens_block = last == Some(':');
            }
        }
    }

    lines
}

/// Report block-structure indentation errors with re-indent fixes.
pub fn check(source: &str, indent_step: usize) -> Vec<DebugIssue> {
    let mut issues = Vec::new();
    let mut stack = vec![0usize];
    let mut previous: Option<LogicalLine> = None;
    let suggestion = format!("Check indentation level. Use {indent_step} spaces for each level.");

    for mut current in logical_lines(source) {
        match previous.as_ref() {
            Some(opener) if opener.opens_block => {
                if current.indent <= opener.indent {
                    let repaired = opener.indent + indent_step;
                    issues.push(
                        DebugIssue::new(
                            current.line,
                            IssueType::IndentationError,
                            format!("expected an indented block after line {}", opener.line),
                            suggestion.as_str(),
                            Severity::High,
                        )
                        .with_fix(Fix::Reindent { indent: repaired }),
                    );
                    current.indent = repaired;
                }
                stack.push(current.indent);
            }
            _ => {
                let top = stack.last().copied().unwrap_or(0);
                if current.indent > top {
                    issues.push(
                        DebugIssue::new(
                            current.line,
                            IssueType::IndentationError,
                            "unexpected indent",
                            suggestion.as_str(),
                            Severity::High,
                        )
                        .with_fix(Fix::Reindent { indent: top }),
                    );
                    current.indent = top;
                } else if current.indent < top {
                    while stack.len() > 1 && stack.last().is_some_and(|level| *level > current.indent) {
                        stack.pop();
                    }
                    let outer = stack.last().copied().unwrap_or(0);
                    if outer != current.indent {
                        issues.push(
                            DebugIssue::new(
                                current.line,
                                IssueType::IndentationError,
                                "unindent does not match any outer indentation level",
                                suggestion.as_str(),
                                Severity::High,
                            )
                            .with_fix(Fix::Reindent { indent: outer }),
                        );
                        current.indent = outer;
                    }
                }
            }
        }
        previous = Some(current);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_lines_fold_brackets_and_strings() {
        let source = "x = [\n    1,\n  2]\ns = \"\"\"\n  text:\n\"\"\"\nif x:\n    pass\n";
        let lines = logical_lines(source);
        let numbers: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![1, 4, 7, 8]);
        assert!(!lines[1].opens_block);
        assert!(lines[2].opens_block);
    }

    #[test]
    fn test_comments_and_colons_in_strings_do_not_open_blocks() {
        let lines = logical_lines("x = 'a:'\ny = 1  # note:\nz = {'k': 1}\n");
        assert!(lines.iter().all(|l| !l.opens_block));
    }

    #[test]
    fn test_backslash_continuation() {
        let lines = logical_lines("total = 1 + \\\n        2\nprint(total)\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn test_tabs_expand_to_next_stop() {
        assert_eq!(indent_width("\tx"), 8);
        assert_eq!(indent_width("  \tx"), 8);
        assert_eq!(indent_width("    x"), 4);
    }

    #[test]
    fn test_well_formed_source_is_clean() {
        let source = "def f(x):\n    if x:\n        return 1\n    return 2\n\nprint(f(1))\n";
        assert!(check(source, 4).is_empty());
    }

    #[test]
    fn test_expected_indented_block() {
        let issues = check("def f():\nreturn 1\n", 4);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert!(issues[0].description.starts_with("expected an indented block"));
        assert_eq!(issues[0].fix, Some(Fix::Reindent { indent: 4 }));
    }

    #[test]
    fn test_unexpected_indent() {
        let issues = check("x = 1\n    y = 2\n", 4);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].description, "unexpected indent");
        assert_eq!(issues[0].fix, Some(Fix::Reindent { indent: 0 }));
    }

    #[test]
    fn test_unindent_mismatch() {
        let source = "def f():\n    if True:\n        a = 1\n      b = 2\n";
        let issues = check(source, 4);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 4);
        assert_eq!(
            issues[0].description,
            "unindent does not match any outer indentation level"
        );
        assert_eq!(issues[0].fix, Some(Fix::Reindent { indent: 4 }));
        assert_eq!(issues[0].severity, Severity::High);
    }
}
