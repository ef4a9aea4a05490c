use super::*;
use crate::core::ast_service::AstService;

fn debug_with(config: DebugConfig, source: &str, language: Language) -> DebugReport {
    let service = AstService::new();
    let tree = service
        .parse("snippet", source, language)
        .expect("parse snippet");
    let context = service.create_context(&tree, "snippet");
    StaticDebugger::new(config).debug(&context)
}

fn debug_source(source: &str, language: Language) -> DebugReport {
    debug_with(DebugConfig::default(), source, language)
}

fn of_type(report: &DebugReport, issue_type: IssueType) -> Vec<&DebugIssue> {
    report
        .issues
        .iter()
        .filter(|issue| issue.issue_type == issue_type)
        .collect()
}

#[test]
fn clean_python_has_no_issues() {
    let source = "def add(a, b):\n    total = a + b\n    return total\n\nprint(add(1, 2))\n";
    let report = debug_source(source, Language::Python);
    assert!(report.issues.is_empty(), "unexpected: {:?}", report.issues);
    assert_eq!(report.summary, "No issues found in the code.");
    assert_eq!(report.fixed_code, source);
}

#[test]
fn literal_is_comparison_is_flagged_and_fixed() {
    let source = "x = 5\nif x is 5:\n    print(x)\n";
    let report = debug_source(source, Language::Python);
    let logic = of_type(&report, IssueType::LogicError);
    assert_eq!(logic.len(), 1);
    assert_eq!(logic[0].line, 2);
    assert_eq!(logic[0].severity, Severity::Medium);
    assert_eq!(logic[0].description, "Using 'is' for literal comparison");
    assert_eq!(report.fixed_code, "x = 5\nif x == 5:\n    print(x)\n");
    assert_eq!(
        report.summary,
        "Found 1 issue(s):\n- 0 high severity\n- 1 medium severity\n- 0 low severity\n"
    );
}

#[test]
fn literal_is_not_becomes_not_equal() {
    let source = "name = 'a'\nif name is not 'b':\n    print(name)\n";
    let report = debug_source(source, Language::Python);
    assert_eq!(of_type(&report, IssueType::LogicError).len(), 1);
    assert_eq!(
        report.fixed_code,
        "name = 'a'\nif name != 'b':\n    print(name)\n"
    );
}

#[test]
fn literal_is_not_with_extra_spacing_stays_negated() {
    let source = "x = 5\nif x is  not 5:\n    pass\n";
    let report = debug_source(source, Language::Python);
    assert_eq!(of_type(&report, IssueType::LogicError).len(), 1);
    assert_eq!(report.fixed_code, "x = 5\nif x != 5:\n    pass\n");
}

#[test]
fn identity_against_none_is_fine() {
    let report = debug_source("x = f()\nif x is None:\n    print(x)\n", Language::Python);
    assert!(of_type(&report, IssueType::LogicError).is_empty());
}

#[test]
fn while_true_without_break_is_flagged() {
    let report = debug_source("while True:\n    print('hi')\n", Language::Python);
    let logic = of_type(&report, IssueType::LogicError);
    assert_eq!(logic.len(), 1);
    assert_eq!(logic[0].line, 1);
    assert_eq!(logic[0].severity, Severity::High);
    assert_eq!(logic[0].description, "Potential infinite loop detected");
}

#[test]
fn while_true_with_break_or_return_is_fine() {
    let with_break = debug_source("while True:\n    if done():\n        break\n", Language::Python);
    assert!(of_type(&with_break, IssueType::LogicError).is_empty());

    let with_return = debug_source(
        "def poll():\n    while True:\n        return 1\n",
        Language::Python,
    );
    assert!(of_type(&with_return, IssueType::LogicError).is_empty());
}

#[test]
fn break_in_inner_loop_does_not_count() {
    let source = "while True:\n    for i in range(3):\n        break\n";
    let report = debug_source(source, Language::Python);
    assert_eq!(of_type(&report, IssueType::LogicError).len(), 1);
}

#[test]
fn bare_except_is_flagged_and_fixed() {
    let source = "try:\n    run()\nexcept:\n    pass\n";
    let report = debug_source(source, Language::Python);
    let style = of_type(&report, IssueType::StyleError);
    assert_eq!(style.len(), 1);
    assert_eq!(style[0].line, 3);
    assert_eq!(
        report.fixed_code,
        "try:\n    run()\nexcept Exception:\n    pass\n"
    );

    let typed = debug_source(
        "try:\n    run()\nexcept ValueError:\n    pass\n",
        Language::Python,
    );
    assert!(of_type(&typed, IssueType::StyleError).is_empty());
}

#[test]
fn unused_variables_report_last_binding() {
    let source = "def f():\n    unused = 1\n    used = 2\n    _scratch = 3\n    return used\n\nx = 1\nx = 2\n";
    let report = debug_source(source, Language::Python);
    let warnings = of_type(&report, IssueType::StyleWarning);
    let described: Vec<(&str, usize)> = warnings
        .iter()
        .map(|issue| (issue.description.as_str(), issue.line))
        .collect();
    assert_eq!(
        described,
        vec![("Unused variable 'unused'", 2), ("Unused variable 'x'", 8)]
    );
    assert!(warnings.iter().all(|issue| issue.severity == Severity::Low));
}

#[test]
fn tuple_targets_are_bindings() {
    let report = debug_source("a, b = pair()\nprint(a)\n", Language::Python);
    let warnings = of_type(&report, IssueType::StyleWarning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].description, "Unused variable 'b'");
}

#[test]
fn syntax_error_is_reported_and_suppresses_unused_check() {
    let report = debug_source("value = 1\nprint('hello'\n", Language::Python);
    let syntax = of_type(&report, IssueType::SyntaxError);
    assert!(!syntax.is_empty());
    assert!(syntax.iter().all(|issue| issue.severity == Severity::High));
    assert!(of_type(&report, IssueType::StyleWarning).is_empty());
}

#[test]
fn missing_block_indentation_is_fixed() {
    let report = debug_source("def f():\nreturn 1\n", Language::Python);
    let indentation = of_type(&report, IssueType::IndentationError);
    assert_eq!(indentation.len(), 1);
    assert_eq!(indentation[0].line, 2);
    assert!(of_type(&report, IssueType::SyntaxError)
        .iter()
        .all(|issue| issue.line != 2));
    assert_eq!(report.fixed_code, "def f():\n    return 1\n");
}

#[test]
fn javascript_rules() {
    let endless = debug_source("while (true) {\n  console.log(1);\n}\n", Language::JavaScript);
    assert_eq!(of_type(&endless, IssueType::LogicError).len(), 1);

    let guarded = debug_source(
        "let x = 0;\nfor (;;) {\n  if (x > 3) break;\n  x += 1;\n}\n",
        Language::JavaScript,
    );
    assert!(of_type(&guarded, IssueType::LogicError).is_empty());

    let unused = debug_source(
        "const a = 1;\nconst b = 2;\nconsole.log(a);\n",
        Language::JavaScript,
    );
    let warnings = of_type(&unused, IssueType::StyleWarning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, 2);
}

#[test]
fn javascript_reassignment_is_not_a_read() {
    let report = debug_source("let x = 1;\nx = 2;\n", Language::JavaScript);
    let warnings = of_type(&report, IssueType::StyleWarning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].description, "Unused variable 'x'");
    assert_eq!(warnings[0].line, 2);

    let report = debug_source("let n = 0;\nn += 1;\n", Language::JavaScript);
    assert_eq!(of_type(&report, IssueType::StyleWarning).len(), 1);

    let report = debug_source("let y = 1;\ny = y + 1;\nconsole.log(y);\n", Language::JavaScript);
    assert!(of_type(&report, IssueType::StyleWarning).is_empty());
}

#[test]
fn rust_rules() {
    let endless = debug_source(
        "fn main() {\n    loop {\n        println!(\"x\");\n    }\n}\n",
        Language::Rust,
    );
    assert_eq!(of_type(&endless, IssueType::LogicError).len(), 1);

    let labeled = debug_source(
        "fn main() {\n    'outer: loop {\n        for i in 0..3 {\n            if i == 2 {\n                break 'outer;\n            }\n        }\n    }\n}\n",
        Language::Rust,
    );
    assert!(of_type(&labeled, IssueType::LogicError).is_empty());

    let inline_format = debug_source(
        "fn main() {\n    let total = 3;\n    println!(\"{total}\");\n}\n",
        Language::Rust,
    );
    assert!(of_type(&inline_format, IssueType::StyleWarning).is_empty());
}

#[test]
fn disabled_checks_and_auto_fix() {
    let source = "x = 5\nif x is 5:\n    pass\n";
    let config = DebugConfig {
        auto_fix: false,
        ..DebugConfig::default()
    };
    let report = debug_with(config, source, Language::Python);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.fixed_code, source);

    let config = DebugConfig {
        check_patterns: false,
        ..DebugConfig::default()
    };
    let report = debug_with(config, source, Language::Python);
    assert!(report.issues.is_empty());
}

#[test]
fn summary_counts_every_severity() {
    let issues = vec![
        DebugIssue::new(1, IssueType::SyntaxError, "a", "b", Severity::High),
        DebugIssue::new(2, IssueType::StyleWarning, "a", "b", Severity::Low),
        DebugIssue::new(3, IssueType::StyleWarning, "a", "b", Severity::Low),
    ];
    assert_eq!(
        summarize(&issues),
        "Found 3 issue(s):\n- 1 high severity\n- 0 medium severity\n- 2 low severity\n"
    );
}
