use super::*;
use crate::core::ast_service::AstService;
use crate::lang::registry::Language;
use proptest::prelude::*;

fn estimate_with(config: ComplexityConfig, source: &str, language: Language) -> ComplexityReport {
    let service = AstService::new();
    let tree = service
        .parse("snippet", source, language)
        .expect("parse snippet");
    let context = service.create_context(&tree, "snippet");
    ComplexityEstimator::new(config).estimate(&context)
}

fn estimate(source: &str, language: Language) -> ComplexityReport {
    estimate_with(ComplexityConfig::default(), source, language)
}

fn section<'r>(report: &'r ComplexityReport, name: &str) -> &'r SectionAnalysis {
    report
        .sections
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no section {name} in {:?}", report.sections))
}

#[test]
fn straight_line_function_is_constant() {
    let report = estimate("def add(a, b):\n    return a + b\n", Language::Python);
    assert_eq!(report.time_complexity.overall, "O(1)");
    assert_eq!(report.space_complexity.overall, "O(1)");
    assert_eq!(report.sections.len(), 1);
    assert_eq!(section(&report, "add").metrics.parameters, 2);
    assert!(report.optimization_suggestions.is_empty());
}

#[test]
fn single_loop_is_linear() {
    let source = "def total(items):\n    s = 0\n    for x in items:\n        s += x\n    return s\n";
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(n)");
    assert_eq!(report.space_complexity.overall, "O(1)");
    let total = section(&report, "total");
    assert_eq!(total.metrics.loops, 1);
    assert_eq!(total.metrics.assignments, 2);
    assert!(report.time_complexity.breakdown[0]
        .explanation
        .starts_with("Loop at line 3"));
}

#[test]
fn nested_loops_are_quadratic_and_suggested() {
    let source = "def pairs(items):\n    out = []\n    for a in items:\n        for b in items:\n            out.append((a, b))\n    return out\n";
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(n^2)");
    assert_eq!(report.space_complexity.overall, "O(n^2)");
    assert_eq!(section(&report, "pairs").metrics.max_loop_depth, 2);
    assert!(report
        .optimization_suggestions
        .iter()
        .any(|s| s.description.contains("nests loops 2 deep")));
}

#[test]
fn constant_bound_loop_is_constant() {
    let source = "def show(items):\n    for i in range(10):\n        print(i)\n";
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(1)");
}

#[test]
fn halving_loop_is_logarithmic() {
    let source = "def halve(n):\n    while n > 1:\n        n //= 2\n    return n\n";
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(log n)");
}

#[test]
fn multiplicative_accumulators_keep_loops_linear() {
    let factorial = "def fact(n):\n    result = 1\n    while n > 0:\n        result *= n\n        n -= 1\n    return result\n";
    assert_eq!(estimate(factorial, Language::Python).time_complexity.overall, "O(n)");

    let doubling = "def powers(n):\n    p = 1\n    i = 0\n    while i < n:\n        p = p * 2\n        i += 1\n    return p\n";
    assert_eq!(estimate(doubling, Language::Python).time_complexity.overall, "O(n)");

    let product = "function product(xs) {\n  let p = 1;\n  for (let i = 0; i < xs.length; i++) {\n    p *= xs[i];\n  }\n  return p;\n}\n";
    assert_eq!(estimate(product, Language::JavaScript).time_complexity.overall, "O(n)");
}

#[test]
fn doubling_loop_counter_is_logarithmic() {
    let source = "function steps(n) {\n  let count = 0;\n  for (let i = 1; i < n; i *= 2) {\n    count++;\n  }\n  return count;\n}\n";
    assert_eq!(estimate(source, Language::JavaScript).time_complexity.overall, "O(log n)");

    let source = "def steps(n):\n    i = 1\n    while i < n:\n        i = i * 2\n    return i\n";
    assert_eq!(estimate(source, Language::Python).time_complexity.overall, "O(log n)");
}

#[test]
fn iterative_binary_search_is_logarithmic() {
    let source = r#"
def search(a, t):
    lo, hi = 0, len(a) - 1
    while lo <= hi:
        mid = (lo + hi) // 2
        if a[mid] == t:
            return mid
        elif a[mid] < t:
            lo = mid + 1
        else:
            hi = mid - 1
    return -1
"#;
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(log n)");
}

#[test]
fn recursive_binary_search_is_logarithmic() {
    let source = r#"
def bs(a, t, lo, hi):
    if lo > hi:
        return -1
    mid = (lo + hi) // 2
    if a[mid] == t:
        return mid
    if a[mid] < t:
        return bs(a, t, mid + 1, hi)
    return bs(a, t, lo, mid - 1)
"#;
    let report = estimate(source, Language::Python);
    let bs = section(&report, "bs");
    assert_eq!(bs.recursion, RecursionShape::Divide { calls: 1 });
    assert_eq!(bs.time, ComplexityClass::LOGARITHMIC);
    assert_eq!(bs.space, ComplexityClass::LOGARITHMIC);
}

#[test]
fn naive_fibonacci_is_exponential() {
    let source = "def fib(n):\n    if n <= 1:\n        return n\n    return fib(n - 1) + fib(n - 2)\n";
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(2^n)");
    assert_eq!(report.space_complexity.overall, "O(n)");
    let fib = section(&report, "fib");
    assert_eq!(fib.recursion, RecursionShape::Branching { calls: 2 });
    assert_eq!(fib.metrics.recursive_calls, 2);
    let first = &report.optimization_suggestions[0];
    assert!(first.description.contains("lru_cache"));
}

#[test]
fn memoized_fibonacci_is_linear() {
    let decorated = r#"
from functools import lru_cache

@lru_cache(maxsize=None)
def fib(n):
    if n <= 1:
        return n
    return fib(n - 1) + fib(n - 2)
"#;
    let report = estimate(decorated, Language::Python);
    assert_eq!(section(&report, "fib").recursion, RecursionShape::Memoized);
    assert_eq!(report.time_complexity.overall, "O(n)");

    let guarded = r#"
def fib(n, memo={}):
    if n in memo:
        return memo[n]
    if n <= 1:
        return n
    memo[n] = fib(n - 1, memo) + fib(n - 2, memo)
    return memo[n]
"#;
    let report = estimate(guarded, Language::Python);
    assert_eq!(section(&report, "fib").recursion, RecursionShape::Memoized);
    assert_eq!(report.time_complexity.overall, "O(n)");
}

#[test]
fn memoization_detection_can_be_disabled() {
    let source = "def fib(n, memo={}):\n    if n in memo:\n        return memo[n]\n    if n <= 1:\n        return n\n    memo[n] = fib(n - 1, memo) + fib(n - 2, memo)\n    return memo[n]\n";
    let config = ComplexityConfig {
        detect_memoization: false,
        ..ComplexityConfig::default()
    };
    let report = estimate_with(config, source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(2^n)");
}

#[test]
fn merge_sort_is_linearithmic() {
    let source = r#"
def merge_sort(arr):
    if len(arr) <= 1:
        return arr
    mid = len(arr) // 2
    left = merge_sort(arr[:mid])
    right = merge_sort(arr[mid:])
    return merge(left, right)

def merge(left, right):
    result = []
    i = j = 0
    while i < len(left) and j < len(right):
        if left[i] <= right[j]:
            result.append(left[i])
            i += 1
        else:
            result.append(right[j])
            j += 1
    result.extend(left[i:])
    result.extend(right[j:])
    return result
"#;
    let report = estimate(source, Language::Python);
    assert_eq!(section(&report, "merge").time, ComplexityClass::LINEAR);
    let sort = section(&report, "merge_sort");
    assert_eq!(sort.recursion, RecursionShape::Divide { calls: 2 });
    assert_eq!(sort.time, ComplexityClass::LINEARITHMIC);
    assert_eq!(report.time_complexity.overall, "O(n log n)");
    assert_eq!(report.space_complexity.overall, "O(n)");
}

#[test]
fn permutations_are_factorial() {
    let source = r#"
def permute(items):
    if len(items) <= 1:
        return [items]
    result = []
    for i in range(len(items)):
        rest = items[:i] + items[i + 1:]
        for p in permute(rest):
            result.append([items[i]] + p)
    return result
"#;
    let report = estimate(source, Language::Python);
    assert_eq!(section(&report, "permute").recursion, RecursionShape::Permutation);
    assert_eq!(report.time_complexity.overall, "O(n!)");
    assert!(report.optimization_suggestions[0]
        .description
        .contains("every ordering"));
}

#[test]
fn tree_walk_is_linear() {
    let source = r#"
def depth(node):
    if node is None:
        return 0
    best = 0
    for child in node.children:
        best = max(best, depth(child))
    return best + 1
"#;
    let report = estimate(source, Language::Python);
    let depth = section(&report, "depth");
    assert_eq!(depth.recursion, RecursionShape::Traversal);
    assert_eq!(depth.time, ComplexityClass::LINEAR);
}

#[test]
fn linear_recursion_suggests_iteration() {
    let source = "def count(n):\n    if n == 0:\n        return 0\n    return 1 + count(n - 1)\n";
    let report = estimate(source, Language::Python);
    let count = section(&report, "count");
    assert_eq!(count.recursion, RecursionShape::Linear);
    assert_eq!(count.time, ComplexityClass::LINEAR);
    assert_eq!(count.space, ComplexityClass::LINEAR);
    assert!(report
        .optimization_suggestions
        .iter()
        .any(|s| s.description.contains("iterative loop")));
}

#[test]
fn sort_inside_loop_is_flagged() {
    let source = "def f(groups):\n    out = []\n    for g in groups:\n        out.append(sorted(g))\n    return out\n";
    let report = estimate(source, Language::Python);
    assert_eq!(report.time_complexity.overall, "O(n^2 log n)");
    assert!(section(&report, "f").sort_in_loop);
    assert!(report
        .optimization_suggestions
        .iter()
        .any(|s| s.description.contains("sorts inside a loop")));
}

#[test]
fn calls_to_local_functions_carry_their_cost() {
    let source = r#"
def scan(items):
    for x in items:
        print(x)

def run(groups):
    for g in groups:
        scan(g)
"#;
    let report = estimate(source, Language::Python);
    assert_eq!(section(&report, "scan").time, ComplexityClass::LINEAR);
    assert_eq!(section(&report, "run").time, ComplexityClass::polynomial(2.0));
}

#[test]
fn module_level_code_is_a_section() {
    let report = estimate("data = [1, 2, 3]\nfor x in data:\n    print(x)\n", Language::Python);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.sections[0].name, MODULE_SECTION);
    assert_eq!(report.sections[0].kind, SectionKind::Module);
    assert_eq!(report.time_complexity.overall, "O(n)");
}

#[test]
fn javascript_nested_loops() {
    let source = "function pairs(arr) {\n  let count = 0;\n  for (let i = 0; i < arr.length; i++) {\n    for (let j = 0; j < arr.length; j++) {\n      count++;\n    }\n  }\n  return count;\n}\n";
    let report = estimate(source, Language::JavaScript);
    assert_eq!(report.time_complexity.overall, "O(n^2)");
    assert_eq!(report.language, Some(Language::JavaScript));
}

#[test]
fn rust_loop_over_slice_is_linear() {
    let source = "fn sum(v: &[i32]) -> i32 {\n    let mut total = 0;\n    for x in v {\n        total += x;\n    }\n    total\n}\n";
    let report = estimate(source, Language::Rust);
    assert_eq!(report.time_complexity.overall, "O(n)");
    assert_eq!(section(&report, "sum").metrics.parameters, 1);
}

#[test]
fn empty_source_fails_gracefully() {
    let report = estimate("   \n", Language::Python);
    assert!(report.is_failed());
    assert_eq!(report.time_complexity.overall, "N/A");
    assert_eq!(report.space_complexity.explanation, "Analysis failed");
}

#[test]
fn suggestions_are_capped() {
    let source = "def f(groups):\n    out = []\n    for g in groups:\n        for h in groups:\n            out.append(sorted(g))\n    return out\n";
    let config = ComplexityConfig {
        max_suggestions: 1,
        ..ComplexityConfig::default()
    };
    let report = estimate_with(config, source, Language::Python);
    assert_eq!(report.optimization_suggestions.len(), 1);
}

#[test]
fn report_serializes_with_expected_shape() {
    let report = estimate("def f(xs):\n    return sorted(xs)\n", Language::Python);
    let value = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(value["time_complexity"]["overall"], "O(n log n)");
    assert!(value["time_complexity"]["breakdown"].is_array());
    assert!(value["space_complexity"]["explanation"].is_string());
    assert!(value["optimization_suggestions"].is_array());
    assert!(value["summary"]
        .as_str()
        .is_some_and(|s| s.starts_with("Estimated time complexity O(n log n)")));
}

#[test]
fn syntax_errors_are_noted_in_summary() {
    let report = estimate("def f(xs:\n    return xs\n", Language::Python);
    assert!(report.summary.contains("may be incomplete") || report.is_failed());
}

#[test]
fn class_display_and_parse() {
    let cases = [
        (ComplexityClass::CONSTANT, "O(1)"),
        (ComplexityClass::LOGARITHMIC, "O(log n)"),
        (ComplexityClass::LINEAR, "O(n)"),
        (ComplexityClass::LINEARITHMIC, "O(n log n)"),
        (ComplexityClass::polynomial(2.0), "O(n^2)"),
        (
            ComplexityClass::Polynomial {
                degree: 2.0,
                log_power: 1,
            },
            "O(n^2 log n)",
        ),
        (ComplexityClass::Exponential { base: 2 }, "O(2^n)"),
        (ComplexityClass::Factorial, "O(n!)"),
    ];
    for (class, text) in cases {
        assert_eq!(class.to_string(), text);
        assert_eq!(text.parse::<ComplexityClass>().expect("parse"), class);
    }
    assert!("O(n".parse::<ComplexityClass>().is_err());
    assert!("linear".parse::<ComplexityClass>().is_err());
}

#[test]
fn class_ordering_follows_growth() {
    let ladder = [
        ComplexityClass::CONSTANT,
        ComplexityClass::LOGARITHMIC,
        ComplexityClass::LINEAR,
        ComplexityClass::LINEARITHMIC,
        ComplexityClass::polynomial(2.0),
        ComplexityClass::Exponential { base: 2 },
        ComplexityClass::Exponential { base: 3 },
        ComplexityClass::Factorial,
    ];
    for pair in ladder.windows(2) {
        assert!(pair[0] < pair[1], "{} should be below {}", pair[0], pair[1]);
    }
}

fn polynomial_class() -> impl Strategy<Value = ComplexityClass> {
    (0u32..4, 0u32..3).prop_map(|(degree, log_power)| ComplexityClass::Polynomial {
        degree: f64::from(degree),
        log_power,
    })
}

proptest! {
    #[test]
    fn multiply_dominates_both_factors(a in polynomial_class(), b in polynomial_class()) {
        let product = a.multiply(b);
        prop_assert!(product >= a);
        prop_assert!(product >= b);
        prop_assert_eq!(product, b.multiply(a));
    }

    #[test]
    fn max_is_commutative_and_an_upper_bound(a in polynomial_class(), b in polynomial_class()) {
        let top = a.max(b);
        prop_assert!(top >= a && top >= b);
        prop_assert_eq!(top.to_string(), b.max(a).to_string());
    }

    #[test]
    fn constant_is_the_multiplicative_identity(a in polynomial_class()) {
        prop_assert_eq!(a.multiply(ComplexityClass::CONSTANT), a);
    }
}
