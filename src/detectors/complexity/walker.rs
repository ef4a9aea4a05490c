//! Per-section cost walk.
//!
//! Every named function is a section, and so is the module's top level.
//! Sequential code composes by `max`, loops multiply their body by an
//! iteration factor, and calls to other functions in the same file cost
//! whatever that function was estimated to cost. Section results are
//! memoized; a call cycle is cut by charging `O(1)` for the back edge.

use std::collections::{HashMap, HashSet};

use tree_sitter::Node;

use super::recursion::{self, RecursionInfo};
use super::types::{
    ComplexityClass, ComplexityConfig, RecursionShape, SectionAnalysis, SectionKind,
    SectionMetrics,
};
use crate::core::ast_service::AstContext;
use crate::lang::common::{find_descendant, has_operator, named_children, walk_tree, SourceLocation};

/// Label of the top-level section
pub const MODULE_SECTION: &str = "<module>";

/// Fields holding a loop's iteration source, evaluated once per loop.
const ITERABLE_FIELDS: &[&str] = &["right", "value"];

/// Operators that grow a counter geometrically when assigned back.
const GROWTH_OPERATORS: &[&str] = &["*", "<<"];

/// Loop header clauses whose identifiers count as the loop's counters.
const COUNTER_FIELDS: &[&str] = &["condition", "increment"];

/// Member-access callee kinds, marking method calls.
const MEMBER_ACCESS_KINDS: &[&str] = &["attribute", "member_expression", "field_expression"];

/// Literal collection kinds that `*` repeats into an allocation.
const REPEATABLE_LITERALS: &[&str] = &["list"];

/// A named function found in the source
#[derive(Debug, Clone)]
pub struct FunctionInfo<'a> {
    pub name: String,
    pub node: Node<'a>,
    pub parameters: Vec<String>,
    pub parameter_count: usize,
    pub memo_decorated: bool,
}

/// Named functions in document order.
pub fn discover_functions<'a>(context: &AstContext<'a>) -> Vec<FunctionInfo<'a>> {
    let profile = context.profile;
    let mut functions = Vec::new();

    walk_tree(context.tree.root_node(), &mut |node| {
        if !profile.is_function(&node) {
            return;
        }
        let Some(name) = profile.function_name(node, context.source) else {
            return;
        };
        let (parameters, parameter_count) = parameter_names(node, context);
        functions.push(FunctionInfo {
            name,
            node,
            parameters,
            parameter_count,
            memo_decorated: is_memo_decorated(node, context),
        });
    });

    functions
}

fn parameter_names(function: Node<'_>, context: &AstContext<'_>) -> (Vec<String>, usize) {
    if let Some(single) = function.child_by_field_name("parameter") {
        return (vec![context.text(single).to_string()], 1);
    }
    let Some(list) = function.child_by_field_name("parameters") else {
        return (Vec::new(), 0);
    };
    let params: Vec<Node<'_>> = named_children(list)
        .into_iter()
        .filter(|param| param.kind() != "comment")
        .collect();
    let names = params
        .iter()
        .filter_map(|param| parameter_name(*param, context))
        .collect();
    (names, params.len())
}

fn parameter_name(param: Node<'_>, context: &AstContext<'_>) -> Option<String> {
    let identifiers = context.profile.kinds().identifiers;
    if identifiers.contains(&param.kind()) {
        return Some(context.text(param).to_string());
    }
    ["name", "pattern", "left"]
        .iter()
        .filter_map(|field| param.child_by_field_name(field))
        .chain(named_children(param))
        .find(|node| identifiers.contains(&node.kind()))
        .map(|node| context.text(node).to_string())
}

fn is_counter(counters: &[String], name: &str) -> bool {
    counters.iter().any(|counter| counter == name)
}

/// Whether `value` divides or shifts right, as in `(lo + hi) // 2`.
fn has_halving(value: Node<'_>, context: &AstContext<'_>) -> bool {
    let kinds = context.profile.kinds();
    let halving = context.profile.vocabulary().halving_operators;
    find_descendant(
        value,
        &|n| kinds.binary_operators.contains(&n.kind()) && has_operator(*n, context.source, halving),
        &|_| false,
    )
    .is_some()
}

fn is_memo_decorated(function: Node<'_>, context: &AstContext<'_>) -> bool {
    let kinds = context.profile.kinds();
    let decorators = context.profile.vocabulary().memo_decorators;
    let Some(parent) = function.parent() else {
        return false;
    };
    if !kinds.decorated.contains(&parent.kind()) {
        return false;
    }
    named_children(parent)
        .into_iter()
        .filter(|child| child.id() != function.id())
        .any(|decorator| {
            let text = context.text(decorator);
            decorators.iter().any(|name| text.contains(name))
        })
}

/// Estimates every section of one source
pub struct SectionEstimator<'c, 'a> {
    context: &'c AstContext<'a>,
    config: &'c ComplexityConfig,
    functions: Vec<FunctionInfo<'a>>,
    by_name: HashMap<String, usize>,
    results: Vec<Option<SectionAnalysis>>,
    visiting: HashSet<usize>,
}

impl<'c, 'a> SectionEstimator<'c, 'a> {
    pub fn new(context: &'c AstContext<'a>, config: &'c ComplexityConfig) -> Self {
        let functions = discover_functions(context);
        let mut by_name = HashMap::new();
        for (index, function) in functions.iter().enumerate() {
            by_name.entry(function.name.clone()).or_insert(index);
        }
        let results = vec![None; functions.len()];
        Self {
            context,
            config,
            functions,
            by_name,
            results,
            visiting: HashSet::new(),
        }
    }

    /// Function sections in document order, followed by the module section.
    pub fn run(mut self) -> (Vec<SectionAnalysis>, SectionAnalysis) {
        for index in 0..self.functions.len() {
            self.time_of(index);
        }
        let module = self.analyze_module();
        let functions = self.results.into_iter().flatten().collect();
        (functions, module)
    }

    fn time_of(&mut self, index: usize) -> ComplexityClass {
        if let Some(done) = &self.results[index] {
            return done.time;
        }
        if !self.visiting.insert(index) {
            return ComplexityClass::CONSTANT;
        }
        let analysis = self.analyze_function(index);
        self.visiting.remove(&index);
        let time = analysis.time;
        self.results[index] = Some(analysis);
        time
    }

    fn analyze_function(&mut self, index: usize) -> SectionAnalysis {
        let info = self.functions[index].clone();
        let recursion = recursion::classify(
            info.node,
            &info.name,
            &info.parameters,
            info.memo_decorated,
            self.config.detect_memoization,
            self.context,
        );
        let body = info.node.child_by_field_name("body").unwrap_or(info.node);

        let mut walker = CostWalker::new(self, Some(info.name.clone()), info.parameters.clone());
        let body_time = walker.cost(body);
        let mut state = walker.finish();

        let time = recursion::recursive_time(recursion.shape, body_time);
        let stack = recursion::recursive_space(recursion.shape);
        if let Some(reason) = recursion_reason(&recursion, body_time) {
            state.time_reasons.push(reason);
        }
        if !stack.is_constant() {
            state
                .space_reasons
                .push(format!("recursion keeps {stack} frames (or memo entries) alive"));
        }

        state.metrics.recursive_calls = recursion.call_sites;
        state.metrics.parameters = info.parameter_count;

        SectionAnalysis {
            name: info.name,
            kind: SectionKind::Function,
            location: SourceLocation::of(&info.node),
            time,
            space: state.space.max(stack),
            recursion: recursion.shape,
            metrics: state.metrics,
            time_reasons: state.time_reasons,
            space_reasons: state.space_reasons,
            sort_in_loop: state.sort_in_loop,
            scan_in_loop: state.scan_in_loop,
        }
    }

    fn analyze_module(&mut self) -> SectionAnalysis {
        let root = self.context.tree.root_node();
        let mut walker = CostWalker::new(self, None, Vec::new());
        let time = walker.cost(root);
        let state = walker.finish();

        SectionAnalysis {
            name: MODULE_SECTION.to_string(),
            kind: SectionKind::Module,
            location: SourceLocation::of(&root),
            time,
            space: state.space,
            recursion: RecursionShape::None,
            metrics: state.metrics,
            time_reasons: state.time_reasons,
            space_reasons: state.space_reasons,
            sort_in_loop: state.sort_in_loop,
            scan_in_loop: state.scan_in_loop,
        }
    }
}

fn recursion_reason(info: &RecursionInfo, body: ComplexityClass) -> Option<String> {
    let reason = match info.shape {
        RecursionShape::None => return None,
        RecursionShape::Linear => format!(
            "one self-call per invocation shrinking the input by a constant: O(n) calls doing {body} each"
        ),
        RecursionShape::Branching { calls } => format!(
            "{calls} self-calls per invocation with constant shrinkage branch into O({calls}^n) calls"
        ),
        RecursionShape::Divide { calls } => format!(
            "{calls} self-call(s) on a fraction of the input with {body} work per level"
        ),
        RecursionShape::Permutation => {
            "self-call inside a loop over the input explores every ordering".to_string()
        }
        RecursionShape::Traversal => {
            "self-calls fan out over sub-structures, visiting each once".to_string()
        }
        RecursionShape::Memoized => {
            format!("memoized recursion solves each of O(n) subproblems once with {body} work")
        }
    };
    Some(reason)
}

/// What a walk over one section accumulates
#[derive(Debug, Default)]
struct WalkState {
    metrics: SectionMetrics,
    space: ComplexityClass,
    time_reasons: Vec<String>,
    space_reasons: Vec<String>,
    sort_in_loop: bool,
    scan_in_loop: bool,
}

struct CostWalker<'e, 'c, 'a> {
    estimator: &'e mut SectionEstimator<'c, 'a>,
    context: &'c AstContext<'a>,
    self_name: Option<String>,
    parameters: Vec<String>,
    factors: Vec<ComplexityClass>,
    state: WalkState,
}

impl<'e, 'c, 'a> CostWalker<'e, 'c, 'a> {
    fn new(
        estimator: &'e mut SectionEstimator<'c, 'a>,
        self_name: Option<String>,
        parameters: Vec<String>,
    ) -> Self {
        let context = estimator.context;
        Self {
            estimator,
            context,
            self_name,
            parameters,
            factors: Vec::new(),
            state: WalkState::default(),
        }
    }

    fn finish(self) -> WalkState {
        self.state
    }

    fn in_growing_loop(&self) -> bool {
        self.factors.iter().any(|factor| !factor.is_constant())
    }

    fn loop_product(&self) -> ComplexityClass {
        self.factors
            .iter()
            .fold(ComplexityClass::CONSTANT, |acc, factor| acc.multiply(*factor))
    }

    fn push_factor(&mut self, factor: ComplexityClass) {
        self.factors.push(factor);
        self.state.metrics.max_loop_depth = self.state.metrics.max_loop_depth.max(self.factors.len());
    }

    fn reason(&mut self, reason: String) {
        if !self.state.time_reasons.contains(&reason) {
            self.state.time_reasons.push(reason);
        }
    }

    fn allocate(&mut self, size: ComplexityClass, reason: String) {
        self.state.metrics.allocations += 1;
        if size.is_constant() {
            return;
        }
        if size > self.state.space {
            self.state.space = size;
        }
        if !self.state.space_reasons.contains(&reason) {
            self.state.space_reasons.push(reason);
        }
    }

    /// Time cost of evaluating `node` once.
    fn cost(&mut self, node: Node<'a>) -> ComplexityClass {
        let context = self.context;
        let profile = context.profile;
        let kinds = profile.kinds();
        let kind = node.kind();

        // Named nested functions are sections of their own.
        if profile.is_function(&node) && profile.function_name(node, context.source).is_some() {
            return ComplexityClass::CONSTANT;
        }
        if profile.is_loop(&node) {
            return self.loop_cost(node);
        }
        if kinds.comprehensions.contains(&kind) {
            return self.comprehension_cost(node);
        }
        if profile.is_call(&node) {
            return self.call_cost(node);
        }

        let mut own = ComplexityClass::CONSTANT;
        if kinds.assignments.contains(&kind) || kinds.augmented_assignments.contains(&kind) {
            self.state.metrics.assignments += 1;
            self.note_indexed_store(node);
        }
        if kinds.slices.contains(&kind) && profile.vocabulary().slices_copy {
            own = ComplexityClass::LINEAR;
            let line = node.start_position().row + 1;
            self.reason(format!("slice at line {line} copies O(n) elements"));
            self.allocate(
                ComplexityClass::LINEAR.multiply(self.loop_product()),
                format!("slice at line {line} copies the sliced range"),
            );
        }
        if kinds.binary_operators.contains(&kind) && self.is_repeated_literal(node) {
            let line = node.start_position().row + 1;
            self.allocate(
                ComplexityClass::LINEAR,
                format!("repeated literal at line {line} allocates O(n) slots"),
            );
        }

        own.max(self.children_cost(node))
    }

    fn children_cost(&mut self, node: Node<'a>) -> ComplexityClass {
        named_children(node)
            .into_iter()
            .fold(ComplexityClass::CONSTANT, |acc, child| acc.max(self.cost(child)))
    }

    fn loop_cost(&mut self, node: Node<'a>) -> ComplexityClass {
        self.state.metrics.loops += 1;
        let factor = self.loop_factor(node);
        if !factor.is_constant() {
            let line = node.start_position().row + 1;
            self.reason(format!("loop at line {line} runs {factor} times"));
        }

        let iterables: Vec<Node<'a>> = ITERABLE_FIELDS
            .iter()
            .filter_map(|field| node.child_by_field_name(field))
            .collect();
        let mut header = ComplexityClass::CONSTANT;
        for iterable in &iterables {
            header = header.max(self.cost(*iterable));
        }

        self.push_factor(factor);
        let mut body = ComplexityClass::CONSTANT;
        for child in named_children(node) {
            if iterables.iter().any(|it| it.id() == child.id()) {
                continue;
            }
            body = body.max(self.cost(child));
        }
        self.factors.pop();

        header.max(factor.multiply(body))
    }

    fn loop_factor(&self, node: Node<'a>) -> ComplexityClass {
        let profile = self.context.profile;
        if profile.has_constant_bound(node, self.context.source) {
            return ComplexityClass::CONSTANT;
        }
        let iterates_collection = ITERABLE_FIELDS
            .iter()
            .any(|field| node.child_by_field_name(field).is_some());
        if !iterates_collection && self.has_geometric_update(node) {
            return ComplexityClass::LOGARITHMIC;
        }
        ComplexityClass::LINEAR
    }

    /// `n //= 2`, `i *= 2` or `x = x >> 1` on a variable the loop header tests,
    /// or `mid = (lo + hi) // 2` anywhere in the loop.
    fn has_geometric_update(&self, looped: Node<'a>) -> bool {
        let context = self.context;
        let profile = context.profile;
        let kinds = profile.kinds();
        let vocabulary = profile.vocabulary();
        let counters = self.loop_counters(looped);

        find_descendant(
            looped,
            &|node| {
                let kind = node.kind();
                if kinds.augmented_assignments.contains(&kind) {
                    return node
                        .child_by_field_name("left")
                        .is_some_and(|target| is_counter(&counters, context.text(target)))
                        && has_operator(*node, context.source, vocabulary.multiplicative_operators);
                }
                kinds.assignments.contains(&kind) && self.is_geometric_assignment(*node, &counters)
            },
            &|node| {
                profile.is_function(node) || (profile.is_loop(node) && node.id() != looped.id())
            },
        )
        .is_some()
    }

    /// Identifiers read by the loop's condition and increment clauses.
    fn loop_counters(&self, looped: Node<'a>) -> Vec<String> {
        let context = self.context;
        let kinds = context.profile.kinds();
        let mut counters = Vec::new();
        for clause in COUNTER_FIELDS
            .iter()
            .filter_map(|field| looped.child_by_field_name(field))
        {
            walk_tree(clause, &mut |node| {
                if kinds.identifiers.contains(&node.kind()) {
                    counters.push(context.text(node).to_string());
                }
            });
        }
        counters
    }

    fn is_geometric_assignment(&self, node: Node<'a>, counters: &[String]) -> bool {
        let context = self.context;
        let kinds = context.profile.kinds();
        let vocabulary = context.profile.vocabulary();

        let target = ["left", "name", "pattern"]
            .iter()
            .find_map(|field| node.child_by_field_name(field));
        let value = ["right", "value"]
            .iter()
            .find_map(|field| node.child_by_field_name(field));
        let (Some(target), Some(value)) = (target, value) else {
            return false;
        };

        let target_text = context.text(target);
        if vocabulary.midpoint_names.contains(&target_text) {
            return has_halving(value, context);
        }
        if !is_counter(counters, target_text) {
            return false;
        }
        let self_update = find_descendant(
            value,
            &|n| kinds.identifiers.contains(&n.kind()) && context.text(*n) == target_text,
            &|_| false,
        )
        .is_some();

        self_update
            && find_descendant(
                value,
                &|n| {
                    kinds.binary_operators.contains(&n.kind())
                        && (has_operator(*n, context.source, vocabulary.halving_operators)
                            || has_operator(*n, context.source, GROWTH_OPERATORS))
                },
                &|_| false,
            )
            .is_some()
    }

    fn comprehension_cost(&mut self, node: Node<'a>) -> ComplexityClass {
        let profile = self.context.profile;
        let kinds = profile.kinds();
        let clauses: Vec<Node<'a>> = named_children(node)
            .into_iter()
            .filter(|child| kinds.comprehension_clauses.contains(&child.kind()))
            .collect();

        let mut factor = ComplexityClass::CONSTANT;
        for clause in &clauses {
            let clause_factor = if profile.has_constant_bound(*clause, self.context.source) {
                ComplexityClass::CONSTANT
            } else {
                ComplexityClass::LINEAR
            };
            factor = factor.multiply(clause_factor);
            self.push_factor(clause_factor);
        }
        self.state.metrics.loops += clauses.len();

        let inner = self.children_cost(node);
        for _ in &clauses {
            self.factors.pop();
        }

        let line = node.start_position().row + 1;
        if !factor.is_constant() {
            self.reason(format!("comprehension at line {line} iterates {factor} times"));
        }
        if node.kind() != "generator_expression" {
            self.allocate(factor, format!("comprehension at line {line} builds {factor} elements"));
        }

        factor.multiply(inner)
    }

    fn call_cost(&mut self, node: Node<'a>) -> ComplexityClass {
        let context = self.context;
        let profile = context.profile;
        let vocabulary = profile.vocabulary();
        let line = node.start_position().row + 1;

        let arguments = node.child_by_field_name("arguments");
        let inline_callback = arguments.is_some_and(|args| {
            named_children(args).iter().any(|arg| {
                profile.is_function(arg) && profile.function_name(*arg, context.source).is_none()
            })
        });
        let children = self.children_cost(node);

        let Some(callee) = profile.callee_name(node, context.source) else {
            return children;
        };

        let in_loop = self.in_growing_loop();
        let mut own = ComplexityClass::CONSTANT;
        let mut iterating = false;

        if self.self_name.as_deref() == Some(callee.as_str()) {
            // Accounted for by the recursion shape.
        } else if let Some(index) = self.estimator.by_name.get(&callee).copied() {
            own = self.estimator.time_of(index);
            if !own.is_constant() {
                self.reason(format!("calls {callee}() at line {line}, which costs {own}"));
            }
        } else if vocabulary.sort_calls.contains(&callee.as_str()) {
            own = ComplexityClass::LINEARITHMIC;
            self.state.sort_in_loop |= in_loop;
            self.reason(format!("{callee}() at line {line} costs O(n log n)"));
        } else if vocabulary.linear_calls.contains(&callee.as_str()) && self.is_linear_scan(node) {
            own = ComplexityClass::LINEAR;
            iterating = true;
            self.state.scan_in_loop |= in_loop;
            self.reason(format!("{callee}() at line {line} scans O(n) elements"));
        }

        if vocabulary.allocation_calls.contains(&callee.as_str()) {
            iterating = true;
            let product = self.loop_product();
            let size = if product.is_constant() {
                ComplexityClass::LINEAR
            } else {
                product
            };
            self.allocate(size, format!("{callee}() at line {line} grows storage to {size}"));
        }

        if inline_callback && iterating {
            return own.max(ComplexityClass::LINEAR.multiply(children));
        }
        own.max(children)
    }

    /// `table[i] = ...` inside a growing loop, on a local rather than a parameter.
    fn note_indexed_store(&mut self, node: Node<'a>) {
        if !self.in_growing_loop() {
            return;
        }
        let context = self.context;
        let kinds = context.profile.kinds();
        let Some(target) = node.child_by_field_name("left") else {
            return;
        };
        if !kinds.subscripts.contains(&target.kind()) {
            return;
        }
        let root = find_descendant(
            target,
            &|n| kinds.identifiers.contains(&n.kind()),
            &|_| false,
        );
        let Some(root) = root else {
            return;
        };
        let name = context.text(root);
        if self.parameters.iter().any(|param| param == name) {
            return;
        }
        let line = node.start_position().row + 1;
        let product = self.loop_product();
        self.allocate(product, format!("indexed store into {name} at line {line} fills {product} slots"));
    }

    /// Method calls scan their receiver; free functions scan a single
    /// collection argument (`sum(xs)`, but not `max(a, b)`).
    fn is_linear_scan(&self, call: Node<'a>) -> bool {
        let is_method = call
            .child_by_field_name("function")
            .is_some_and(|callee| MEMBER_ACCESS_KINDS.contains(&callee.kind()));
        is_method
            || call
                .child_by_field_name("arguments")
                .is_some_and(|args| named_children(args).len() == 1)
    }

    /// `[0] * n`
    fn is_repeated_literal(&self, node: Node<'a>) -> bool {
        has_operator(node, self.context.source, &["*"])
            && named_children(node)
                .iter()
                .any(|operand| REPEATABLE_LITERALS.contains(&operand.kind()))
    }
}
