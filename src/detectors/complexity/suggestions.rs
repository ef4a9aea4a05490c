//! Optimization suggestions derived from section estimates.

use super::types::{
    ComplexityClass, ComplexityConfig, OptimizationSuggestion, RecursionShape, SectionAnalysis,
    SectionKind,
};
use crate::lang::common::LanguageProfile;

fn label(section: &SectionAnalysis) -> String {
    match section.kind {
        SectionKind::Module => "Top-level code".to_string(),
        SectionKind::Function => format!("`{}`", section.name),
    }
}

/// Suggestions ordered by expected payoff, capped at `max_suggestions`.
pub fn suggest(
    sections: &[SectionAnalysis],
    config: &ComplexityConfig,
    profile: &dyn LanguageProfile,
) -> Vec<OptimizationSuggestion> {
    let mut ranked: Vec<(u8, OptimizationSuggestion)> = Vec::new();

    for section in sections {
        let who = label(section);
        let time = section.time;

        match section.recursion {
            RecursionShape::Branching { .. } => ranked.push((
                0,
                OptimizationSuggestion {
                    description: format!(
                        "{who} recomputes overlapping subproblems ({time}); {}",
                        profile.memoization_hint()
                    ),
                    impact: format!(
                        "Reduces time from {time} to about O(n) when subproblems repeat"
                    ),
                },
            )),
            RecursionShape::Permutation => ranked.push((
                0,
                OptimizationSuggestion {
                    description: format!(
                        "{who} explores every ordering of its input ({time}); prune branches early or use dynamic programming over subsets"
                    ),
                    impact: "Shrinks the search space, often to O(n * 2^n) or better".to_string(),
                },
            )),
            _ => {}
        }

        if let ComplexityClass::Polynomial { degree, log_power } = time {
            let threshold = config.nested_loop_threshold;
            if section.metrics.max_loop_depth >= threshold && degree >= threshold as f64 - 1e-6 {
                let reduced = ComplexityClass::Polynomial {
                    degree: degree - 1.0,
                    log_power,
                };
                ranked.push((
                    1,
                    OptimizationSuggestion {
                        description: format!(
                            "{who} nests loops {} deep ({time}); replace the inner loop with a hash-based lookup, or sort once and use two pointers or binary search",
                            section.metrics.max_loop_depth
                        ),
                        impact: format!("Can lower time from {time} to about {reduced}"),
                    },
                ));
            }
        }

        if section.sort_in_loop {
            ranked.push((
                2,
                OptimizationSuggestion {
                    description: format!(
                        "{who} sorts inside a loop; sort once before the loop or keep a heap"
                    ),
                    impact: "Removes a repeated O(n log n) factor".to_string(),
                },
            ));
        }

        if section.scan_in_loop {
            ranked.push((
                3,
                OptimizationSuggestion {
                    description: format!(
                        "{who} scans a collection inside a loop; build a set or dict once for constant-time lookups"
                    ),
                    impact: "Removes a factor of n from the loop".to_string(),
                },
            ));
        }

        if section.recursion == RecursionShape::Linear {
            ranked.push((
                4,
                OptimizationSuggestion {
                    description: format!(
                        "{who} recurses once per element; an iterative loop avoids O(n) stack depth"
                    ),
                    impact: "Reduces auxiliary space from O(n) to O(1)".to_string(),
                },
            ));
        }
    }

    ranked.sort_by_key(|(priority, _)| *priority);
    let mut suggestions: Vec<OptimizationSuggestion> = Vec::new();
    for (_, suggestion) in ranked {
        if !suggestions.contains(&suggestion) {
            suggestions.push(suggestion);
        }
    }
    suggestions.truncate(config.max_suggestions);
    suggestions
}
