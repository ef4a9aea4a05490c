//! Static time and space complexity estimation.
//!
//! The estimator works on the syntax tree alone: it never runs the code and
//! knows nothing about input distributions, so results are upper-bound style
//! Big-O guesses per function. Loops and calls are composed in `walker`,
//! recursive functions are classified in `recursion`.

mod recursion;
mod suggestions;
pub mod types;
mod walker;

use tracing::{debug, info};

use crate::core::ast_service::AstContext;

pub use types::{
    BreakdownEntry, ComplexityClass, ComplexityConfig, ComplexityReport, OptimizationSuggestion,
    RecursionShape, SectionAnalysis, SectionKind, SectionMetrics, SpaceComplexity,
    TimeComplexity,
};
pub use walker::MODULE_SECTION;

/// Reasons quoted per explanation before the rest is elided.
const MAX_REASONS: usize = 4;

/// Estimates Big-O time and space for a parsed source
#[derive(Debug, Clone, Default)]
pub struct ComplexityEstimator {
    config: ComplexityConfig,
}

impl ComplexityEstimator {
    /// Create an estimator with the given configuration
    pub fn new(config: ComplexityConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ComplexityConfig {
        &self.config
    }

    /// Estimate complexity for every section of the source.
    pub fn estimate(&self, context: &AstContext<'_>) -> ComplexityReport {
        if context.source.trim().is_empty() {
            return ComplexityReport::failed("No code to analyze");
        }

        let (mut sections, module) = walker::SectionEstimator::new(context, &self.config).run();
        let module_matters = !module.time.is_constant() || !module.space.is_constant();
        if self.config.include_module_section && (module_matters || sections.is_empty()) {
            sections.push(module);
        }
        if sections.is_empty() {
            return ComplexityReport::failed("No functions or top-level code to analyze");
        }

        let dominant_time = dominant(&sections, |s| s.time);
        let dominant_space = dominant(&sections, |s| s.space);

        let time_complexity = TimeComplexity {
            overall: dominant_time.time.to_string(),
            explanation: overall_explanation(
                dominant_time,
                dominant_time.time,
                &dominant_time.time_reasons,
                "Every section runs a constant number of steps.",
            ),
            breakdown: sections
                .iter()
                .map(|section| BreakdownEntry {
                    section: section.name.clone(),
                    complexity: section.time.to_string(),
                    explanation: explain(&section.time_reasons, "Constant-time statements only."),
                })
                .collect(),
        };
        let space_complexity = SpaceComplexity {
            overall: dominant_space.space.to_string(),
            explanation: overall_explanation(
                dominant_space,
                dominant_space.space,
                &dominant_space.space_reasons,
                "Only a constant number of scalar values are stored.",
            ),
        };

        let optimization_suggestions =
            suggestions::suggest(&sections, &self.config, context.profile);

        let mut summary = format!(
            "Estimated time complexity {}, space {} across {} section(s); {} optimization suggestion(s).",
            time_complexity.overall,
            space_complexity.overall,
            sections.len(),
            optimization_suggestions.len()
        );
        if context.has_errors() {
            summary.push_str(" The source has syntax errors, so the estimate may be incomplete.");
        }

        for section in &sections {
            debug!(
                "{}: time {} space {} recursion {:?}",
                section.name, section.time, section.space, section.recursion
            );
        }
        info!(
            "Estimated {} for {} ({} sections)",
            time_complexity.overall,
            context.file_path,
            sections.len()
        );

        ComplexityReport {
            time_complexity,
            space_complexity,
            optimization_suggestions,
            summary,
            sections,
            language: Some(context.language),
        }
    }
}

/// First section with the largest value of `key`.
fn dominant(
    sections: &[SectionAnalysis],
    key: impl Fn(&SectionAnalysis) -> ComplexityClass,
) -> &SectionAnalysis {
    let mut best = &sections[0];
    for section in &sections[1..] {
        if key(section) > key(best) {
            best = section;
        }
    }
    best
}

fn explain(reasons: &[String], fallback: &str) -> String {
    if reasons.is_empty() {
        return fallback.to_string();
    }
    let mut text = reasons
        .iter()
        .take(MAX_REASONS)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if reasons.len() > MAX_REASONS {
        text.push_str(&format!("; and {} more", reasons.len() - MAX_REASONS));
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => fallback.to_string(),
    }
}

fn overall_explanation(
    section: &SectionAnalysis,
    class: ComplexityClass,
    reasons: &[String],
    fallback: &str,
) -> String {
    if class.is_constant() {
        return fallback.to_string();
    }
    let who = match section.kind {
        SectionKind::Module => "top-level code".to_string(),
        SectionKind::Function => format!("`{}`", section.name),
    };
    format!("Dominated by {who} at {class}. {}", explain(reasons, ""))
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests;
