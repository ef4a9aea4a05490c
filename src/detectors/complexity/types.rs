//! Complexity analysis types and configuration.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::errors::MentorError;
use crate::lang::common::SourceLocation;
use crate::lang::registry::Language;

const EPSILON: f64 = 1e-6;

/// Configuration for complexity estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityConfig {
    /// Enable complexity estimation
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Loop nesting depth at which a nested-loop suggestion is emitted
    #[serde(default = "ComplexityConfig::default_nested_loop_threshold")]
    pub nested_loop_threshold: usize,
    /// Maximum optimization suggestions per report
    #[serde(default = "ComplexityConfig::default_max_suggestions")]
    pub max_suggestions: usize,
    /// Treat memo tables and caching decorators as bounding recursion
    #[serde(default = "default_true")]
    pub detect_memoization: bool,
    /// Report top-level code as a `<module>` section
    #[serde(default = "default_true")]
    pub include_module_section: bool,
}

fn default_true() -> bool {
    true
}

impl ComplexityConfig {
    const fn default_nested_loop_threshold() -> usize {
        2
    }

    const fn default_max_suggestions() -> usize {
        5
    }
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            nested_loop_threshold: Self::default_nested_loop_threshold(),
            max_suggestions: Self::default_max_suggestions(),
            detect_memoization: true,
            include_module_section: true,
        }
    }
}

/// Asymptotic growth class in terms of input size `n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComplexityClass {
    /// `n^degree · log^log_power n`
    Polynomial { degree: f64, log_power: u32 },
    /// `base^n`
    Exponential { base: u32 },
    /// `n!`
    Factorial,
}

impl ComplexityClass {
    pub const CONSTANT: Self = Self::Polynomial {
        degree: 0.0,
        log_power: 0,
    };
    pub const LOGARITHMIC: Self = Self::Polynomial {
        degree: 0.0,
        log_power: 1,
    };
    pub const LINEAR: Self = Self::Polynomial {
        degree: 1.0,
        log_power: 0,
    };
    pub const LINEARITHMIC: Self = Self::Polynomial {
        degree: 1.0,
        log_power: 1,
    };

    /// `n^degree`
    pub fn polynomial(degree: f64) -> Self {
        Self::Polynomial {
            degree,
            log_power: 0,
        }
    }

    /// Product of two growth rates (nesting).
    pub fn multiply(self, other: Self) -> Self {
        match (self, other) {
            (Self::Factorial, _) | (_, Self::Factorial) => Self::Factorial,
            (Self::Exponential { base: a }, Self::Exponential { base: b }) => Self::Exponential {
                base: a.saturating_mul(b),
            },
            (exp @ Self::Exponential { .. }, Self::Polynomial { .. })
            | (Self::Polynomial { .. }, exp @ Self::Exponential { .. }) => exp,
            (
                Self::Polynomial {
                    degree: d1,
                    log_power: l1,
                },
                Self::Polynomial {
                    degree: d2,
                    log_power: l2,
                },
            ) => Self::Polynomial {
                degree: d1 + d2,
                log_power: l1 + l2,
            },
        }
    }

    /// The faster-growing of two rates (sequential composition).
    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Polynomial degree, or `None` for super-polynomial classes
    pub fn degree(&self) -> Option<f64> {
        match self {
            Self::Polynomial { degree, .. } => Some(*degree),
            _ => None,
        }
    }

    /// Whether the class is `O(1)`
    pub fn is_constant(&self) -> bool {
        *self == Self::CONSTANT
    }

    /// Whether the class grows faster than any polynomial
    pub fn is_superpolynomial(&self) -> bool {
        !matches!(self, Self::Polynomial { .. })
    }

    fn rank(&self) -> (u8, f64, u32) {
        match self {
            Self::Polynomial { degree, log_power } => (0, *degree, *log_power),
            Self::Exponential { base } => (1, f64::from(*base), 0),
            Self::Factorial => (2, 0.0, 0),
        }
    }
}

impl Default for ComplexityClass {
    fn default() -> Self {
        Self::CONSTANT
    }
}

impl PartialOrd for ComplexityClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (tier_a, deg_a, log_a) = self.rank();
        let (tier_b, deg_b, log_b) = other.rank();
        let ordering = tier_a.cmp(&tier_b).then_with(|| {
            if (deg_a - deg_b).abs() < EPSILON {
                log_a.cmp(&log_b)
            } else if deg_a < deg_b {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        Some(ordering)
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factorial => f.write_str("O(n!)"),
            Self::Exponential { base } => write!(f, "O({base}^n)"),
            Self::Polynomial { degree, log_power } => {
                let mut parts = Vec::new();
                if degree.abs() >= EPSILON {
                    if (degree - 1.0).abs() < EPSILON {
                        parts.push("n".to_string());
                    } else if (degree - degree.round()).abs() < EPSILON {
                        parts.push(format!("n^{}", degree.round() as i64));
                    } else {
                        parts.push(format!("n^{degree:.2}"));
                    }
                }
                match log_power {
                    0 => {}
                    1 => parts.push("log n".to_string()),
                    k => parts.push(format!("log^{k} n")),
                }
                if parts.is_empty() {
                    f.write_str("O(1)")
                } else {
                    write!(f, "O({})", parts.join(" "))
                }
            }
        }
    }
}

impl FromStr for ComplexityClass {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MentorError::validation(format!("Not a Big-O expression: '{s}'"));
        let inner = s
            .trim()
            .strip_prefix("O(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?
            .trim();

        match inner {
            "1" => return Ok(Self::CONSTANT),
            "n!" => return Ok(Self::Factorial),
            _ => {}
        }
        if let Some(base) = inner.strip_suffix("^n") {
            let base = base.parse::<u32>().map_err(|_| invalid())?;
            return Ok(Self::Exponential { base });
        }

        let mut degree = 0.0;
        let mut log_power = 0;
        let mut tokens = inner.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == "n" {
                degree = 1.0;
            } else if let Some(exp) = token.strip_prefix("n^") {
                degree = exp.parse::<f64>().map_err(|_| invalid())?;
            } else if token == "log" || token.starts_with("log^") {
                log_power = match token.strip_prefix("log^") {
                    Some(k) => k.parse::<u32>().map_err(|_| invalid())?,
                    None => 1,
                };
                if tokens.next() != Some("n") {
                    return Err(invalid());
                }
            } else {
                return Err(invalid());
            }
        }
        Ok(Self::Polynomial { degree, log_power })
    }
}

impl Serialize for ComplexityClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComplexityClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// How a function recurses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum RecursionShape {
    None,
    /// One self-call per path, argument shrinks by a constant
    Linear,
    /// Several self-calls per path, argument shrinks by a constant
    Branching { calls: u32 },
    /// Self-calls on a fraction of the input
    Divide { calls: u32 },
    /// Self-call inside a loop over the input
    Permutation,
    /// Self-calls fan out over sub-structures, visiting each once
    Traversal,
    /// Recursion bounded by a memo/visited table
    Memoized,
}

/// What a section of the breakdown covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Function,
    Module,
}

/// Counters gathered while walking a section ("assignment counting")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMetrics {
    pub loops: usize,
    pub max_loop_depth: usize,
    pub recursive_calls: usize,
    pub assignments: usize,
    pub allocations: usize,
    pub parameters: usize,
}

/// Estimate for one function or for module-level code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub name: String,
    pub kind: SectionKind,
    pub location: SourceLocation,
    pub time: ComplexityClass,
    pub space: ComplexityClass,
    pub recursion: RecursionShape,
    pub metrics: SectionMetrics,
    pub time_reasons: Vec<String>,
    pub space_reasons: Vec<String>,
    /// Whether a sort runs inside a loop
    #[serde(default)]
    pub sort_in_loop: bool,
    /// Whether a linear scan runs inside a loop
    #[serde(default)]
    pub scan_in_loop: bool,
}

/// One row of the time-complexity breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub section: String,
    pub complexity: String,
    pub explanation: String,
}

/// Time-complexity block of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeComplexity {
    pub overall: String,
    pub explanation: String,
    pub breakdown: Vec<BreakdownEntry>,
}

/// Space-complexity block of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceComplexity {
    pub overall: String,
    pub explanation: String,
}

/// A suggested optimization and its expected effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub description: String,
    pub impact: String,
}

/// Complexity estimate for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub time_complexity: TimeComplexity,
    pub space_complexity: SpaceComplexity,
    pub optimization_suggestions: Vec<OptimizationSuggestion>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ComplexityReport {
    /// Default report returned when estimation cannot run.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            time_complexity: TimeComplexity {
                overall: "N/A".to_string(),
                explanation: "Analysis failed".to_string(),
                breakdown: Vec::new(),
            },
            space_complexity: SpaceComplexity {
                overall: "N/A".to_string(),
                explanation: "Analysis failed".to_string(),
            },
            optimization_suggestions: Vec::new(),
            summary: reason.into(),
            sections: Vec::new(),
            language: None,
        }
    }

    /// Whether this is the failure default
    pub fn is_failed(&self) -> bool {
        self.time_complexity.overall == "N/A"
    }
}
