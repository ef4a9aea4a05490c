//! Configuration types and management for mentor-rs.
//!
//! The whole configuration round-trips through YAML. Every section has serde
//! defaults so partial files are accepted.

pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{MentorError, Result};
use crate::detectors::complexity::ComplexityConfig;
use crate::detectors::debug::DebugConfig;
use crate::lang::registry::Language;

pub use validation::{
    validate_glob_patterns, validate_positive_u64, validate_positive_usize, validate_usize_range,
};

/// Main configuration for the mentor engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorConfig {
    /// File discovery and input limits
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Static debugger settings
    #[serde(default)]
    pub debug: DebugConfig,

    /// Complexity estimator settings
    #[serde(default)]
    pub complexity: ComplexityConfig,

    /// Combined review settings
    #[serde(default)]
    pub review: ReviewConfig,

    /// Output rendering defaults
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            debug: DebugConfig::default(),
            complexity: ComplexityConfig::default(),
            review: ReviewConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl MentorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            MentorError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            MentorError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        validate_positive_usize(self.debug.max_syntax_errors, "debug.max_syntax_errors")?;
        validate_usize_range(self.debug.indent_width, 1, 16, "debug.indent_width")?;
        validate_positive_usize(
            self.complexity.nested_loop_threshold,
            "complexity.nested_loop_threshold",
        )?;
        self.review.validate()?;
        Ok(())
    }

    /// Whether analysis is enabled for `language`
    pub fn language_enabled(&self, language: Language) -> bool {
        self.analysis.languages.contains(&language)
    }
}

/// File discovery and input limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Languages to analyze
    #[serde(default = "AnalysisConfig::default_languages")]
    pub languages: Vec<Language>,

    /// Skip files larger than this
    #[serde(default = "AnalysisConfig::default_max_file_size_kb")]
    pub max_file_size_kb: u64,

    /// Glob patterns excluded from directory walks
    #[serde(default = "AnalysisConfig::default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Honour .gitignore files when walking directories
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Descend into hidden files and directories
    #[serde(default)]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            languages: Self::default_languages(),
            max_file_size_kb: Self::default_max_file_size_kb(),
            exclude_patterns: Self::default_exclude_patterns(),
            respect_gitignore: true,
            include_hidden: false,
        }
    }
}

impl AnalysisConfig {
    fn default_languages() -> Vec<Language> {
        vec![Language::Python, Language::JavaScript, Language::Rust]
    }

    const fn default_max_file_size_kb() -> u64 {
        512
    }

    fn default_exclude_patterns() -> Vec<String> {
        [
            "**/node_modules/**",
            "**/target/**",
            "**/__pycache__/**",
            "**/.venv/**",
            "**/venv/**",
            "**/*.min.js",
        ]
        .iter()
        .map(|p| (*p).to_string())
        .collect()
    }

    /// Validate analysis settings
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(MentorError::config_field(
                "At least one language must be enabled",
                "analysis.languages",
            ));
        }
        validate_positive_u64(self.max_file_size_kb, "analysis.max_file_size_kb")?;
        validate_glob_patterns(&self.exclude_patterns, "analysis.exclude_patterns")?;
        Ok(())
    }
}

/// Combined review settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Word budget for rendered suggestions
    #[serde(default = "ReviewConfig::default_max_words")]
    pub max_words: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_words: Self::default_max_words(),
        }
    }
}

impl ReviewConfig {
    const fn default_max_words() -> usize {
        100
    }

    /// Validate review settings
    pub fn validate(&self) -> Result<()> {
        validate_positive_usize(self.max_words, "review.max_words")
    }
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored tables for terminals
    #[default]
    Pretty,
    /// Machine-readable JSON
    Json,
    /// YAML
    Yaml,
}

/// Output rendering defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default report format
    #[serde(default)]
    pub format: OutputFormat,
}
