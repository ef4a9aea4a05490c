//! CLI argument structures.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mentor_rs::core::config::OutputFormat;
use mentor_rs::{Language, Severity};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Static code mentor: debug findings and complexity estimates without a model
#[derive(Parser)]
#[command(name = "mentor")]
#[command(version = VERSION)]
#[command(about = "Static debugging and Big-O estimation for Python, JavaScript and Rust")]
#[command(long_about = "
Find bugs and estimate time/space complexity straight from the syntax tree.

Common Usage:

  # Debug a file and print the repaired source
  mentor debug script.py

  # Read from stdin
  cat snippet.py | mentor debug - --language python

  # Estimate complexity as JSON
  mentor complexity --format json algo.js

  # Review a directory, failing CI on high-severity findings
  mentor review --fail-on high ./src
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report bugs and style problems in one source, with auto-fixes
    Debug(DebugArgs),

    /// Estimate time and space complexity of one source
    Complexity(ComplexityArgs),

    /// Debug and estimate every source file under the given paths
    Review(ReviewArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),

    /// List supported languages
    #[command(name = "list-languages")]
    ListLanguages,
}

/// Options shared by the analysis commands
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Source language (detected from the file extension when omitted)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Configuration file (defaults to .mentor.yml / .mentor.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct DebugArgs {
    /// Source file, or `-` for stdin
    pub input: String,

    #[command(flatten)]
    pub options: AnalysisOptions,

    /// Report issues without producing fixed code
    #[arg(long)]
    pub no_fix: bool,

    /// Exit with status 1 when an issue at or above this severity is found
    #[arg(long, value_enum)]
    pub fail_on: Option<Severity>,
}

#[derive(Args, Debug, Clone)]
pub struct ComplexityArgs {
    /// Source file, or `-` for stdin
    pub input: String,

    #[command(flatten)]
    pub options: AnalysisOptions,
}

#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    /// Files or directories to review
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub options: AnalysisOptions,

    /// Exit with status 1 when an issue at or above this severity is found
    #[arg(long, value_enum)]
    pub fail_on: Option<Severity>,

    /// Hide the progress spinner
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".mentor.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    #[arg(short, long, default_value = ".mentor.yml")]
    pub config: PathBuf,
}

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}
