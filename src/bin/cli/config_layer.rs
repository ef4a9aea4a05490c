//! Configuration layer management.
//!
//! Defaults, then an explicit `--config` file or an implicit `.mentor.yml` /
//! `.mentor.yaml` in the working directory, then CLI flag overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use mentor_rs::core::config::OutputFormat;
use mentor_rs::{Language, MentorConfig};
use tracing::debug;

use crate::cli::args::{AnalysisOptions, ComplexityArgs, DebugArgs, ReviewArgs};

/// Local configuration files picked up when `--config` is not given
pub const IMPLICIT_CONFIG_FILES: &[&str] = &[".mentor.yml", ".mentor.yaml"];

/// Trait for merging configuration layers
pub trait ConfigMerge<T> {
    /// Merge another layer into this one, with the other taking priority
    fn merge_with(&mut self, other: T);
}

/// Convert CLI arguments to partial configuration overrides
pub trait FromCliArgs<T> {
    /// Create a partial configuration from CLI arguments
    fn from_cli_args(args: &T) -> Self;
}

/// Settings the command line can override
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliOverrides {
    pub format: Option<OutputFormat>,
    pub language: Option<Language>,
    pub auto_fix: Option<bool>,
}

impl CliOverrides {
    fn from_options(options: &AnalysisOptions) -> Self {
        Self {
            format: options.format,
            language: options.language,
            auto_fix: None,
        }
    }
}

impl FromCliArgs<DebugArgs> for CliOverrides {
    fn from_cli_args(args: &DebugArgs) -> Self {
        Self {
            auto_fix: args.no_fix.then_some(false),
            ..Self::from_options(&args.options)
        }
    }
}

impl FromCliArgs<ComplexityArgs> for CliOverrides {
    fn from_cli_args(args: &ComplexityArgs) -> Self {
        Self::from_options(&args.options)
    }
}

impl FromCliArgs<ReviewArgs> for CliOverrides {
    fn from_cli_args(args: &ReviewArgs) -> Self {
        Self::from_options(&args.options)
    }
}

impl ConfigMerge<CliOverrides> for MentorConfig {
    fn merge_with(&mut self, other: CliOverrides) {
        if let Some(format) = other.format {
            self.output.format = format;
        }
        // An explicitly requested language is always analyzable.
        if let Some(language) = other.language {
            if !self.analysis.languages.contains(&language) {
                self.analysis.languages.push(language);
            }
        }
        if let Some(auto_fix) = other.auto_fix {
            self.debug.auto_fix = auto_fix;
        }
    }
}

/// Config file to load: the explicit path, else the first implicit file in `dir`
pub fn resolve_config_path(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        IMPLICIT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    })
}

/// Load a config file and validate it
pub fn load_config_file(path: &Path) -> anyhow::Result<MentorConfig> {
    let config = MentorConfig::from_yaml_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Build the effective configuration for an analysis command.
pub fn build_layered_config<A>(args: &A, options: &AnalysisOptions) -> anyhow::Result<MentorConfig>
where
    CliOverrides: FromCliArgs<A>,
{
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let mut config = match resolve_config_path(options.config.as_deref(), &cwd) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            load_config_file(&path)?
        }
        None => MentorConfig::default(),
    };

    config.merge_with(CliOverrides::from_cli_args(args));
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}
