//! Command execution.

use std::path::Path;

use anyhow::{anyhow, Context};
use mentor_rs::core::file_utils::FileReader;
use mentor_rs::lang::registry::registered_languages;
use mentor_rs::{Language, MentorConfig, MentorEngine, Severity};
use owo_colors::OwoColorize;
use tabled::settings::Style as TableStyle;
use tabled::{Table, Tabled};
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::cli::args::{
    ComplexityArgs, DebugArgs, InitConfigArgs, ReviewArgs, ValidateConfigArgs,
};
use crate::cli::config_layer::{build_layered_config, load_config_file};
use crate::cli::output::{
    print_batch_report, print_complexity_report, print_debug_report, review_spinner,
};

/// Argument that selects stdin as the input
pub const STDIN_ARG: &str = "-";

/// Source loaded for a single-input command
pub struct LoadedInput {
    pub label: String,
    pub source: String,
    pub language: Language,
}

/// Read a file (or stdin) and decide its language.
///
/// An explicit `--language` wins; otherwise the file extension decides, and
/// stdin falls back to Python.
pub async fn load_input(input: &str, language: Option<Language>) -> anyhow::Result<LoadedInput> {
    if input == STDIN_ARG {
        let mut source = String::new();
        tokio::io::stdin()
            .read_to_string(&mut source)
            .await
            .context("Failed to read source from stdin")?;
        return Ok(LoadedInput {
            label: "<stdin>".to_string(),
            source,
            language: language.unwrap_or(Language::Python),
        });
    }

    let path = Path::new(input);
    let language = language
        .or_else(|| Language::from_path(path))
        .ok_or_else(|| {
            anyhow!(
                "Cannot detect the language of {}; pass --language",
                path.display()
            )
        })?;
    let source = FileReader::read_to_string_async(path).await?;
    Ok(LoadedInput {
        label: path.display().to_string(),
        source,
        language,
    })
}

/// Exit with status 1 when `found` reaches the `--fail-on` threshold
fn enforce_fail_on(threshold: Option<Severity>, found: Option<Severity>) {
    if let (Some(threshold), Some(found)) = (threshold, found) {
        if found >= threshold {
            eprintln!(
                "{} found {found} severity issue(s) (threshold: {threshold})",
                "Failing:".red().bold()
            );
            std::process::exit(1);
        }
    }
}

/// Debug one source
pub async fn debug_command(args: DebugArgs) -> anyhow::Result<()> {
    let config = build_layered_config(&args, &args.options)?;
    let input = load_input(&args.input, args.options.language).await?;
    let format = config.output.format;
    let engine = MentorEngine::new(config)?;

    let report = engine.debug_source(&input.source, input.language);
    print_debug_report(&input.label, &input.source, &report, format)?;

    enforce_fail_on(
        args.fail_on,
        report.issues.iter().map(|issue| issue.severity).max(),
    );
    Ok(())
}

/// Estimate complexity of one source
pub async fn complexity_command(args: ComplexityArgs) -> anyhow::Result<()> {
    let config = build_layered_config(&args, &args.options)?;
    let input = load_input(&args.input, args.options.language).await?;
    let format = config.output.format;
    let engine = MentorEngine::new(config)?;

    let report = engine.analyze_complexity(&input.source, input.language);
    print_complexity_report(&input.label, &report, format)
}

/// Review files and directories
pub async fn review_command(args: ReviewArgs) -> anyhow::Result<()> {
    let config = build_layered_config(&args, &args.options)?;
    let format = config.output.format;
    let engine = MentorEngine::new(config)?;

    let batch = if args.quiet {
        engine.review_paths(&args.paths).await?
    } else {
        let pb = review_spinner()?;
        let batch = engine
            .review_paths_with_progress(&args.paths, |path| {
                pb.inc(1);
                pb.set_message(path.display().to_string());
            })
            .await?;
        pb.finish_and_clear();
        batch
    };

    info!("Reviewed {} file(s)", batch.summary.files_reviewed);
    print_batch_report(&batch, format)?;
    enforce_fail_on(args.fail_on, batch.max_severity());
    Ok(())
}

/// Print default configuration
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default mentor configuration".dimmed());
    println!("{}", "# Save this to .mentor.yml and customize as needed".dimmed());
    println!();

    let yaml_output = serde_yaml::to_string(&MentorConfig::default())?;
    println!("{yaml_output}");
    Ok(())
}

/// Initialize a configuration file with defaults
pub async fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        eprintln!(
            "{} {}",
            "Configuration file already exists:".red(),
            args.output.display()
        );
        eprintln!("   Use --force to overwrite or choose a different name with --output");
        std::process::exit(1);
    }

    MentorConfig::default().to_yaml_file(&args.output)?;

    println!(
        "{} {}",
        "Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();

    #[derive(Tabled)]
    struct CustomizationRow {
        setting: String,
        description: String,
    }

    let rows = vec![
        CustomizationRow {
            setting: "analysis.languages".to_string(),
            description: "Languages analyzed during reviews".to_string(),
        },
        CustomizationRow {
            setting: "debug.auto_fix".to_string(),
            description: "Produce fixed code for mechanical issues".to_string(),
        },
        CustomizationRow {
            setting: "complexity.nested_loop_threshold".to_string(),
            description: "Loop depth that triggers a nested-loop suggestion".to_string(),
        },
        CustomizationRow {
            setting: "review.max_words".to_string(),
            description: "Word budget for rendered suggestions".to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{table}");
    Ok(())
}

/// Validate a configuration file
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    match load_config_file(&args.config) {
        Ok(config) => {
            println!(
                "{} {}",
                "Configuration file is valid:".bright_green().bold(),
                args.config.display()
            );
            println!(
                "   languages: {}",
                config
                    .analysis
                    .languages
                    .iter()
                    .map(|language| language.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {err:#}", "Configuration validation failed:".red());
            eprintln!(
                "{}",
                "Tip: use 'mentor print-default-config' to see the valid format".dimmed()
            );
            std::process::exit(1);
        }
    }
}

/// List supported languages
pub async fn list_languages() -> anyhow::Result<()> {
    let languages = registered_languages();
    println!("{}", "Supported Languages".bright_blue().bold());
    println!("   Found {} supported languages", languages.len());
    println!();

    #[derive(Tabled)]
    struct LanguageRow {
        language: String,
        extensions: String,
        status: String,
        features: String,
    }

    let rows: Vec<LanguageRow> = languages
        .iter()
        .map(|info| LanguageRow {
            language: info.name.to_string(),
            extensions: info
                .extensions
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", "),
            status: format!("{:?}", info.status),
            features: info.notes.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{table}");
    Ok(())
}
