//! Output formatting for reports.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mentor_rs::core::config::OutputFormat;
use mentor_rs::{BatchReport, ComplexityReport, DebugReport, ReviewReport, Severity};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::settings::Style as TableStyle;
use tabled::{Table, Tabled};

/// Serialize `value` for the machine-readable formats; `None` for pretty output
pub fn serialize_report<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<Option<String>> {
    Ok(match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
        OutputFormat::Pretty => None,
    })
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::High => "high".red().bold().to_string(),
        Severity::Medium => "medium".yellow().to_string(),
        Severity::Low => "low".dimmed().to_string(),
    }
}

/// Print a debug report in the requested format
pub fn print_debug_report(
    label: &str,
    source: &str,
    report: &DebugReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if let Some(text) = serialize_report(report, format)? {
        println!("{text}");
        return Ok(());
    }

    println!("{} {}", "Debug report:".bright_blue().bold(), label.cyan());
    println!();

    if !report.issues.is_empty() {
        #[derive(Tabled)]
        struct IssueRow {
            line: usize,
            #[tabled(rename = "type")]
            issue_type: String,
            severity: String,
            description: String,
            suggestion: String,
        }

        let rows: Vec<IssueRow> = report
            .issues
            .iter()
            .map(|issue| IssueRow {
                line: issue.line,
                issue_type: issue.issue_type.to_string(),
                severity: severity_label(issue.severity),
                description: issue.description.clone(),
                suggestion: issue.suggestion.clone(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        println!("{table}");
        println!();
    }

    print!("{}", report.summary);
    if !report.summary.ends_with('\n') {
        println!();
    }

    if report.fixed_code != source {
        println!();
        println!("{}", "Fixed code:".bright_green().bold());
        println!("{}", report.fixed_code.trim_end_matches('\n'));
    }
    Ok(())
}

/// Print a complexity report in the requested format
pub fn print_complexity_report(
    label: &str,
    report: &ComplexityReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if let Some(text) = serialize_report(report, format)? {
        println!("{text}");
        return Ok(());
    }

    println!("{} {}", "Complexity report:".bright_blue().bold(), label.cyan());
    println!();
    println!(
        "{} {}  {}",
        "Time:".bold(),
        report.time_complexity.overall.bright_magenta(),
        report.time_complexity.explanation
    );
    println!(
        "{} {}  {}",
        "Space:".bold(),
        report.space_complexity.overall.bright_magenta(),
        report.space_complexity.explanation
    );

    if !report.time_complexity.breakdown.is_empty() {
        #[derive(Tabled)]
        struct BreakdownRow {
            section: String,
            time: String,
            space: String,
            loops: usize,
            explanation: String,
        }

        let rows: Vec<BreakdownRow> = report
            .time_complexity
            .breakdown
            .iter()
            .map(|entry| {
                let section = report.sections.iter().find(|s| s.name == entry.section);
                BreakdownRow {
                    section: entry.section.clone(),
                    time: entry.complexity.clone(),
                    space: section.map_or_else(String::new, |s| s.space.to_string()),
                    loops: section.map_or(0, |s| s.metrics.loops),
                    explanation: entry.explanation.clone(),
                }
            })
            .collect();

        println!();
        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        println!("{table}");
    }

    if !report.optimization_suggestions.is_empty() {
        println!();
        println!("{}", "Optimization suggestions:".bright_blue().bold());
        for suggestion in &report.optimization_suggestions {
            println!("  • {}", suggestion.description);
            println!("    {}", suggestion.impact.dimmed());
        }
    }

    println!();
    println!("{}", report.summary);
    Ok(())
}

fn print_review(report: &ReviewReport) {
    println!("{}", report.file_path.cyan().bold());
    println!(
        "  {} {}  {} {}  {} {}",
        "issues:".dimmed(),
        report.debug.issues.len(),
        "time:".dimmed(),
        report.complexity.time_complexity.overall,
        "space:".dimmed(),
        report.complexity.space_complexity.overall
    );
    for line in report.rendered_suggestions.lines() {
        println!("  {line}");
    }
    println!();
}

/// Print a batch review in the requested format
pub fn print_batch_report(batch: &BatchReport, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(text) = serialize_report(batch, format)? {
        println!("{text}");
        return Ok(());
    }

    println!("{}", "Review complete".bright_green().bold());
    println!();
    for report in &batch.files {
        print_review(report);
    }
    for skipped in &batch.skipped {
        println!("{} {} ({})", "skipped".yellow(), skipped.path, skipped.reason);
    }

    #[derive(Tabled)]
    struct StatsRow {
        metric: String,
        value: String,
    }

    let summary = &batch.summary;
    let rows = vec![
        StatsRow {
            metric: "Files reviewed".to_string(),
            value: summary.files_reviewed.to_string(),
        },
        StatsRow {
            metric: "Files skipped".to_string(),
            value: summary.files_skipped.to_string(),
        },
        StatsRow {
            metric: "Issues (high/medium/low)".to_string(),
            value: format!(
                "{} ({}/{}/{})",
                summary.total_issues,
                summary.high_severity,
                summary.medium_severity,
                summary.low_severity
            ),
        },
        StatsRow {
            metric: "Worst time complexity".to_string(),
            value: match (&summary.worst_time_complexity, &summary.worst_file) {
                (Some(class), Some(file)) => format!("{class} in {file}"),
                _ => "n/a".to_string(),
            },
        },
        StatsRow {
            metric: "Elapsed".to_string(),
            value: format!("{} ms", summary.elapsed_ms),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{table}");
    Ok(())
}

/// Spinner that counts reviewed files
pub fn review_spinner() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.blue} {pos} file(s) {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
