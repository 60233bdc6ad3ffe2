//! Shared output formatting for check results.

use anyhow::Result;
use lintstack_core::{LintReport, Severity};
use serde::Serialize;

use crate::OutputFormat;

/// Outcome of a `check` run.
#[derive(Debug, Serialize)]
pub struct CheckSummary {
    /// Diagnostics and the count of resolved files.
    #[serde(flatten)]
    pub report: LintReport,
    /// Files excluded by a global ignore pattern.
    pub files_ignored: usize,
    /// Distinct effective configurations among resolved files.
    pub distinct_configs: usize,
}

/// Print check results in the specified format.
pub fn print(summary: &CheckSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(summary),
        OutputFormat::Json => return print_json(summary),
    }
    Ok(())
}

fn print_text(summary: &CheckSummary) {
    let report = &summary.report;
    let (errors, warnings) = report.count_by_severity();

    for diagnostic in &report.diagnostics {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warn => "\x1b[33mwarning\x1b[0m",
            Severity::Off => continue,
        };
        println!(
            "{}:{}:{}: {} [{}] {}",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
            severity_indicator,
            diagnostic.rule,
            diagnostic.message,
        );
    }
    if !report.diagnostics.is_empty() {
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Resolved {} file(s) ({} ignored) into {} configuration(s): {} error(s), {} warning(s)\x1b[0m",
        summary_color,
        report.files_checked,
        summary.files_ignored,
        summary.distinct_configs,
        errors,
        warnings
    );
}

fn print_json(summary: &CheckSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{json}");
    Ok(())
}
