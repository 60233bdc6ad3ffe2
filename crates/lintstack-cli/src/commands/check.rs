//! Check command implementation.

use anyhow::Result;
use lintstack_core::{rule_namespace, Diagnostic, EffectiveConfig, LintReport, Location, Severity};
use std::path::{Path, PathBuf};

use super::output::CheckSummary;
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Rule id of diagnostics about rules whose plugin no layer declares.
pub const UNDECLARED_PLUGIN: &str = "undeclared-plugin";

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    extensions: &[String],
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source, path)?;
    let walk_root = super::absolute(path)?;

    let Some(resolver) = super::prepare(&config, &walk_root) else {
        std::process::exit(1);
    };

    let files = discover_files(&walk_root, extensions)?;
    tracing::info!("Resolving {} files under {}", files.len(), walk_root.display());

    let paths: Vec<String> = files
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let resolved = resolver.resolve_all(&paths);

    let mut report = LintReport::new();
    let mut files_ignored = 0;
    for (file, effective) in files.iter().zip(&resolved) {
        if effective.is_ignored() {
            files_ignored += 1;
            continue;
        }
        let display = file.strip_prefix(&walk_root).unwrap_or(file);
        report.extend(undeclared_plugins(display, effective));
    }

    let summary = CheckSummary {
        report,
        files_ignored,
        distinct_configs: resolver.cached_configs(),
    };
    super::output::print(&summary, format)
}

/// One warning per enabled rule whose plugin namespace is undeclared.
fn undeclared_plugins(file: &Path, config: &EffectiveConfig) -> LintReport {
    let mut report = LintReport::new();
    for rule in config.undeclared_rules() {
        let namespace = rule_namespace(rule).unwrap_or(rule);
        report.diagnostics.push(Diagnostic::new(
            UNDECLARED_PLUGIN,
            Severity::Warn,
            Location::new(file, 1, 1),
            format!("rule `{rule}` is enabled but no applied layer declares plugin `{namespace}`"),
        ));
    }
    report.files_checked = 1;
    report
}

fn discover_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|entry| entry.file_name() != ".git");

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let wanted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.trim_start_matches('.') == ext));

        if wanted {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
