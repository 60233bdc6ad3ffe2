//! Print-config command implementation.

use anyhow::{Context, Result};
use lintstack_core::EffectiveConfig;
use std::fmt::Write as _;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the print-config command.
pub fn run(file: &Path, format: OutputFormat, source: &ConfigSource, cwd: &Path) -> Result<()> {
    let config = super::load_config(source, cwd)?;
    let target = super::absolute(file)?;

    let Some(resolver) = super::prepare(&config, &target) else {
        std::process::exit(1);
    };
    let effective = resolver.resolve(&target.to_string_lossy());

    let rendered = match format {
        OutputFormat::Text => render_text(&file.display().to_string(), &effective)?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&*effective).context("Failed to serialize config")?
        }
    };
    println!("{rendered}");
    Ok(())
}

fn render_text(file: &str, config: &EffectiveConfig) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# {file}")?;

    if config.is_ignored() {
        writeln!(out, "ignored (global ignore pattern or outside the root)")?;
        return Ok(out);
    }

    writeln!(out, "\n[layers]")?;
    for label in config.applied_layers() {
        writeln!(out, "  {label}")?;
    }

    if !config.plugins().is_empty() {
        let plugins: Vec<&str> = config.plugins().iter().map(String::as_str).collect();
        writeln!(out, "\n[plugins]\n  {}", plugins.join(", "))?;
    }

    if let Some(report) = config.linter_options().report_unused_disable_directives {
        writeln!(
            out,
            "\n[linter-options]\n  report-unused-disable-directives = {report}"
        )?;
    }

    writeln!(out, "\n[rules]")?;
    for (name, setting) in config.rules() {
        writeln!(out, "  {name} = {setting}")?;
    }

    if !config.settings().is_empty() {
        let settings =
            toml::to_string(config.settings()).context("Failed to render settings")?;
        writeln!(out, "\n[settings]")?;
        for line in settings.lines() {
            writeln!(out, "  {line}")?;
        }
    }

    Ok(out)
}
