//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "lintstack.toml";

const DEFAULT_CONFIG: &str = r#"# lintstack configuration
#
# Layers apply top to bottom. For each file, every layer whose `files`
# match (no `files` = every file) is folded in order: later rule entries
# replace earlier ones, settings merge by key.

# Files no layer ever sees
ignores = [
    "node_modules/**",
    ".next/**",
    "out/**",
    "build/**",
    "**/*.d.ts",
]

# Named layers that `extends` can pull in
[presets.recommended.rules]
no-var = "error"
prefer-const = "warn"
eqeqeq = "error"

[[layers]]
name = "base"
files = ["**/*.{js,cjs,mjs,jsx,ts,cts,mts,tsx}"]
extends = ["recommended"]
plugins = ["react"]

[layers.linter-options]
report-unused-disable-directives = true

[layers.settings.react]
version = "detect"

[layers.rules]
# severity | [severity, options...] | { severity = ..., options = [...] }
curly = ["warn", "multi-line"]
no-console = ["warn", { allow = ["warn", "error"] }]
"react/prop-types" = "off"

# [[layers]]
# name = "tests"
# files = ["**/*.test.{ts,tsx}"]
# rules = { no-console = "off" }

[format]
print-width = 100
single-quote = true
trailing-comma = "es5"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to describe your layers");
    println!("  2. Run: lintstack print-config src/app/page.tsx");
    println!("  3. Run: lintstack check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
