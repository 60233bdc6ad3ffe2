//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod output;
pub mod print_config;

use anyhow::{Context, Result};
use lintstack_core::{Config, LayerError, Resolver};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;

/// Loads the configuration `source` points at.
///
/// Without a file the stack is empty and rooted at `project_dir`. A global
/// config is also rooted at `project_dir`, since its own directory holds no
/// project files.
pub fn load_config(source: &ConfigSource, project_dir: &Path) -> Result<Config> {
    match source {
        ConfigSource::Default => {
            tracing::info!("No configuration file found, using an empty stack");
            rooted(Config::new(), project_dir)
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            let config = Config::from_file(&absolute(p)?)
                .with_context(|| format!("Failed to load config: {}", p.display()))?;
            tracing::debug!("Loaded {} layers from {}", config.stack.layers().len(), p.display());
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
                rooted(config, project_dir)
            } else {
                Ok(config)
            }
        }
    }
}

fn rooted(config: Config, project_dir: &Path) -> Result<Config> {
    Ok(Config {
        stack: config.stack.root(absolute(project_dir)?),
        format: config.format,
    })
}

/// Prepares a resolver, rendering structural errors as a diagnostic report
/// on stderr.
///
/// Returns `None` after reporting; callers exit with a failure status.
pub fn prepare<'a>(config: &'a Config, target: &Path) -> Option<Resolver<'a>> {
    match Resolver::new(&config.stack) {
        Ok(resolver) => Some(resolver),
        Err(err) => {
            report_layer_error(err, target);
            None
        }
    }
}

fn report_layer_error(err: LayerError, target: &Path) {
    let report = miette::Report::new(err.for_path(target.display().to_string()));
    eprintln!("{report:?}");
}

/// Makes `path` absolute against the working directory, resolving
/// symlinks when it exists.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read the current directory")?
            .join(path)
    };
    Ok(std::fs::canonicalize(&joined).unwrap_or(joined))
}
