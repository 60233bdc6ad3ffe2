//! Configuration file discovery with global fallback.
//!
//! Candidates are tried in this order:
//!
//! 1. `--config` flag (explicit path, trusted as-is)
//! 2. `lintstack.toml` or `.lintstack.toml` in the project directory or
//!    the nearest ancestor holding one
//! 3. `config.toml` in the global directory (`$LINTSTACK_CONFIG_DIR`,
//!    else `~/.lintstack/`)
//! 4. Nothing found → empty stack

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to or above the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// No configuration file anywhere.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project file names, earlier names win within one directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["lintstack.toml", ".lintstack.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Finds the configuration for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    discover(project_dir, explicit, global_config_dir())
}

fn discover(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_in_ancestors(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Walks from `start` towards the filesystem root; the first directory
/// holding a project config file wins.
fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    let start = std::fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Global config directory: `$LINTSTACK_CONFIG_DIR`, else `~/.lintstack/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("LINTSTACK_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".lintstack"))
}
