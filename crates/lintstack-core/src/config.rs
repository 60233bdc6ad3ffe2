//! Configuration files for lintstack.

use crate::declarative::{self, LoadStackError};
use crate::format::FormatOptions;
use crate::layer::LayerStack;
use std::path::{Component, Path, PathBuf};

/// A loaded configuration: the layer stack plus formatter preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Layers, presets and global ignores.
    pub stack: LayerStack,
    /// Formatter preferences.
    pub format: FormatOptions,
}

impl Config {
    /// Creates an empty configuration: no layers, default formatting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// A relative `root` is taken relative to the file's directory; without
    /// one, the file's directory is the root. The root is canonicalized when
    /// it exists, and otherwise has its `.` and `..` segments folded, so
    /// `root = ".."` names the parent directory itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let joined = base.join(config.stack.root_dir());
        let root = std::fs::canonicalize(&joined).unwrap_or_else(|_| clean(&joined));
        config.stack = config.stack.root(root);
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let loaded = declarative::load_from_toml(content).map_err(|e| match e {
            LoadStackError::Toml(e) => ConfigError::Parse {
                message: e.to_string(),
            },
            LoadStackError::Load(e) => ConfigError::Invalid {
                message: e.to_string(),
            },
        })?;
        Ok(Self {
            stack: loaded.stack,
            format: loaded.format,
        })
    }
}

/// Folds `.` and `..` segments lexically: `a/./b/../c` becomes `a/c`.
///
/// Leading `..` of a relative path are kept; `..` at a filesystem root is
/// dropped.
fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// The file parsed but holds invalid values.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Validation message with its TOML location.
        message: String,
    },
}
