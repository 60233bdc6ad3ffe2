//! Core types for rule assignments, diagnostics and reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Severity assigned to a rule.
///
/// Ordered so that `Off < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule is disabled.
    Off,
    /// Violations are reported but do not fail a run.
    Warn,
    /// Violations are reported and fail a run.
    Error,
}

impl Severity {
    /// Returns `true` unless the severity is [`Severity::Off`].
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }

    /// Maps the numeric form (`0`, `1`, `2`) to a severity.
    #[must_use]
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::Off),
            1 => Some(Self::Warn),
            2 => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Error returned when a severity string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`, expected: off, warn, error, 0, 1, 2")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" | "0" => Ok(Self::Off),
            "warn" | "warning" | "1" => Ok(Self::Warn),
            "error" | "2" => Ok(Self::Error),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

/// A rule's severity plus its options payload.
///
/// The options are opaque to the resolver; only the rule implementation
/// interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetting {
    /// Configured severity.
    pub severity: Severity,
    /// Rule-specific options, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<toml::Value>,
}

impl RuleSetting {
    /// Creates a setting with no options.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// Shorthand for a disabled rule.
    #[must_use]
    pub fn off() -> Self {
        Self::new(Severity::Off)
    }

    /// Shorthand for a warning-level rule.
    #[must_use]
    pub fn warn() -> Self {
        Self::new(Severity::Warn)
    }

    /// Shorthand for an error-level rule.
    #[must_use]
    pub fn error() -> Self {
        Self::new(Severity::Error)
    }

    /// Appends an option value.
    #[must_use]
    pub fn with_option(mut self, option: impl Into<toml::Value>) -> Self {
        self.options.push(option.into());
        self
    }
}

impl From<Severity> for RuleSetting {
    fn from(severity: Severity) -> Self {
        Self::new(severity)
    }
}

impl fmt::Display for RuleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        for option in &self.options {
            write!(f, " {option}")?;
        }
        Ok(())
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A finding reported by a rule implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule identifier (e.g., "no-console").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Primary location.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule,
            self.message
        )
    }
}

/// Result of applying an effective configuration to one or more files.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintReport {
    /// All diagnostics, in rule order per file.
    pub diagnostics: Vec<Diagnostic>,
    /// Rule identifiers the rule provider did not recognise.
    pub unknown_rules: Vec<String>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Counts diagnostics as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        self.diagnostics
            .iter()
            .fold((0, 0), |(errors, warnings), d| match d.severity {
                Severity::Error => (errors + 1, warnings),
                Severity::Warn => (errors, warnings + 1),
                Severity::Off => (errors, warnings),
            })
    }

    /// Adds diagnostics from another report.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        for rule in other.unknown_rules {
            if !self.unknown_rules.contains(&rule) {
                self.unknown_rules.push(rule);
            }
        }
        self.files_checked += other.files_checked;
    }
}
